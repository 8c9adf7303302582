//! Protocol buffer binary payload encoding.
//!
//! Encoding runs in two passes. The size pass walks the message and computes its exact encoded
//! length, recording the body length of every nested message (and map entry) into a
//! [`SizeTable`] in the order they are visited. The write pass walks the message again in the same
//! order, taking each length prefix from the table instead of recomputing it, and writes into a
//! buffer that already has room for exactly the predicted number of bytes.

use bytes::{BufMut, Bytes};

use crate::value::Message;

mod size;
mod writer;

pub use size::SizeTable;
pub use writer::Writer;

pub(crate) use size::message_len;
pub(crate) use writer::write_message;

/// Computes the encoded length of `msg` without encoding it.
pub fn encoded_len<M: Message>(msg: &M) -> usize
{
    message_len(msg, &mut SizeTable::new())
}

/// Encodes `msg` into `buf` and returns the number of bytes written.
///
/// The returned length always equals [`encoded_len`].
///
/// # Panics
///
/// Panics if `buf` cannot hold the whole message. Check `remaining_mut` against [`encoded_len`]
/// first when writing into a fixed-size buffer.
pub fn encode<M: Message, B: BufMut>(msg: &M, buf: &mut B) -> usize
{
    let mut sizes = SizeTable::new();
    let len = message_len(msg, &mut sizes);
    write_sized(msg, sizes.as_slice(), len, buf)
}

/// Encodes `msg` into a vector allocated to exactly the encoded length.
pub fn encode_to_vec<M: Message>(msg: &M) -> Vec<u8>
{
    let mut sizes = SizeTable::new();
    let len = message_len(msg, &mut sizes);

    let mut out = Vec::with_capacity(len);
    write_sized(msg, sizes.as_slice(), len, &mut out);
    out
}

/// Encodes `msg` into `Bytes`.
pub fn encode_to_bytes<M: Message>(msg: &M) -> Bytes
{
    Bytes::from(encode_to_vec(msg))
}

fn write_sized<'a, M: Message>(
    msg: &M,
    sizes: &'a [usize],
    len: usize,
    buf: &'a mut dyn BufMut,
) -> usize
{
    assert!(
        buf.remaining_mut() >= len,
        "Output buffer has room for {} bytes but the message needs {}",
        buf.remaining_mut(),
        len
    );

    let mut writer = Writer::new(buf, sizes);
    write_message(msg, &mut writer);

    // Any drift between the passes is a bug in a value's length computation.
    debug_assert_eq!(writer.consumed_sizes(), sizes.len());
    assert_eq!(
        writer.written(),
        len,
        "Size pass and write pass disagree for {}",
        M::schema().name()
    );
    writer.written()
}
