use bytes::BufMut;

use crate::value::Message;
use crate::varint::{encode_varint, varint_len};
use crate::wire::{make_key, WireType};

/// Output side of the write pass.
///
/// Wraps the destination buffer together with the [`SizeTable`](super::SizeTable) produced by
/// the size pass. Lengths are taken from the table strictly in order.
pub struct Writer<'a>
{
    buf: &'a mut dyn BufMut,
    sizes: &'a [usize],
    next: usize,
    written: usize,
}

impl<'a> Writer<'a>
{
    pub(crate) fn new(buf: &'a mut dyn BufMut, sizes: &'a [usize]) -> Self
    {
        Writer {
            buf,
            sizes,
            next: 0,
            written: 0,
        }
    }

    /// Writes a varint.
    pub fn put_varint(&mut self, value: u64)
    {
        encode_varint(value, &mut *self.buf);
        self.written += varint_len(value);
    }

    /// Writes four little-endian bytes.
    pub fn put_fixed32(&mut self, value: u32)
    {
        self.buf.put_u32_le(value);
        self.written += 4;
    }

    /// Writes eight little-endian bytes.
    pub fn put_fixed64(&mut self, value: u64)
    {
        self.buf.put_u64_le(value);
        self.written += 8;
    }

    /// Writes raw bytes.
    pub fn put_slice(&mut self, data: &[u8])
    {
        self.buf.put_slice(data);
        self.written += data.len();
    }

    /// Writes a field key.
    pub fn put_key(&mut self, number: u32, wire_type: WireType)
    {
        self.put_varint(make_key(number, wire_type));
    }

    /// Bytes written so far.
    pub fn written(&self) -> usize
    {
        self.written
    }

    /// Takes the next length recorded by the size pass.
    pub(crate) fn next_size(&mut self) -> usize
    {
        let len = self.sizes[self.next];
        self.next += 1;
        len
    }

    pub(crate) fn consumed_sizes(&self) -> usize
    {
        self.next
    }
}

/// Writes the body of `msg`: its fields in field number order, then its unknown fields.
pub(crate) fn write_message<M: Message>(msg: &M, writer: &mut Writer<'_>)
{
    let schema = M::schema();
    for field in schema.iter_fields() {
        field.access.encode(msg, field.number, writer);
    }

    if let Some(unknown) = schema.unknown_fields(msg) {
        unknown.write(writer);
    }
}
