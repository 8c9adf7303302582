use bytes::{BufMut, Bytes};

use super::*;
use crate::decode::{self, merge_message};
use crate::encode::{self, message_len, write_message};
use crate::schema::Schema;
use crate::varint::varint_len;

/// A record type described by a [`Schema`].
///
/// Implementors provide the schema, usually built once into a static. The rest of the codec is
/// available through the provided methods.
pub trait Message: Default + 'static
{
    /// The schema describing the type's fields.
    fn schema() -> &'static Schema<Self>;

    /// Encoded length of the message.
    fn encoded_len(&self) -> usize
    {
        encode::encoded_len(self)
    }

    /// Encodes the message into `buf`, returning the number of bytes written.
    ///
    /// # Panics
    ///
    /// Panics if `buf` doesn't have room for [`encoded_len`](Message::encoded_len) bytes.
    fn encode<B: BufMut>(&self, buf: &mut B) -> usize
    {
        encode::encode(self, buf)
    }

    /// Encodes the message into a new vector.
    fn encode_to_vec(&self) -> Vec<u8>
    {
        encode::encode_to_vec(self)
    }

    /// Encodes the message into new `Bytes`.
    fn encode_to_bytes(&self) -> Bytes
    {
        encode::encode_to_bytes(self)
    }

    /// Decodes a message from `data`.
    fn decode(data: &[u8]) -> Result<Self, DecodeError>
    {
        decode::decode(data)
    }

    /// Decodes a message from `data`, sharing its allocation for `Bytes` payloads.
    fn decode_bytes(data: &Bytes) -> Result<Self, DecodeError>
    {
        decode::decode_bytes(data)
    }

    /// Merges the fields in `data` into the message.
    fn merge(&mut self, data: &[u8]) -> Result<(), DecodeError>
    {
        decode::merge(data, self)
    }
}

impl<M: Message> ProtoValue for M
{
    fn wire_type(&self) -> WireType
    {
        WireType::LengthDelimited
    }

    // Nested messages are emitted even when every field holds its default.
    fn is_default(&self) -> bool
    {
        false
    }

    fn value_len(&self, sizes: &mut SizeTable) -> usize
    {
        let slot = sizes.reserve();
        let len = message_len(self, sizes);
        sizes.fill(slot, len);
        varint_len(len as u64) + len
    }

    fn write_value(&self, writer: &mut Writer<'_>)
    {
        let len = writer.next_size();
        writer.put_varint(len as u64);

        let start = writer.written();
        write_message(self, writer);
        debug_assert_eq!(writer.written() - start, len);
    }

    fn merge_value(&mut self, reader: &mut Reader<'_>) -> Result<(), DecodeError>
    {
        let mut nested = reader.nested()?;
        merge_message(self, &mut nested)
    }
}
