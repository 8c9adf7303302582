//! Capture of fields the schema doesn't know about.
//!
//! A message type opts in by registering an [`UnknownFields`] accessor on its schema. Unknown
//! fields are then recorded byte-for-byte while decoding and written back unchanged, after the
//! declared fields, when the message is encoded again. This lets a message pass through a program
//! built against an older schema without losing the fields added since.

use bytes::Bytes;

use crate::encode::Writer;
use crate::varint::decode_varint;
use crate::wire::WireType;

/// A single field captured verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownField
{
    tag: Bytes,
    payload: Bytes,
}

impl UnknownField
{
    /// Creates a field from its raw key bytes and raw value bytes.
    ///
    /// The payload includes the length prefix of length-delimited values.
    pub fn new(tag: Bytes, payload: Bytes) -> Self
    {
        UnknownField { tag, payload }
    }

    /// Raw key bytes.
    pub fn tag(&self) -> &Bytes
    {
        &self.tag
    }

    /// Raw value bytes.
    pub fn payload(&self) -> &Bytes
    {
        &self.payload
    }

    /// Field number from the key, or `None` if the key isn't a valid varint.
    pub fn number(&self) -> Option<u32>
    {
        decode_varint(&self.tag)
            .ok()
            .map(|(key, _)| (key >> 3) as u32)
    }

    /// Wire type from the key.
    pub fn wire_type(&self) -> Option<WireType>
    {
        decode_varint(&self.tag)
            .ok()
            .and_then(|(key, _)| WireType::from_raw((key & 0x07) as u8))
    }

    /// Bytes the field occupies on the wire.
    pub fn encoded_len(&self) -> usize
    {
        self.tag.len() + self.payload.len()
    }
}

/// Ordered list of captured fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UnknownFields
{
    fields: Vec<UnknownField>,
}

impl UnknownFields
{
    /// Creates an empty sink.
    pub fn new() -> Self
    {
        Default::default()
    }

    /// Appends a field.
    pub fn push(&mut self, field: UnknownField)
    {
        self.fields.push(field);
    }

    /// Iterates the fields in capture order.
    pub fn iter(&self) -> std::slice::Iter<'_, UnknownField>
    {
        self.fields.iter()
    }

    /// Number of captured fields.
    pub fn len(&self) -> usize
    {
        self.fields.len()
    }

    /// True if nothing has been captured.
    pub fn is_empty(&self) -> bool
    {
        self.fields.is_empty()
    }

    /// Drops every captured field.
    pub fn clear(&mut self)
    {
        self.fields.clear();
    }

    /// Bytes the captured fields occupy on the wire.
    pub fn encoded_len(&self) -> usize
    {
        self.fields.iter().map(UnknownField::encoded_len).sum()
    }

    pub(crate) fn write(&self, writer: &mut Writer<'_>)
    {
        for field in &self.fields {
            writer.put_slice(&field.tag);
            writer.put_slice(&field.payload);
        }
    }
}

impl<'a> IntoIterator for &'a UnknownFields
{
    type Item = &'a UnknownField;
    type IntoIter = std::slice::Iter<'a, UnknownField>;

    fn into_iter(self) -> Self::IntoIter
    {
        self.fields.iter()
    }
}
