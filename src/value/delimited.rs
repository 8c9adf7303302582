use bytes::Bytes;

use super::*;
use crate::varint::varint_len;

impl ProtoValue for String
{
    fn wire_type(&self) -> WireType
    {
        WireType::LengthDelimited
    }

    fn is_default(&self) -> bool
    {
        self.is_empty()
    }

    fn value_len(&self, _sizes: &mut SizeTable) -> usize
    {
        varint_len(self.len() as u64) + self.len()
    }

    fn write_value(&self, writer: &mut Writer<'_>)
    {
        writer.put_varint(self.len() as u64);
        writer.put_slice(self.as_bytes());
    }

    fn merge_value(&mut self, reader: &mut Reader<'_>) -> Result<(), DecodeError>
    {
        let value = reader.read_str()?;
        self.clear();
        self.push_str(value);
        Ok(())
    }
}

impl MapKey for String {}

impl ProtoValue for Bytes
{
    fn wire_type(&self) -> WireType
    {
        WireType::LengthDelimited
    }

    fn is_default(&self) -> bool
    {
        self.is_empty()
    }

    fn value_len(&self, _sizes: &mut SizeTable) -> usize
    {
        varint_len(self.len() as u64) + self.len()
    }

    fn write_value(&self, writer: &mut Writer<'_>)
    {
        writer.put_varint(self.len() as u64);
        writer.put_slice(self);
    }

    fn merge_value(&mut self, reader: &mut Reader<'_>) -> Result<(), DecodeError>
    {
        *self = reader.read_bytes()?;
        Ok(())
    }
}
