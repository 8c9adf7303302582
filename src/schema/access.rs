//! Field accessors.
//!
//! Each container kind binds a getter pair into the record and knows how to size, write and merge
//! the field. The accessors only hold function pointers, so they are shareable no matter what the
//! record contains.

use snafu::OptionExt;

use crate::decode::{DecodeError, MissingOneofAlternative, Reader};
use crate::encode::{SizeTable, Writer};
use crate::value::{Oneof, ProtoMap, ProtoValue};
use crate::varint::varint_len;
use crate::wire::{key_len, WireType};

/// Type-erased codec for one field of `M`.
///
/// `number` is the field number the field is registered under; `offset` is the offset of the
/// number found on the wire from it, which is only nonzero for oneof alternatives.
pub(crate) trait FieldAccess<M>: Send + Sync
{
    fn encoded_len(&self, msg: &M, number: u32, sizes: &mut SizeTable) -> usize;

    fn encode(&self, msg: &M, number: u32, writer: &mut Writer<'_>);

    /// Called after the key has been consumed and its wire type checked.
    fn merge(
        &self,
        msg: &mut M,
        number: u32,
        offset: u32,
        reader: &mut Reader<'_>,
    ) -> Result<(), DecodeError>;
}

fn tagged_len(number: u32, value: &dyn ProtoValue, sizes: &mut SizeTable) -> usize
{
    key_len(number) + value.value_len(sizes)
}

fn write_tagged(number: u32, value: &dyn ProtoValue, writer: &mut Writer<'_>)
{
    writer.put_key(number, value.wire_type());
    value.write_value(writer);
}

pub(crate) struct Scalar<M, V>
{
    pub get: fn(&M) -> &V,
    pub get_mut: fn(&mut M) -> &mut V,
}

impl<M, V: ProtoValue> FieldAccess<M> for Scalar<M, V>
{
    fn encoded_len(&self, msg: &M, number: u32, sizes: &mut SizeTable) -> usize
    {
        let value = (self.get)(msg);
        if value.is_default() {
            return 0;
        }
        tagged_len(number, value, sizes)
    }

    fn encode(&self, msg: &M, number: u32, writer: &mut Writer<'_>)
    {
        let value = (self.get)(msg);
        if !value.is_default() {
            write_tagged(number, value, writer);
        }
    }

    fn merge(
        &self,
        msg: &mut M,
        _number: u32,
        _offset: u32,
        reader: &mut Reader<'_>,
    ) -> Result<(), DecodeError>
    {
        (self.get_mut)(msg).merge_value(reader)
    }
}

pub(crate) struct Optional<M, V>
{
    pub get: fn(&M) -> &Option<V>,
    pub get_mut: fn(&mut M) -> &mut Option<V>,
}

impl<M, V: ProtoValue + Default> FieldAccess<M> for Optional<M, V>
{
    fn encoded_len(&self, msg: &M, number: u32, sizes: &mut SizeTable) -> usize
    {
        match (self.get)(msg) {
            Some(value) => tagged_len(number, value, sizes),
            None => 0,
        }
    }

    fn encode(&self, msg: &M, number: u32, writer: &mut Writer<'_>)
    {
        if let Some(value) = (self.get)(msg) {
            write_tagged(number, value, writer);
        }
    }

    fn merge(
        &self,
        msg: &mut M,
        _number: u32,
        _offset: u32,
        reader: &mut Reader<'_>,
    ) -> Result<(), DecodeError>
    {
        let mut value = V::default();
        value.merge_value(reader)?;
        *(self.get_mut)(msg) = Some(value);
        Ok(())
    }
}

pub(crate) struct OptionalBoxed<M, V>
{
    pub get: fn(&M) -> &Option<Box<V>>,
    pub get_mut: fn(&mut M) -> &mut Option<Box<V>>,
}

impl<M, V: ProtoValue + Default> FieldAccess<M> for OptionalBoxed<M, V>
{
    fn encoded_len(&self, msg: &M, number: u32, sizes: &mut SizeTable) -> usize
    {
        match (self.get)(msg) {
            Some(value) => tagged_len(number, &**value, sizes),
            None => 0,
        }
    }

    fn encode(&self, msg: &M, number: u32, writer: &mut Writer<'_>)
    {
        if let Some(value) = (self.get)(msg) {
            write_tagged(number, &**value, writer);
        }
    }

    fn merge(
        &self,
        msg: &mut M,
        _number: u32,
        _offset: u32,
        reader: &mut Reader<'_>,
    ) -> Result<(), DecodeError>
    {
        let mut value = Box::new(V::default());
        value.merge_value(reader)?;
        *(self.get_mut)(msg) = Some(value);
        Ok(())
    }
}

pub(crate) struct Repeated<M, V>
{
    pub get: fn(&M) -> &Vec<V>,
    pub get_mut: fn(&mut M) -> &mut Vec<V>,
    pub wire_type: WireType,
}

impl<M, V: ProtoValue + Default> FieldAccess<M> for Repeated<M, V>
{
    fn encoded_len(&self, msg: &M, number: u32, sizes: &mut SizeTable) -> usize
    {
        (self.get)(msg)
            .iter()
            .map(|value| tagged_len(number, value, sizes))
            .sum()
    }

    fn encode(&self, msg: &M, number: u32, writer: &mut Writer<'_>)
    {
        for value in (self.get)(msg) {
            write_tagged(number, value, writer);
        }
    }

    fn merge(
        &self,
        msg: &mut M,
        number: u32,
        _offset: u32,
        reader: &mut Reader<'_>,
    ) -> Result<(), DecodeError>
    {
        let values = (self.get_mut)(msg);
        loop {
            let mut value = V::default();
            value.merge_value(reader)?;
            values.push(value);

            if !reader.next_occurrence(number, self.wire_type)? {
                return Ok(());
            }
        }
    }
}

pub(crate) struct Map<M, T>
{
    pub get: fn(&M) -> &T,
    pub get_mut: fn(&mut M) -> &mut T,
}

const ENTRY_KEY: u32 = 1;
const ENTRY_VALUE: u32 = 2;

impl<M, T: ProtoMap> FieldAccess<M> for Map<M, T>
{
    fn encoded_len(&self, msg: &M, number: u32, sizes: &mut SizeTable) -> usize
    {
        let mut len = 0;
        (self.get)(msg).for_each_entry(&mut |key: &T::Key, value: &T::Value| {
            let slot = sizes.reserve();
            let entry = tagged_len(ENTRY_KEY, key, sizes) + tagged_len(ENTRY_VALUE, value, sizes);
            sizes.fill(slot, entry);
            len += key_len(number) + varint_len(entry as u64) + entry;
        });
        len
    }

    fn encode(&self, msg: &M, number: u32, writer: &mut Writer<'_>)
    {
        (self.get)(msg).for_each_entry(&mut |key: &T::Key, value: &T::Value| {
            let entry = writer.next_size();
            writer.put_key(number, WireType::LengthDelimited);
            writer.put_varint(entry as u64);
            write_tagged(ENTRY_KEY, key, writer);
            write_tagged(ENTRY_VALUE, value, writer);
        });
    }

    fn merge(
        &self,
        msg: &mut M,
        number: u32,
        _offset: u32,
        reader: &mut Reader<'_>,
    ) -> Result<(), DecodeError>
    {
        let map = (self.get_mut)(msg);
        loop {
            let mut entry = reader.nested()?;
            let mut key = T::Key::default();
            let mut value = T::Value::default();

            while !entry.is_empty() {
                let tag = entry.read_key()?;
                match tag.number {
                    ENTRY_KEY => {
                        tag.check_wire_type(key.wire_type())?;
                        key.merge_value(&mut entry)?;
                    }
                    ENTRY_VALUE => {
                        tag.check_wire_type(value.wire_type())?;
                        value.merge_value(&mut entry)?;
                    }
                    _ => {
                        entry.skip(tag.wire_type)?;
                    }
                }
            }
            map.insert_entry(key, value);

            if !reader.next_occurrence(number, WireType::LengthDelimited)? {
                return Ok(());
            }
        }
    }
}

pub(crate) struct OneofField<M, O>
{
    pub get: fn(&M) -> &Option<O>,
    pub get_mut: fn(&mut M) -> &mut Option<O>,
}

impl<M, O: Oneof> FieldAccess<M> for OneofField<M, O>
{
    fn encoded_len(&self, msg: &M, number: u32, sizes: &mut SizeTable) -> usize
    {
        match (self.get)(msg) {
            Some(oneof) => tagged_len(number + oneof.offset(), oneof.value(), sizes),
            None => 0,
        }
    }

    fn encode(&self, msg: &M, number: u32, writer: &mut Writer<'_>)
    {
        if let Some(oneof) = (self.get)(msg) {
            write_tagged(number + oneof.offset(), oneof.value(), writer);
        }
    }

    fn merge(
        &self,
        msg: &mut M,
        number: u32,
        offset: u32,
        reader: &mut Reader<'_>,
    ) -> Result<(), DecodeError>
    {
        let mut oneof = O::empty(offset).context(MissingOneofAlternative {
            field: number + offset,
        })?;
        oneof.value_mut().merge_value(reader)?;
        *(self.get_mut)(msg) = Some(oneof);
        Ok(())
    }
}
