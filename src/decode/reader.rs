use bytes::{Buf, Bytes};
use snafu::{ensure, ResultExt};
use std::convert::TryFrom;

use super::*;
use crate::varint::decode_varint;
use crate::wire::MIN_FIELD_NUMBER;

/// Cursor over the bytes of a single message scope.
///
/// A reader never looks past the end of its slice. Nested messages and map entries are decoded
/// through a fresh reader over exactly the bytes their length prefix covers.
pub struct Reader<'a>
{
    data: &'a [u8],
    backing: Option<&'a Bytes>,
    depth: u32,
    limit: u32,
}

/// A field key as it appeared on the wire.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RawKey<'a>
{
    pub number: u32,
    pub wire_type: u8,
    pub raw: &'a [u8],
}

impl<'a> RawKey<'a>
{
    /// Ensures the key uses the wire type the field was declared with.
    pub fn check_wire_type(&self, expected: WireType) -> Result<(), DecodeError>
    {
        let actual = WireType::try_from(self.wire_type)?;
        ensure!(
            actual == expected,
            WireTypeMismatch {
                field: self.number,
                expected,
                actual,
            }
        );
        Ok(())
    }
}

impl<'a> Reader<'a>
{
    pub(crate) fn new(data: &'a [u8], backing: Option<&'a Bytes>, limit: u32) -> Self
    {
        Reader {
            data,
            backing,
            depth: limit,
            limit,
        }
    }

    /// True once every byte of the scope has been consumed.
    pub fn is_empty(&self) -> bool
    {
        self.data.is_empty()
    }

    /// Bytes left in the scope.
    pub fn remaining(&self) -> usize
    {
        self.data.len()
    }

    /// Reads a varint.
    pub fn read_varint(&mut self) -> Result<u64, DecodeError>
    {
        let (value, len) = decode_varint(self.data)?;
        self.data = &self.data[len..];
        Ok(value)
    }

    /// Reads four little-endian bytes.
    pub fn read_fixed32(&mut self) -> Result<u32, DecodeError>
    {
        self.ensure_remaining(4)?;
        Ok(self.data.get_u32_le())
    }

    /// Reads eight little-endian bytes.
    pub fn read_fixed64(&mut self) -> Result<u64, DecodeError>
    {
        self.ensure_remaining(8)?;
        Ok(self.data.get_u64_le())
    }

    /// Reads a length prefix and returns the bytes it covers.
    pub fn read_len_delimited(&mut self) -> Result<&'a [u8], DecodeError>
    {
        let len = self.read_varint()?;
        self.take(len)
    }

    /// Reads a length-delimited value as `Bytes`.
    ///
    /// When decoding from `Bytes` the result shares the input's allocation, otherwise the
    /// payload is copied.
    pub fn read_bytes(&mut self) -> Result<Bytes, DecodeError>
    {
        let data = self.read_len_delimited()?;
        Ok(self.to_bytes(data))
    }

    /// Reads a length-delimited value as a string slice.
    pub fn read_str(&mut self) -> Result<&'a str, DecodeError>
    {
        let data = self.read_len_delimited()?;
        std::str::from_utf8(data).context(InvalidUtf8 {})
    }

    /// Reads a length prefix and returns a reader scoped to the bytes it covers.
    pub(crate) fn nested(&mut self) -> Result<Reader<'a>, DecodeError>
    {
        ensure!(self.depth > 0, RecursionLimitExceeded { limit: self.limit });
        let data = self.read_len_delimited()?;
        Ok(Reader {
            data,
            backing: self.backing,
            depth: self.depth - 1,
            limit: self.limit,
        })
    }

    pub(crate) fn read_key(&mut self) -> Result<RawKey<'a>, DecodeError>
    {
        let key = self.peek_key()?;
        self.data = &self.data[key.raw.len()..];
        Ok(key)
    }

    pub(crate) fn peek_key(&self) -> Result<RawKey<'a>, DecodeError>
    {
        let (key, len) = match decode_varint(self.data) {
            Ok(v) => v,
            Err(_) => {
                return MalformedTag {
                    reason: "truncated key",
                }
                .fail()
            }
        };

        ensure!(
            key <= u64::from(u32::MAX),
            MalformedTag {
                reason: "key does not fit 32 bits",
            }
        );

        let number = (key >> 3) as u32;
        ensure!(
            number >= MIN_FIELD_NUMBER,
            MalformedTag {
                reason: "field number 0",
            }
        );

        Ok(RawKey {
            number,
            wire_type: (key & 0x07) as u8,
            raw: &self.data[..len],
        })
    }

    /// Consumes the key of the next field if it is another occurrence of `number`.
    ///
    /// Returns `false` and leaves the input untouched when the scope is exhausted or the next
    /// field is a different one.
    pub(crate) fn next_occurrence(
        &mut self,
        number: u32,
        expected: WireType,
    ) -> Result<bool, DecodeError>
    {
        if self.is_empty() {
            return Ok(false);
        }

        let key = self.peek_key()?;
        if key.number != number {
            return Ok(false);
        }

        self.data = &self.data[key.raw.len()..];
        key.check_wire_type(expected)?;
        Ok(true)
    }

    /// Skips a value of the given raw wire type and returns the bytes it occupied.
    pub(crate) fn skip(&mut self, wire_type: u8) -> Result<&'a [u8], DecodeError>
    {
        let start = self.data;
        match WireType::try_from(wire_type)? {
            WireType::Varint => {
                self.read_varint()?;
            }
            WireType::Fixed64 => {
                self.take(8)?;
            }
            WireType::LengthDelimited => {
                self.read_len_delimited()?;
            }
            WireType::Fixed32 => {
                self.take(4)?;
            }
        }

        let consumed = start.len() - self.data.len();
        Ok(&start[..consumed])
    }

    /// Turns a slice of this reader's input into `Bytes`.
    pub(crate) fn to_bytes(&self, slice: &'a [u8]) -> Bytes
    {
        match self.backing {
            Some(backing) => backing.slice_ref(slice),
            None => Bytes::copy_from_slice(slice),
        }
    }

    fn ensure_remaining(&self, needed: usize) -> Result<(), DecodeError>
    {
        ensure!(
            self.data.len() >= needed,
            InsufficientBytes {
                needed: needed as u64,
                remaining: self.data.len(),
            }
        );
        Ok(())
    }

    fn take(&mut self, len: u64) -> Result<&'a [u8], DecodeError>
    {
        ensure!(
            len <= self.data.len() as u64,
            InsufficientBytes {
                needed: len,
                remaining: self.data.len(),
            }
        );

        let (head, tail) = self.data.split_at(len as usize);
        self.data = tail;
        Ok(head)
    }
}
