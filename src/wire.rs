//! Wire types and field keys.

use std::convert::TryFrom;

use crate::decode::DecodeError;
use crate::varint::varint_len;

/// Smallest valid field number.
pub const MIN_FIELD_NUMBER: u32 = 1;

/// Largest valid field number.
pub const MAX_FIELD_NUMBER: u32 = (1 << 29) - 1;

/// The 3-bit suffix of a field key that tells how the value is laid out.
///
/// Groups (wire types 3 and 4) are not supported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WireType
{
    /// Base-128 varint.
    Varint = 0,

    /// Eight little-endian bytes.
    Fixed64 = 1,

    /// Varint length followed by that many bytes.
    LengthDelimited = 2,

    /// Four little-endian bytes.
    Fixed32 = 5,
}

impl WireType
{
    /// Resolves a raw wire type value.
    pub fn from_raw(raw: u8) -> Option<Self>
    {
        match raw {
            0 => Some(WireType::Varint),
            1 => Some(WireType::Fixed64),
            2 => Some(WireType::LengthDelimited),
            5 => Some(WireType::Fixed32),
            _ => None,
        }
    }
}

impl TryFrom<u8> for WireType
{
    type Error = DecodeError;

    fn try_from(raw: u8) -> Result<Self, Self::Error>
    {
        WireType::from_raw(raw).ok_or(DecodeError::UnknownWireType { wire_type: raw })
    }
}

/// Combines a field number and a wire type into a field key.
#[inline]
pub fn make_key(number: u32, wire_type: WireType) -> u64
{
    (u64::from(number) << 3) | wire_type as u64
}

/// Encoded length of the key for the field `number`.
///
/// The wire type only occupies the low bits so it never changes the length.
#[inline]
pub fn key_len(number: u32) -> usize
{
    varint_len(u64::from(number) << 3)
}
