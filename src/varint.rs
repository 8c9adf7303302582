//! Base-128 varints and the zigzag transform.
//!
//! These are the primitives every other part of the codec is built on. The size pass only ever
//! needs [`varint_len`]; the writer uses [`encode_varint`] and the decoder [`decode_varint`].

use bytes::BufMut;

use crate::decode::{DecodeError, MalformedVarint};

/// Longest encoding a 64-bit value can have.
pub const MAX_VARINT_LEN: usize = 10;

/// Decodes a varint from the start of `data`.
///
/// Returns the value and the number of bytes it occupied. At most [`MAX_VARINT_LEN`] bytes are
/// inspected; a varint that is still continuing after that, or whose last byte carries more bits
/// than fit in 64 bits, is malformed just like one that runs out of input.
pub fn decode_varint(data: &[u8]) -> Result<(u64, usize), DecodeError>
{
    let mut result = 0u64;
    for (idx, b) in data.iter().take(MAX_VARINT_LEN).enumerate() {
        let b = *b;
        if idx == MAX_VARINT_LEN - 1 && b > 1 {
            return MalformedVarint { consumed: idx + 1 }.fail();
        }

        result |= u64::from(b & 0x7f) << (idx * 7);
        if b & 0x80 == 0 {
            return Ok((result, idx + 1));
        }
    }

    MalformedVarint {
        consumed: data.len().min(MAX_VARINT_LEN),
    }
    .fail()
}

/// Encodes `value` as a varint into `buf`.
pub fn encode_varint<B: BufMut + ?Sized>(mut value: u64, buf: &mut B)
{
    while value >= 0x80 {
        buf.put_u8((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    buf.put_u8(value as u8);
}

/// Number of bytes [`encode_varint`] would write for `value`.
#[inline]
pub fn varint_len(value: u64) -> usize
{
    // Each byte carries 7 bits; the `| 1` makes zero take a single byte.
    (((value | 1).leading_zeros() ^ 63) * 9 + 73) as usize / 64
}

/// Maps a signed 32-bit integer onto an unsigned one so that small magnitudes stay small.
#[inline]
pub fn zigzag_encode32(value: i32) -> u32
{
    ((value << 1) ^ (value >> 31)) as u32
}

/// Inverse of [`zigzag_encode32`].
#[inline]
pub fn zigzag_decode32(value: u32) -> i32
{
    ((value >> 1) as i32) ^ -((value & 1) as i32)
}

/// Maps a signed 64-bit integer onto an unsigned one so that small magnitudes stay small.
#[inline]
pub fn zigzag_encode64(value: i64) -> u64
{
    ((value << 1) ^ (value >> 63)) as u64
}

/// Inverse of [`zigzag_encode64`].
#[inline]
pub fn zigzag_decode64(value: u64) -> i64
{
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}
