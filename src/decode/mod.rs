//! Protocol buffer binary payload decoding.
//!
//! Decoding is driven by the destination type's [`Schema`](crate::Schema): every field key is
//! dispatched to the field registered under that number, and keys the schema doesn't know are
//! skipped, or captured into the type's unknown field sink if it declares one.
//!
//! Decoding is fail-fast. Any error aborts the whole call.

use bytes::Bytes;
use log::trace;
use snafu::Snafu;

use crate::unknown::UnknownField;
use crate::value::Message;
use crate::wire::WireType;

mod reader;

pub use reader::Reader;

/// Default nesting depth allowed by [`DecodeOptions`].
pub const DEFAULT_RECURSION_LIMIT: u32 = 100;

/// Decoding error.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
#[non_exhaustive]
pub enum DecodeError
{
    /// A varint ran out of input or was longer than a 64-bit value allows.
    #[snafu(display("Malformed varint after {} bytes", consumed))]
    MalformedVarint
    {
        /// Bytes inspected before giving up.
        consumed: usize,
    },

    /// A field key could not be read.
    #[snafu(display("Malformed field key: {}", reason))]
    MalformedTag
    {
        /// What was wrong with the key.
        reason: &'static str,
    },

    /// A value declared more bytes than remain in the enclosing scope.
    #[snafu(display("Value needs {} bytes but only {} remain", needed, remaining))]
    InsufficientBytes
    {
        /// Bytes the value needed.
        needed: u64,

        /// Bytes left in the current scope.
        remaining: usize,
    },

    /// A known field arrived with a different wire type than its schema declares.
    #[snafu(display(
        "Field {} is declared as {:?} but was encoded as {:?}",
        field,
        expected,
        actual
    ))]
    WireTypeMismatch
    {
        /// Field number.
        field: u32,

        /// Wire type from the schema.
        expected: WireType,

        /// Wire type found in the payload.
        actual: WireType,
    },

    /// The wire type bits of a key were not one of the supported wire types.
    #[snafu(display("Unknown wire type {}", wire_type))]
    UnknownWireType
    {
        /// Raw wire type.
        wire_type: u8,
    },

    /// A string field contained bytes that are not UTF-8.
    #[snafu(display("Invalid UTF-8 in string value: {}", source))]
    InvalidUtf8
    {
        /// Source error.
        source: std::str::Utf8Error,
    },

    /// The oneof type produced no alternative for a number its group occupies.
    #[snafu(display("Oneof has no alternative for field {}", field))]
    MissingOneofAlternative
    {
        /// Field number.
        field: u32,
    },

    /// Messages were nested deeper than the configured limit.
    #[snafu(display("Nesting exceeds the recursion limit of {}", limit))]
    RecursionLimitExceeded
    {
        /// The configured limit.
        limit: u32,
    },
}

/// Decoder configuration.
///
/// ```
/// use protokelp::DecodeOptions;
///
/// let options = DecodeOptions::new().recursion_limit(16);
/// assert_eq!(options.get_recursion_limit(), 16);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeOptions
{
    recursion_limit: u32,
}

impl Default for DecodeOptions
{
    fn default() -> Self
    {
        DecodeOptions {
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }
}

impl DecodeOptions
{
    /// Options with the default settings.
    pub fn new() -> Self
    {
        Default::default()
    }

    /// Sets how many nested message or map entry scopes may be entered.
    pub fn recursion_limit(mut self, limit: u32) -> Self
    {
        self.recursion_limit = limit;
        self
    }

    /// Gets the configured recursion limit.
    pub fn get_recursion_limit(&self) -> u32
    {
        self.recursion_limit
    }

    /// Decodes a message of type `M` from exactly the bytes in `data`.
    pub fn decode<M: Message>(&self, data: &[u8]) -> Result<M, DecodeError>
    {
        let mut msg = M::default();
        self.merge(data, &mut msg)?;
        Ok(msg)
    }

    /// Decodes a message of type `M` from `data` without copying `Bytes` payloads.
    ///
    /// `Bytes` fields and captured unknown fields of the result share the allocation of `data`
    /// instead of copying out of it; the allocation stays alive for as long as any of them do.
    pub fn decode_bytes<M: Message>(&self, data: &Bytes) -> Result<M, DecodeError>
    {
        let mut msg = M::default();
        let mut reader = Reader::new(&data[..], Some(data), self.recursion_limit);
        decode_message(&mut msg, &mut reader)?;
        Ok(msg)
    }

    /// Decodes `data` into `msg`, replacing its previous contents.
    ///
    /// `msg` is only modified if decoding succeeds.
    pub fn decode_into<M: Message>(&self, data: &[u8], msg: &mut M) -> Result<(), DecodeError>
    {
        *msg = self.decode(data)?;
        Ok(())
    }

    /// Merges `data` into an existing message.
    ///
    /// Scalars present in `data` overwrite the current values, repeated fields are appended to,
    /// map entries are inserted and unknown fields are added to the sink. If decoding fails,
    /// `msg` may have been partially merged.
    pub fn merge<M: Message>(&self, data: &[u8], msg: &mut M) -> Result<(), DecodeError>
    {
        let mut reader = Reader::new(data, None, self.recursion_limit);
        decode_message(msg, &mut reader)
    }
}

/// Decodes a message with the default [`DecodeOptions`].
pub fn decode<M: Message>(data: &[u8]) -> Result<M, DecodeError>
{
    DecodeOptions::default().decode(data)
}

/// Decodes a message with the default [`DecodeOptions`], aliasing `Bytes` payloads.
pub fn decode_bytes<M: Message>(data: &Bytes) -> Result<M, DecodeError>
{
    DecodeOptions::default().decode_bytes(data)
}

/// Decodes into `msg` with the default [`DecodeOptions`], replacing it on success.
pub fn decode_into<M: Message>(data: &[u8], msg: &mut M) -> Result<(), DecodeError>
{
    DecodeOptions::default().decode_into(data, msg)
}

/// Merges into `msg` with the default [`DecodeOptions`].
pub fn merge<M: Message>(data: &[u8], msg: &mut M) -> Result<(), DecodeError>
{
    DecodeOptions::default().merge(data, msg)
}

fn decode_message<M: Message>(msg: &mut M, reader: &mut Reader<'_>) -> Result<(), DecodeError>
{
    merge_message(msg, reader).map_err(|e| {
        trace!("Decoding {} failed: {}", M::schema().name(), e);
        e
    })
}

/// Decodes fields until `reader` is exhausted.
pub(crate) fn merge_message<M: Message>(
    msg: &mut M,
    reader: &mut Reader<'_>,
) -> Result<(), DecodeError>
{
    let schema = M::schema();
    while !reader.is_empty() {
        let key = reader.read_key()?;
        match schema.route(key.number) {
            Some((field, route)) => {
                key.check_wire_type(route.wire_type)?;
                field
                    .access
                    .merge(msg, key.number, route.offset, reader)?;
            }
            None => {
                let payload = reader.skip(key.wire_type)?;
                match schema.unknown_fields_mut(msg) {
                    Some(sink) => {
                        trace!(
                            "Capturing unknown field {} ({} bytes) in {}",
                            key.number,
                            payload.len(),
                            schema.name()
                        );
                        sink.push(UnknownField::new(
                            reader.to_bytes(key.raw),
                            reader.to_bytes(payload),
                        ));
                    }
                    None => trace!("Skipping unknown field {} in {}", key.number, schema.name()),
                }
            }
        }
    }

    Ok(())
}
