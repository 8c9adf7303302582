//! Wire representations of individual values.
//!
//! [`ProtoValue`] is implemented for every type that can be stored in a field. Its wire type is
//! fixed by the Rust type, so a schema can never declare a field whose wire category is
//! undecidable.
//!
//! | Rust type | Wire type |
//! |-----------|-----------|
//! | `bool`, `i32`, `i64`, `u32`, `u64`, [`Sint32`], [`Sint64`], enumerations | Varint |
//! | `f32`, [`Fixed32`], [`Sfixed32`] | Fixed32 |
//! | `f64`, [`Fixed64`], [`Sfixed64`] | Fixed64 |
//! | `String`, `Bytes`, [`Message`] types | LengthDelimited |

use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use crate::decode::{DecodeError, Reader};
use crate::encode::{SizeTable, Writer};
use crate::wire::WireType;

mod delimited;
mod message;
mod scalar;

pub use message::Message;
pub use scalar::{Fixed32, Fixed64, Sfixed32, Sfixed64, Sint32, Sint64};

/// A value that can be stored in a field.
///
/// The methods deal with the value only; field keys are written by the field that holds it.
pub trait ProtoValue
{
    /// Wire type of the value.
    fn wire_type(&self) -> WireType;

    /// True if this is the type's default value, which plain fields leave out of the encoding.
    fn is_default(&self) -> bool;

    /// Number of bytes [`write_value`](ProtoValue::write_value) will write, including the length
    /// prefix of length-delimited values.
    ///
    /// Nested messages record their body length in `sizes`.
    fn value_len(&self, sizes: &mut SizeTable) -> usize;

    /// Writes the value.
    fn write_value(&self, writer: &mut Writer<'_>);

    /// Reads a value and merges it into `self`.
    ///
    /// Scalars are replaced, messages are merged field by field.
    fn merge_value(&mut self, reader: &mut Reader<'_>) -> Result<(), DecodeError>;
}

/// Values that may be used as map keys: integers, `bool` and `String`.
pub trait MapKey: ProtoValue {}

/// A Rust enum encoded as a varint.
///
/// Implement this for the enum and invoke [`impl_enumeration!`](crate::impl_enumeration) to get
/// the [`ProtoValue`] implementation. `from_i32` has to accept any value; values the enum doesn't
/// define should map to a catch-all variant.
pub trait Enumeration: Copy
{
    /// The numeric value of the variant.
    fn to_i32(self) -> i32;

    /// The variant for a numeric value.
    fn from_i32(value: i32) -> Self;
}

/// Implements [`ProtoValue`] for types implementing [`Enumeration`].
///
/// ```
/// use protokelp::{impl_enumeration, Enumeration};
///
/// #[derive(Clone, Copy, Debug, PartialEq)]
/// enum Level { Debug, Info, Other(i32) }
///
/// impl Enumeration for Level {
///     fn to_i32(self) -> i32 {
///         match self { Level::Debug => 0, Level::Info => 1, Level::Other(v) => v }
///     }
///     fn from_i32(value: i32) -> Self {
///         match value { 0 => Level::Debug, 1 => Level::Info, v => Level::Other(v) }
///     }
/// }
///
/// impl_enumeration!(Level);
/// ```
#[macro_export]
macro_rules! impl_enumeration {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::ProtoValue for $ty
            {
                fn wire_type(&self) -> $crate::WireType
                {
                    $crate::WireType::Varint
                }

                fn is_default(&self) -> bool
                {
                    $crate::Enumeration::to_i32(*self) == 0
                }

                fn value_len(&self, _sizes: &mut $crate::SizeTable) -> usize
                {
                    $crate::varint::varint_len($crate::Enumeration::to_i32(*self) as i64 as u64)
                }

                fn write_value(&self, writer: &mut $crate::Writer<'_>)
                {
                    writer.put_varint($crate::Enumeration::to_i32(*self) as i64 as u64)
                }

                fn merge_value(
                    &mut self,
                    reader: &mut $crate::Reader<'_>,
                ) -> ::std::result::Result<(), $crate::DecodeError>
                {
                    let raw = reader.read_varint()?;
                    *self = <$ty as $crate::Enumeration>::from_i32(raw as i32);
                    ::std::result::Result::Ok(())
                }
            }
        )+
    };
}

/// An associative container usable as a map field.
///
/// Both passes of the encoder iterate the map, so the iteration order must not change between
/// them. The standard maps satisfy this as long as they aren't modified during encoding.
pub trait ProtoMap: Default
{
    /// Key type.
    type Key: MapKey + Default;

    /// Value type.
    type Value: ProtoValue + Default;

    /// Calls `f` with every entry.
    fn for_each_entry(&self, f: &mut dyn FnMut(&Self::Key, &Self::Value));

    /// Inserts an entry, replacing any earlier value for the same key.
    fn insert_entry(&mut self, key: Self::Key, value: Self::Value);
}

impl<K, V, S> ProtoMap for HashMap<K, V, S>
where
    K: MapKey + Default + Eq + Hash,
    V: ProtoValue + Default,
    S: BuildHasher + Default,
{
    type Key = K;
    type Value = V;

    fn for_each_entry(&self, f: &mut dyn FnMut(&K, &V))
    {
        for (k, v) in self {
            f(k, v);
        }
    }

    fn insert_entry(&mut self, key: K, value: V)
    {
        self.insert(key, value);
    }
}

impl<K, V> ProtoMap for BTreeMap<K, V>
where
    K: MapKey + Default + Ord,
    V: ProtoValue + Default,
{
    type Key = K;
    type Value = V;

    fn for_each_entry(&self, f: &mut dyn FnMut(&K, &V))
    {
        for (k, v) in self {
            f(k, v);
        }
    }

    fn insert_entry(&mut self, key: K, value: V)
    {
        self.insert(key, value);
    }
}

/// A Rust enum holding the active alternative of a `oneof`.
///
/// A oneof registered under number `n` uses `n + offset` as the field number of each
/// alternative, with offsets running from 0 to `VARIANTS - 1`.
///
/// ```
/// use protokelp::{Oneof, ProtoValue};
///
/// enum Contact { Email(String), Phone(u64) }
///
/// impl Oneof for Contact {
///     const VARIANTS: u32 = 2;
///
///     fn offset(&self) -> u32 {
///         match self { Contact::Email(_) => 0, Contact::Phone(_) => 1 }
///     }
///     fn value(&self) -> &dyn ProtoValue {
///         match self { Contact::Email(v) => v, Contact::Phone(v) => v }
///     }
///     fn value_mut(&mut self) -> &mut dyn ProtoValue {
///         match self { Contact::Email(v) => v, Contact::Phone(v) => v }
///     }
///     fn empty(offset: u32) -> Option<Self> {
///         match offset {
///             0 => Some(Contact::Email(String::new())),
///             1 => Some(Contact::Phone(0)),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Oneof: Sized
{
    /// Number of alternatives.
    const VARIANTS: u32;

    /// Offset of the active alternative.
    fn offset(&self) -> u32;

    /// Value of the active alternative.
    fn value(&self) -> &dyn ProtoValue;

    /// Mutable value of the active alternative.
    fn value_mut(&mut self) -> &mut dyn ProtoValue;

    /// The alternative at `offset` holding a default value.
    ///
    /// Must return `Some` for every offset below `VARIANTS`, on every call. The schema builder
    /// checks this once; a later `None` fails decoding with
    /// [`MissingOneofAlternative`](crate::DecodeError::MissingOneofAlternative).
    fn empty(offset: u32) -> Option<Self>;
}
