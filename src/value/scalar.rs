use super::*;
use crate::varint::{varint_len, zigzag_decode32, zigzag_decode64, zigzag_encode32, zigzag_encode64};

// Integer wrappers selecting an alternative encoding for the same Rust integer type.
macro_rules! wrapper {
    ($(#[$doc:meta])* $name:ident($inner:ty)) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub $inner);

        impl From<$inner> for $name
        {
            fn from(value: $inner) -> Self
            {
                $name(value)
            }
        }

        impl From<$name> for $inner
        {
            fn from(value: $name) -> Self
            {
                value.0
            }
        }
    };
}

wrapper! {
    /// `sint32`: zigzag encoded varint.
    Sint32(i32)
}
wrapper! {
    /// `sint64`: zigzag encoded varint.
    Sint64(i64)
}
wrapper! {
    /// `fixed32`: four little-endian bytes.
    Fixed32(u32)
}
wrapper! {
    /// `fixed64`: eight little-endian bytes.
    Fixed64(u64)
}
wrapper! {
    /// `sfixed32`: four little-endian bytes.
    Sfixed32(i32)
}
wrapper! {
    /// `sfixed64`: eight little-endian bytes.
    Sfixed64(i64)
}

macro_rules! varint_value {
    ($ty:ty,
     to_u64($to_value:ident) $to_u64:expr,
     from_u64($from_value:ident) $from_u64:expr) => {
        impl ProtoValue for $ty
        {
            fn wire_type(&self) -> WireType
            {
                WireType::Varint
            }

            fn is_default(&self) -> bool
            {
                *self == <$ty>::default()
            }

            fn value_len(&self, _sizes: &mut SizeTable) -> usize
            {
                let $to_value = self;
                varint_len($to_u64)
            }

            fn write_value(&self, writer: &mut Writer<'_>)
            {
                let $to_value = self;
                writer.put_varint($to_u64);
            }

            fn merge_value(&mut self, reader: &mut Reader<'_>) -> Result<(), DecodeError>
            {
                let $from_value = reader.read_varint()?;
                *self = $from_u64;
                Ok(())
            }
        }

        impl MapKey for $ty {}
    };
}

varint_value!(bool,
              to_u64(value) u64::from(*value),
              from_u64(value) value != 0);
// Negative values are sign extended, which makes them take ten bytes.
varint_value!(i32,
              to_u64(value) *value as i64 as u64,
              from_u64(value) value as i32);
varint_value!(i64,
              to_u64(value) *value as u64,
              from_u64(value) value as i64);
varint_value!(u32,
              to_u64(value) u64::from(*value),
              from_u64(value) value as u32);
varint_value!(u64,
              to_u64(value) *value,
              from_u64(value) value);
varint_value!(Sint32,
              to_u64(value) u64::from(zigzag_encode32(value.0)),
              from_u64(value) Sint32(zigzag_decode32(value as u32)));
varint_value!(Sint64,
              to_u64(value) zigzag_encode64(value.0),
              from_u64(value) Sint64(zigzag_decode64(value)));

macro_rules! fixed_value {
    ($ty:ty,
     $wire_type:ident,
     $width:expr,
     $put:ident,
     $read:ident,
     to_bits($to_value:ident) $to_bits:expr,
     from_bits($from_value:ident) $from_bits:expr) => {
        impl ProtoValue for $ty
        {
            fn wire_type(&self) -> WireType
            {
                WireType::$wire_type
            }

            // Compares the bits so that -0.0 is not mistaken for the default of a float.
            fn is_default(&self) -> bool
            {
                let $to_value = self;
                $to_bits == 0
            }

            fn value_len(&self, _sizes: &mut SizeTable) -> usize
            {
                $width
            }

            fn write_value(&self, writer: &mut Writer<'_>)
            {
                let $to_value = self;
                writer.$put($to_bits);
            }

            fn merge_value(&mut self, reader: &mut Reader<'_>) -> Result<(), DecodeError>
            {
                let $from_value = reader.$read()?;
                *self = $from_bits;
                Ok(())
            }
        }
    };
}

fixed_value!(f32, Fixed32, 4, put_fixed32, read_fixed32,
             to_bits(value) value.to_bits(),
             from_bits(value) f32::from_bits(value));
fixed_value!(f64, Fixed64, 8, put_fixed64, read_fixed64,
             to_bits(value) value.to_bits(),
             from_bits(value) f64::from_bits(value));
fixed_value!(Fixed32, Fixed32, 4, put_fixed32, read_fixed32,
             to_bits(value) value.0,
             from_bits(value) Fixed32(value));
fixed_value!(Fixed64, Fixed64, 8, put_fixed64, read_fixed64,
             to_bits(value) value.0,
             from_bits(value) Fixed64(value));
fixed_value!(Sfixed32, Fixed32, 4, put_fixed32, read_fixed32,
             to_bits(value) value.0 as u32,
             from_bits(value) Sfixed32(value as i32));
fixed_value!(Sfixed64, Fixed64, 8, put_fixed64, read_fixed64,
             to_bits(value) value.0 as u64,
             from_bits(value) Sfixed64(value as i64));

impl MapKey for Fixed32 {}
impl MapKey for Fixed64 {}
impl MapKey for Sfixed32 {}
impl MapKey for Sfixed64 {}
