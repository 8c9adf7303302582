//!
//! Protokelp encodes and decodes Rust records in the protocol buffer binary format (proto2 wire
//! compatible) using schemas supplied at runtime instead of generated code.
//!
//! Each message type implements [`Message`] by handing out a [`Schema`] that binds field numbers
//! to accessors into the record. Encoding sizes the whole message first and then writes it in a
//! single pass into a buffer of exactly the right size. Decoding dispatches each field key to the
//! field registered under it; fields the schema doesn't know can be captured and are written back
//! unchanged on the next encode.
//!
//! ```
//! use once_cell::sync::Lazy;
//! use protokelp::{Message, Schema, UnknownFields};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Catch
//! {
//!     species: String,
//!     weight: f32,
//!     tags: Vec<u32>,
//! }
//!
//! impl Message for Catch
//! {
//!     fn schema() -> &'static Schema<Self>
//!     {
//!         static SCHEMA: Lazy<Schema<Catch>> = Lazy::new(|| {
//!             Schema::<Catch>::builder("Catch")
//!                 .field("species", 1, |c| &c.species, |c| &mut c.species)
//!                 .field("weight", 2, |c| &c.weight, |c| &mut c.weight)
//!                 .repeated("tags", 3, |c| &c.tags, |c| &mut c.tags)
//!                 .build()
//!                 .unwrap()
//!         });
//!         &SCHEMA
//!     }
//! }
//!
//! // An older version of the same message that only knows the species.
//! #[derive(Debug, Default)]
//! struct CatchV1
//! {
//!     species: String,
//!     unknown: UnknownFields,
//! }
//!
//! impl Message for CatchV1
//! {
//!     fn schema() -> &'static Schema<Self>
//!     {
//!         static SCHEMA: Lazy<Schema<CatchV1>> = Lazy::new(|| {
//!             Schema::<CatchV1>::builder("CatchV1")
//!                 .field("species", 1, |c| &c.species, |c| &mut c.species)
//!                 .unknown_fields(|c| &c.unknown, |c| &mut c.unknown)
//!                 .build()
//!                 .unwrap()
//!         });
//!         &SCHEMA
//!     }
//! }
//!
//! let catch = Catch { species: "Perch".into(), weight: 1.5, tags: vec![7, 9] };
//! let data = catch.encode_to_vec();
//! assert_eq!(data.len(), catch.encoded_len());
//!
//! let old = CatchV1::decode(&data).unwrap();
//! assert_eq!(old.species, "Perch");
//! assert_eq!(old.unknown.len(), 3);
//!
//! // The fields the old version didn't know survive the round trip.
//! assert_eq!(old.encode_to_vec(), data);
//! assert_eq!(Catch::decode(&old.encode_to_vec()).unwrap(), catch);
//! ```
#![warn(missing_docs)]

pub mod decode;
pub mod encode;
pub mod schema;
pub mod unknown;
pub mod value;
pub mod varint;
pub mod wire;

pub use decode::{decode, decode_bytes, decode_into, merge, DecodeError, DecodeOptions, Reader};
pub use encode::{encode, encode_to_bytes, encode_to_vec, encoded_len, SizeTable, Writer};
pub use schema::{ContainerKind, FieldDescriptor, Schema, SchemaBuilder, SchemaError};
pub use unknown::{UnknownField, UnknownFields};
pub use value::{
    Enumeration, Fixed32, Fixed64, MapKey, Message, Oneof, ProtoMap, ProtoValue, Sfixed32,
    Sfixed64, Sint32, Sint64,
};
pub use wire::WireType;
