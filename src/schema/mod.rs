//! Per-type schemas binding field numbers to the fields of a Rust record.
//!
//! A schema is built once per message type, usually into a static, and is immutable afterwards.
//! Schemas hold no state tied to a particular message value and can be shared between threads.
//!
//! ```
//! use once_cell::sync::Lazy;
//! use protokelp::{Message, Schema};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Person
//! {
//!     name: String,
//!     id: i32,
//!     emails: Vec<String>,
//! }
//!
//! impl Message for Person
//! {
//!     fn schema() -> &'static Schema<Self>
//!     {
//!         static SCHEMA: Lazy<Schema<Person>> = Lazy::new(|| {
//!             Schema::<Person>::builder("Person")
//!                 .field("name", 1, |p| &p.name, |p| &mut p.name)
//!                 .field("id", 2, |p| &p.id, |p| &mut p.id)
//!                 .repeated("emails", 3, |p| &p.emails, |p| &mut p.emails)
//!                 .build()
//!                 .unwrap()
//!         });
//!         &SCHEMA
//!     }
//! }
//!
//! let person = Person { name: "Ada".into(), id: 7, emails: vec!["ada@example.com".into()] };
//! let data = person.encode_to_vec();
//! assert_eq!(Person::decode(&data).unwrap(), person);
//! ```

use snafu::Snafu;
use std::collections::{BTreeMap, HashMap};

use crate::unknown::UnknownFields;
use crate::wire::WireType;

mod access;
mod api;
mod builder;

pub(crate) use access::FieldAccess;
pub use builder::SchemaBuilder;

/// Error raised while building a schema.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
#[non_exhaustive]
pub enum SchemaError
{
    /// A field number is outside the range the wire format allows.
    #[snafu(display("Invalid field number {} for '{}' in '{}'", number, field, message))]
    InvalidFieldNumber
    {
        /// Message type.
        message: String,

        /// Field name.
        field: String,

        /// The offending number.
        number: u64,
    },

    /// Two fields claim the same field number.
    #[snafu(display(
        "Field number {} of '{}' is already used by '{}' in '{}'",
        number,
        field,
        existing,
        message
    ))]
    DuplicateFieldNumber
    {
        /// Message type.
        message: String,

        /// Field that was registered last.
        field: String,

        /// Field that already had the number.
        existing: String,

        /// The shared number.
        number: u32,
    },

    /// Two fields have the same name.
    #[snafu(display("Duplicate field '{}' in '{}'", field, message))]
    DuplicateFieldName
    {
        /// Message type.
        message: String,

        /// Field name.
        field: String,
    },

    /// A oneof type declares no alternatives.
    #[snafu(display("Oneof '{}' in '{}' has no variants", field, message))]
    EmptyOneof
    {
        /// Message type.
        message: String,

        /// Oneof name.
        field: String,
    },

    /// A oneof type can't produce the alternative at an offset below its variant count.
    #[snafu(display("Oneof '{}' in '{}' has no variant at offset {}", field, message, offset))]
    MissingOneofVariant
    {
        /// Message type.
        message: String,

        /// Oneof name.
        field: String,

        /// The missing offset.
        offset: u32,
    },

    /// More than one unknown field sink was registered.
    #[snafu(display("Multiple unknown field sinks in '{}'", message))]
    DuplicateUnknownSink
    {
        /// Message type.
        message: String,
    },
}

/// How a field stores its value in the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind
{
    /// A plain value, omitted from the encoding while it holds its default.
    Scalar,

    /// An `Option`; present values are always encoded.
    Optional,

    /// A `Vec`, encoded as one occurrence per element.
    Repeated,

    /// A map, encoded as one key/value entry message per element.
    Map,

    /// A group of mutually exclusive alternatives held in an `Option` of a [`Oneof`] enum.
    ///
    /// [`Oneof`]: crate::Oneof
    OneofMember,
}

/// Field information.
pub struct FieldDescriptor<M>
{
    /// Field name.
    pub name: String,

    /// Field number. For oneof groups this is the number of the first alternative.
    pub number: u32,

    /// Wire type of the field's values. For oneof groups this is the wire type of the first
    /// alternative.
    pub wire_type: WireType,

    /// Container kind.
    pub kind: ContainerKind,

    /// Wire types of the alternatives of a oneof group, indexed by offset. Empty for other
    /// fields.
    pub variants: Vec<WireType>,

    pub(crate) access: Box<dyn FieldAccess<M> + Send + Sync>,
}

impl<M> FieldDescriptor<M>
{
    /// Field numbers the field occupies on the wire.
    pub fn numbers(&self) -> std::ops::Range<u32>
    {
        let count = std::cmp::max(self.variants.len() as u32, 1);
        self.number..self.number + count
    }
}

impl<M> std::fmt::Debug for FieldDescriptor<M>
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("number", &self.number)
            .field("wire_type", &self.wire_type)
            .field("kind", &self.kind)
            .field("variants", &self.variants)
            .finish()
    }
}

/// The fields of a message type.
///
/// Built with [`Schema::builder`].
pub struct Schema<M>
{
    name: String,
    fields: BTreeMap<u32, FieldDescriptor<M>>,
    routes: BTreeMap<u32, Route>,
    fields_by_name: HashMap<String, u32>,
    unknown: Option<UnknownAccess<M>>,
}

impl<M> std::fmt::Debug for Schema<M>
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("fields", &self.fields.values().collect::<Vec<_>>())
            .field("unknown_fields", &self.unknown.is_some())
            .finish()
    }
}

/// Where an on-wire field number leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Route
{
    /// Key of the owning field in `Schema::fields`.
    pub head: u32,

    /// Offset of the number from the head; zero outside oneof groups.
    pub offset: u32,

    pub wire_type: WireType,
}

struct UnknownAccess<M>
{
    get: fn(&M) -> &UnknownFields,
    get_mut: fn(&mut M) -> &mut UnknownFields,
}
