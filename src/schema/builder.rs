use log::debug;
use snafu::ensure;

use super::access::{Map, OneofField, Optional, OptionalBoxed, Repeated, Scalar};
use super::*;
use crate::value::{Oneof, ProtoMap, ProtoValue};
use crate::wire::{MAX_FIELD_NUMBER, MIN_FIELD_NUMBER};

/// Collects the fields of a message type.
///
/// Every method takes the field name, its number and a pair of accessors into the record. The
/// accessors are plain functions, so non-capturing closures such as `|m| &m.name` work. Problems
/// are reported once by [`build`](SchemaBuilder::build).
pub struct SchemaBuilder<M>
{
    name: String,
    fields: Vec<PendingField<M>>,
    unknown: Vec<UnknownAccess<M>>,
}

struct PendingField<M>
{
    descriptor: FieldDescriptor<M>,

    // Oneof groups: the first offset the oneof type couldn't produce.
    missing_variant: Option<u32>,
}

impl<M> Schema<M>
{
    /// Starts building the schema of the message type called `name`.
    pub fn builder(name: &str) -> SchemaBuilder<M>
    {
        SchemaBuilder {
            name: name.to_string(),
            fields: vec![],
            unknown: vec![],
        }
    }
}

impl<M: 'static> SchemaBuilder<M>
{
    /// Adds a plain field. Default values are left out of the encoding.
    pub fn field<V>(
        self,
        name: &str,
        number: u32,
        get: fn(&M) -> &V,
        get_mut: fn(&mut M) -> &mut V,
    ) -> Self
    where
        V: ProtoValue + Default + 'static,
    {
        let wire_type = V::default().wire_type();
        self.push(
            name,
            number,
            wire_type,
            ContainerKind::Scalar,
            Box::new(Scalar { get, get_mut }),
        )
    }

    /// Adds a field with explicit presence.
    pub fn optional<V>(
        self,
        name: &str,
        number: u32,
        get: fn(&M) -> &Option<V>,
        get_mut: fn(&mut M) -> &mut Option<V>,
    ) -> Self
    where
        V: ProtoValue + Default + 'static,
    {
        let wire_type = V::default().wire_type();
        self.push(
            name,
            number,
            wire_type,
            ContainerKind::Optional,
            Box::new(Optional { get, get_mut }),
        )
    }

    /// Adds an optional field stored behind a `Box`, as needed for a message holding a value of
    /// its own type.
    pub fn optional_boxed<V>(
        self,
        name: &str,
        number: u32,
        get: fn(&M) -> &Option<Box<V>>,
        get_mut: fn(&mut M) -> &mut Option<Box<V>>,
    ) -> Self
    where
        V: ProtoValue + Default + 'static,
    {
        let wire_type = V::default().wire_type();
        self.push(
            name,
            number,
            wire_type,
            ContainerKind::Optional,
            Box::new(OptionalBoxed { get, get_mut }),
        )
    }

    /// Adds a repeated field. Elements are encoded as separate occurrences of the field.
    pub fn repeated<V>(
        self,
        name: &str,
        number: u32,
        get: fn(&M) -> &Vec<V>,
        get_mut: fn(&mut M) -> &mut Vec<V>,
    ) -> Self
    where
        V: ProtoValue + Default + 'static,
    {
        let wire_type = V::default().wire_type();
        self.push(
            name,
            number,
            wire_type,
            ContainerKind::Repeated,
            Box::new(Repeated {
                get,
                get_mut,
                wire_type,
            }),
        )
    }

    /// Adds a map field.
    pub fn map<T>(
        self,
        name: &str,
        number: u32,
        get: fn(&M) -> &T,
        get_mut: fn(&mut M) -> &mut T,
    ) -> Self
    where
        T: ProtoMap + 'static,
    {
        self.push(
            name,
            number,
            WireType::LengthDelimited,
            ContainerKind::Map,
            Box::new(Map { get, get_mut }),
        )
    }

    /// Adds a oneof group whose alternatives use the numbers `number` to
    /// `number + O::VARIANTS - 1`.
    pub fn oneof<O>(
        mut self,
        name: &str,
        number: u32,
        get: fn(&M) -> &Option<O>,
        get_mut: fn(&mut M) -> &mut Option<O>,
    ) -> Self
    where
        O: Oneof + 'static,
    {
        let mut variants = Vec::with_capacity(O::VARIANTS as usize);
        let mut missing_variant = None;
        for offset in 0..O::VARIANTS {
            match O::empty(offset) {
                Some(variant) => variants.push(variant.value().wire_type()),
                None => {
                    missing_variant = Some(offset);
                    break;
                }
            }
        }

        self.fields.push(PendingField {
            descriptor: FieldDescriptor {
                name: name.to_string(),
                number,
                wire_type: variants.first().copied().unwrap_or(WireType::LengthDelimited),
                kind: ContainerKind::OneofMember,
                variants,
                access: Box::new(OneofField { get, get_mut }),
            },
            missing_variant,
        });
        self
    }

    /// Registers the sink that captures fields the schema doesn't declare.
    pub fn unknown_fields(
        mut self,
        get: fn(&M) -> &UnknownFields,
        get_mut: fn(&mut M) -> &mut UnknownFields,
    ) -> Self
    {
        self.unknown.push(UnknownAccess { get, get_mut });
        self
    }

    /// Validates the fields and builds the schema.
    pub fn build(self) -> Result<Schema<M>, SchemaError>
    {
        let message = self.name;
        ensure!(
            self.unknown.len() <= 1,
            DuplicateUnknownSink { message: &message }
        );

        let mut fields: BTreeMap<u32, FieldDescriptor<M>> = BTreeMap::new();
        let mut routes: BTreeMap<u32, Route> = BTreeMap::new();
        let mut fields_by_name: HashMap<String, u32> = HashMap::new();
        for pending in self.fields {
            let field = pending.descriptor;

            if field.kind == ContainerKind::OneofMember {
                ensure!(
                    !field.variants.is_empty() || pending.missing_variant.is_some(),
                    EmptyOneof {
                        message: &message,
                        field: &field.name,
                    }
                );
                if let Some(offset) = pending.missing_variant {
                    return MissingOneofVariant {
                        message: &message,
                        field: &field.name,
                        offset,
                    }
                    .fail();
                }
            }

            let count = std::cmp::max(field.variants.len(), 1) as u64;
            let last = u64::from(field.number) + count - 1;
            ensure!(
                field.number >= MIN_FIELD_NUMBER && last <= u64::from(MAX_FIELD_NUMBER),
                InvalidFieldNumber {
                    message: &message,
                    field: &field.name,
                    number: if field.number < MIN_FIELD_NUMBER {
                        u64::from(field.number)
                    } else {
                        last
                    },
                }
            );

            ensure!(
                !fields_by_name.contains_key(&field.name),
                DuplicateFieldName {
                    message: &message,
                    field: &field.name,
                }
            );

            for (offset, number) in field.numbers().enumerate() {
                if let Some(existing) = routes.get(&number) {
                    return DuplicateFieldNumber {
                        message: &message,
                        field: &field.name,
                        existing: &fields[&existing.head].name,
                        number,
                    }
                    .fail();
                }

                let wire_type = match field.variants.get(offset) {
                    Some(wire_type) => *wire_type,
                    None => field.wire_type,
                };
                routes.insert(
                    number,
                    Route {
                        head: field.number,
                        offset: offset as u32,
                        wire_type,
                    },
                );
            }

            fields_by_name.insert(field.name.clone(), field.number);
            fields.insert(field.number, field);
        }

        debug!(
            "Built schema {} with {} fields ({} wire numbers)",
            message,
            fields.len(),
            routes.len()
        );

        let unknown = self.unknown.into_iter().next();
        Ok(Schema {
            name: message,
            fields,
            routes,
            fields_by_name,
            unknown,
        })
    }

    fn push(
        mut self,
        name: &str,
        number: u32,
        wire_type: WireType,
        kind: ContainerKind,
        access: Box<dyn FieldAccess<M> + Send + Sync>,
    ) -> Self
    {
        self.fields.push(PendingField {
            descriptor: FieldDescriptor {
                name: name.to_string(),
                number,
                wire_type,
                kind,
                variants: vec![],
                access,
            },
            missing_variant: None,
        });
        self
    }
}
