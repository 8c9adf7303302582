#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};

use bytes::Bytes;
use once_cell::sync::Lazy;
use protokelp::{
    impl_enumeration, Enumeration, Fixed32, Fixed64, Message, Oneof, ProtoValue, Schema, Sfixed32,
    Sfixed64, Sint32, Sint64, UnknownFields,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Level
{
    Low,
    Medium,
    High,
    Other(i32),
}

impl Default for Level
{
    fn default() -> Self
    {
        Level::Low
    }
}

impl Enumeration for Level
{
    fn to_i32(self) -> i32
    {
        match self {
            Level::Low => 0,
            Level::Medium => 1,
            Level::High => 2,
            Level::Other(v) => v,
        }
    }

    fn from_i32(value: i32) -> Self
    {
        match value {
            0 => Level::Low,
            1 => Level::Medium,
            2 => Level::High,
            v => Level::Other(v),
        }
    }
}

impl_enumeration!(Level);

/// One field of every scalar type.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scalars
{
    pub boolean: bool,
    pub int32: i32,
    pub int64: i64,
    pub uint32: u32,
    pub uint64: u64,
    pub sint32: Sint32,
    pub sint64: Sint64,
    pub float: f32,
    pub double: f64,
    pub fixed32: Fixed32,
    pub fixed64: Fixed64,
    pub sfixed32: Sfixed32,
    pub sfixed64: Sfixed64,
    pub string: String,
    pub bytes: Bytes,
    pub level: Level,
}

impl Message for Scalars
{
    fn schema() -> &'static Schema<Self>
    {
        static SCHEMA: Lazy<Schema<Scalars>> = Lazy::new(|| {
            Schema::<Scalars>::builder("Scalars")
                .field("boolean", 1, |m| &m.boolean, |m| &mut m.boolean)
                .field("int32", 2, |m| &m.int32, |m| &mut m.int32)
                .field("int64", 3, |m| &m.int64, |m| &mut m.int64)
                .field("uint32", 4, |m| &m.uint32, |m| &mut m.uint32)
                .field("uint64", 5, |m| &m.uint64, |m| &mut m.uint64)
                .field("sint32", 6, |m| &m.sint32, |m| &mut m.sint32)
                .field("sint64", 7, |m| &m.sint64, |m| &mut m.sint64)
                .field("float", 8, |m| &m.float, |m| &mut m.float)
                .field("double", 9, |m| &m.double, |m| &mut m.double)
                .field("fixed32", 10, |m| &m.fixed32, |m| &mut m.fixed32)
                .field("fixed64", 11, |m| &m.fixed64, |m| &mut m.fixed64)
                .field("sfixed32", 12, |m| &m.sfixed32, |m| &mut m.sfixed32)
                .field("sfixed64", 13, |m| &m.sfixed64, |m| &mut m.sfixed64)
                .field("string", 14, |m| &m.string, |m| &mut m.string)
                .field("bytes", 15, |m| &m.bytes, |m| &mut m.bytes)
                .field("level", 16, |m| &m.level, |m| &mut m.level)
                .build()
                .unwrap()
        });
        &SCHEMA
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Leaf
{
    pub id: u32,
    pub label: String,
    pub weights: BTreeMap<i32, f64>,
}

impl Message for Leaf
{
    fn schema() -> &'static Schema<Self>
    {
        static SCHEMA: Lazy<Schema<Leaf>> = Lazy::new(|| {
            Schema::<Leaf>::builder("Leaf")
                .field("id", 1, |m| &m.id, |m| &mut m.id)
                .field("label", 2, |m| &m.label, |m| &mut m.label)
                .map("weights", 3, |m| &m.weights, |m| &mut m.weights)
                .build()
                .unwrap()
        });
        &SCHEMA
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Choice
{
    Text(String),
    Number(Sint64),
    Leaf(Leaf),
}

impl Oneof for Choice
{
    const VARIANTS: u32 = 3;

    fn offset(&self) -> u32
    {
        match self {
            Choice::Text(_) => 0,
            Choice::Number(_) => 1,
            Choice::Leaf(_) => 2,
        }
    }

    fn value(&self) -> &dyn ProtoValue
    {
        match self {
            Choice::Text(v) => v,
            Choice::Number(v) => v,
            Choice::Leaf(v) => v,
        }
    }

    fn value_mut(&mut self) -> &mut dyn ProtoValue
    {
        match self {
            Choice::Text(v) => v,
            Choice::Number(v) => v,
            Choice::Leaf(v) => v,
        }
    }

    fn empty(offset: u32) -> Option<Self>
    {
        match offset {
            0 => Some(Choice::Text(String::new())),
            1 => Some(Choice::Number(Sint64(0))),
            2 => Some(Choice::Leaf(Leaf::default())),
            _ => None,
        }
    }
}

/// A recursive message using every container kind.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Node
{
    pub name: String,
    pub child: Option<Box<Node>>,
    pub leaves: Vec<Leaf>,
    pub attrs: HashMap<String, Leaf>,
    pub choice: Option<Choice>,
    pub maybe: Option<i32>,
}

impl Message for Node
{
    fn schema() -> &'static Schema<Self>
    {
        static SCHEMA: Lazy<Schema<Node>> = Lazy::new(|| {
            Schema::<Node>::builder("Node")
                .field("name", 1, |m| &m.name, |m| &mut m.name)
                .optional_boxed("child", 2, |m| &m.child, |m| &mut m.child)
                .repeated("leaves", 3, |m| &m.leaves, |m| &mut m.leaves)
                .map("attrs", 4, |m| &m.attrs, |m| &mut m.attrs)
                .oneof("choice", 5, |m| &m.choice, |m| &mut m.choice)
                .optional("maybe", 8, |m| &m.maybe, |m| &mut m.maybe)
                .build()
                .unwrap()
        });
        &SCHEMA
    }
}

/// A plain nested message field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Wrapper
{
    pub leaf: Leaf,
    pub note: String,
}

impl Message for Wrapper
{
    fn schema() -> &'static Schema<Self>
    {
        static SCHEMA: Lazy<Schema<Wrapper>> = Lazy::new(|| {
            Schema::<Wrapper>::builder("Wrapper")
                .field("leaf", 1, |m| &m.leaf, |m| &mut m.leaf)
                .field("note", 2, |m| &m.note, |m| &mut m.note)
                .build()
                .unwrap()
        });
        &SCHEMA
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Wide
{
    pub a: i32,
    pub b: String,
    pub c: Vec<u64>,
}

impl Message for Wide
{
    fn schema() -> &'static Schema<Self>
    {
        static SCHEMA: Lazy<Schema<Wide>> = Lazy::new(|| {
            Schema::<Wide>::builder("Wide")
                .field("a", 1, |m| &m.a, |m| &mut m.a)
                .field("b", 2, |m| &m.b, |m| &mut m.b)
                .repeated("c", 3, |m| &m.c, |m| &mut m.c)
                .build()
                .unwrap()
        });
        &SCHEMA
    }
}

/// Knows only the first field of `Wide` and keeps the rest.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Narrow
{
    pub a: i32,
    pub unknown: UnknownFields,
}

impl Message for Narrow
{
    fn schema() -> &'static Schema<Self>
    {
        static SCHEMA: Lazy<Schema<Narrow>> = Lazy::new(|| {
            Schema::<Narrow>::builder("Narrow")
                .field("a", 1, |m| &m.a, |m| &mut m.a)
                .unknown_fields(|m| &m.unknown, |m| &mut m.unknown)
                .build()
                .unwrap()
        });
        &SCHEMA
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Labels
{
    pub labels: HashMap<i32, String>,
    pub title: String,
}

impl Message for Labels
{
    fn schema() -> &'static Schema<Self>
    {
        static SCHEMA: Lazy<Schema<Labels>> = Lazy::new(|| {
            Schema::<Labels>::builder("Labels")
                .map("labels", 1, |m| &m.labels, |m| &mut m.labels)
                .field("title", 2, |m| &m.title, |m| &mut m.title)
                .build()
                .unwrap()
        });
        &SCHEMA
    }
}

/// A chain of `depth` nested nodes below the root.
pub fn chain(depth: usize) -> Node
{
    let mut node = Node {
        name: format!("depth {}", depth),
        ..Default::default()
    };
    for level in (0..depth).rev() {
        node = Node {
            name: format!("depth {}", level),
            child: Some(Box::new(node)),
            ..Default::default()
        };
    }
    node
}
