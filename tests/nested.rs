mod common;

use std::collections::{BTreeMap, HashMap};

use common::{chain, Choice, Leaf, Node, Wrapper};
use protokelp::{DecodeError, DecodeOptions, Message, Sint64};

fn leaf(id: u32, label: &str, weights: &[(i32, f64)]) -> Leaf
{
    Leaf {
        id,
        label: label.to_string(),
        weights: weights.iter().cloned().collect::<BTreeMap<_, _>>(),
    }
}

fn deep_node() -> Node
{
    let mut innermost_attrs = HashMap::new();
    innermost_attrs.insert("".to_string(), Leaf::default());
    innermost_attrs.insert("gill".to_string(), leaf(4, "net", &[(0, 0.0), (-3, 2.5)]));

    let innermost = Node {
        name: "innermost".to_string(),
        leaves: vec![leaf(1, "a", &[]), Leaf::default()],
        attrs: innermost_attrs,
        choice: Some(Choice::Leaf(leaf(9, "chosen", &[(1, 0.5)]))),
        maybe: Some(-7),
        ..Default::default()
    };

    let middle = Node {
        name: "middle".to_string(),
        child: Some(Box::new(innermost)),
        choice: Some(Choice::Text(String::new())),
        maybe: Some(0),
        ..Default::default()
    };

    let mut root_attrs = HashMap::new();
    root_attrs.insert("fin".to_string(), leaf(2, "", &[(7, -1.0)]));

    Node {
        name: "root".to_string(),
        child: Some(Box::new(middle)),
        leaves: vec![leaf(3, "x", &[(1, 1.0), (2, 2.0)])],
        attrs: root_attrs,
        choice: Some(Choice::Number(Sint64(-5))),
        maybe: None,
    }
}

#[test]
fn size_matches_written_bytes()
{
    let node = deep_node();

    let data = node.encode_to_vec();
    assert_eq!(data.len(), node.encoded_len());
    assert_eq!(Node::decode(&data).unwrap(), node);
}

#[test]
fn nested_lengths_are_exact()
{
    use bytes::BufMut;

    let node = Node {
        name: "a".to_string(),
        child: Some(Box::new(Node {
            name: "b".to_string(),
            ..Default::default()
        })),
        ..Default::default()
    };

    let mut expected = bytes::BytesMut::new();
    expected.put_slice(b"\x0a\x01a"); // name
    expected.put_u8(2 << 3 | 2); // child
    expected.put_u8(3);
    expected.put_slice(b"\x0a\x01b");

    assert_eq!(node.encode_to_vec(), &expected[..]);
}

#[test]
fn long_nested_message_has_multibyte_length()
{
    let node = Node {
        child: Some(Box::new(Node {
            name: "x".repeat(200),
            ..Default::default()
        })),
        ..Default::default()
    };

    let data = node.encode_to_vec();

    // Child length is 203: one byte key, two byte length, 200 bytes.
    assert_eq!(&data[..3], b"\x12\xcb\x01");
    assert_eq!(data.len(), 3 + 203);
    assert_eq!(Node::decode(&data).unwrap(), node);
}

#[test]
fn present_optional_default_is_encoded()
{
    let node = Node {
        maybe: Some(0),
        ..Default::default()
    };

    let data = node.encode_to_vec();
    assert_eq!(data, b"\x40\x00");
    assert_eq!(Node::decode(&data).unwrap().maybe, Some(0));
    assert_eq!(Node::decode(b"").unwrap().maybe, None);
}

#[test]
fn repeated_messages_keep_order()
{
    let node = Node {
        leaves: vec![leaf(1, "", &[]), Leaf::default(), leaf(3, "c", &[])],
        ..Default::default()
    };

    let data = node.encode_to_vec();
    assert_eq!(Node::decode(&data).unwrap().leaves, node.leaves);
}

#[test]
fn plain_message_field_merges()
{
    // Two occurrences of `leaf`: {id: 5} and {label: "hi"}.
    let decoded = Wrapper::decode(b"\x0a\x02\x08\x05\x0a\x04\x12\x02hi").unwrap();
    assert_eq!(decoded.leaf, leaf(5, "hi", &[]));
}

#[test]
fn plain_message_field_is_always_encoded()
{
    assert_eq!(Wrapper::default().encode_to_vec(), b"\x0a\x00");
}

#[test]
fn optional_message_is_replaced()
{
    // Two occurrences of `child`: {name: "a"} and {maybe: 7}.
    let decoded = Node::decode(b"\x12\x03\x0a\x01a\x12\x02\x40\x07").unwrap();
    let child = decoded.child.unwrap();
    assert_eq!(child.name, "");
    assert_eq!(child.maybe, Some(7));
}

#[test]
fn merge_appends_repeated_and_keeps_scalars()
{
    let mut node = Node {
        name: "keep".to_string(),
        leaves: vec![leaf(1, "", &[])],
        ..Default::default()
    };

    let update = Node {
        leaves: vec![leaf(2, "", &[])],
        maybe: Some(3),
        ..Default::default()
    };

    node.merge(&update.encode_to_vec()).unwrap();
    assert_eq!(node.name, "keep");
    assert_eq!(node.leaves, vec![leaf(1, "", &[]), leaf(2, "", &[])]);
    assert_eq!(node.maybe, Some(3));
}

#[test]
fn recursion_limit()
{
    let data = chain(3).encode_to_vec();
    let options = DecodeOptions::new().recursion_limit(3);
    assert_eq!(options.decode::<Node>(&data).unwrap(), chain(3));

    let data = chain(4).encode_to_vec();
    assert!(matches!(
        options.decode::<Node>(&data),
        Err(DecodeError::RecursionLimitExceeded { limit: 3 })
    ));
}

#[test]
fn default_recursion_limit()
{
    assert_eq!(DecodeOptions::default().get_recursion_limit(), 100);

    let data = chain(100).encode_to_vec();
    assert_eq!(Node::decode(&data).unwrap(), chain(100));

    let data = chain(101).encode_to_vec();
    assert!(matches!(
        Node::decode(&data),
        Err(DecodeError::RecursionLimitExceeded { limit: 100 })
    ));
}
