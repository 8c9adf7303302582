mod common;

use bytes::Bytes;
use common::{Level, Scalars};
use protokelp::{Fixed32, Fixed64, Message, Sfixed32, Sfixed64, Sint32, Sint64};

#[test]
fn defaults_are_omitted()
{
    assert!(Scalars::default().encode_to_vec().is_empty());
    assert_eq!(Scalars::default().encoded_len(), 0);
    assert_eq!(Scalars::decode(b"").unwrap(), Scalars::default());
}

#[test]
fn extremes_round_trip()
{
    let original = Scalars {
        boolean: true,
        int32: i32::MIN,
        int64: i64::MIN,
        uint32: u32::MAX,
        uint64: u64::MAX,
        sint32: Sint32(i32::MIN),
        sint64: Sint64(i64::MAX),
        float: f32::MIN_POSITIVE,
        double: f64::MAX,
        fixed32: Fixed32(u32::MAX),
        fixed64: Fixed64(u64::MAX),
        sfixed32: Sfixed32(i32::MIN),
        sfixed64: Sfixed64(-1),
        string: "Atlantic salmon".to_string(),
        bytes: Bytes::from_static(b"\x00\x01\xff"),
        level: Level::High,
    };

    let data = original.encode_to_vec();
    assert_eq!(data.len(), original.encoded_len());
    assert_eq!(Scalars::decode(&data).unwrap(), original);
}

#[test]
fn small_values_round_trip()
{
    for value in &[-1i32, 1, -64, 63, 64] {
        let original = Scalars {
            int32: *value,
            int64: i64::from(*value),
            sint32: Sint32(*value),
            sint64: Sint64(i64::from(*value)),
            sfixed32: Sfixed32(*value),
            ..Default::default()
        };

        let data = original.encode_to_vec();
        assert_eq!(Scalars::decode(&data).unwrap(), original, "value {}", value);
    }
}

#[test]
fn known_encodings()
{
    use bytes::BufMut;

    let msg = Scalars {
        int32: -1,
        sint32: Sint32(-1),
        string: "hi".to_string(),
        level: Level::High,
        ..Default::default()
    };

    let mut expected = bytes::BytesMut::new();
    expected.put_u8(2 << 3); // int32, sign extended to ten bytes.
    expected.put_slice(b"\xff\xff\xff\xff\xff\xff\xff\xff\xff\x01");
    expected.put_u8(6 << 3); // sint32, zigzag.
    expected.put_u8(0x01);
    expected.put_u8(14 << 3 | 2); // string.
    expected.put_slice(b"\x02hi");
    expected.put_slice(b"\x80\x01"); // level; field 16 needs a two byte key.
    expected.put_u8(0x02);

    assert_eq!(msg.encode_to_vec(), &expected[..]);
    assert_eq!(msg.encoded_len(), expected.len());
}

#[test]
fn negative_zero_is_not_default()
{
    let msg = Scalars {
        double: -0.0,
        ..Default::default()
    };

    let data = msg.encode_to_vec();
    assert_eq!(data, b"\x49\x00\x00\x00\x00\x00\x00\x00\x80");

    let decoded = Scalars::decode(&data).unwrap();
    assert_eq!(decoded.double.to_bits(), (-0.0f64).to_bits());
}

#[test]
fn nan_payload_survives()
{
    let float = f32::from_bits(0x7fc0_1234);
    let double = f64::from_bits(0xfff8_0000_dead_beef);
    let msg = Scalars {
        float,
        double,
        ..Default::default()
    };

    let decoded = Scalars::decode(&msg.encode_to_vec()).unwrap();
    assert_eq!(decoded.float.to_bits(), float.to_bits());
    assert_eq!(decoded.double.to_bits(), double.to_bits());
}

#[test]
fn unrecognized_enum_value()
{
    // level = 9
    let decoded = Scalars::decode(b"\x80\x01\x09").unwrap();
    assert_eq!(decoded.level, Level::Other(9));
    assert_eq!(decoded.encode_to_vec(), b"\x80\x01\x09");
}

#[test]
fn later_occurrence_overwrites()
{
    let decoded = Scalars::decode(b"\x10\x01\x72\x01a\x10\x02\x72\x01b").unwrap();
    assert_eq!(decoded.int32, 2);
    assert_eq!(decoded.string, "b");
}

#[test]
fn encode_into_buffers()
{
    let msg = Scalars {
        uint64: 300,
        string: "perch".to_string(),
        ..Default::default()
    };
    let expected = msg.encode_to_vec();

    let mut buf = bytes::BytesMut::new();
    assert_eq!(msg.encode(&mut buf), expected.len());
    assert_eq!(&buf[..], &expected[..]);

    let mut out = vec![0u8; expected.len()];
    let mut slice = &mut out[..];
    assert_eq!(msg.encode(&mut slice), expected.len());
    assert_eq!(out, expected);

    assert_eq!(msg.encode_to_bytes(), Bytes::from(expected));
}

#[test]
#[should_panic]
fn undersized_buffer_panics()
{
    let msg = Scalars {
        string: "too long for the buffer".to_string(),
        ..Default::default()
    };

    let mut out = [0u8; 4];
    let mut slice = &mut out[..];
    msg.encode(&mut slice);
}
