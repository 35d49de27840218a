use std::fmt::Debug;

use stream_typed_coder::{
    decode, encode, Decoder, Encoder, StreamTypedDecoder, StreamTypedEncoder, TypeRegistry,
    TypeTag, Value,
};

fn round_trip<T>(value: T)
where
    T: Encoder + Decoder + PartialEq + Debug,
{
    let data = encode(&value).unwrap();
    let back: T = decode(data).unwrap();
    assert_eq!(value, back);
}

#[test]
fn test_bool() {
    round_trip(true);
    round_trip(false);
}

#[test]
fn test_unsigned_integers() {
    for value in [u8::MIN, 1, 127, u8::MAX] {
        round_trip(value);
    }
    for value in [u16::MIN, 1, 0x1234, u16::MAX] {
        round_trip(value);
    }
    for value in [u32::MIN, 1, 0xDEAD_BEEF, u32::MAX] {
        round_trip(value);
    }
    for value in [u64::MIN, 1, 0x0123_4567_89AB_CDEF, u64::MAX] {
        round_trip(value);
    }
    for value in [usize::MIN, 1, usize::MAX] {
        round_trip(value);
    }
}

#[test]
fn test_signed_integers() {
    for value in [i8::MIN, -1, 0, 1, i8::MAX] {
        round_trip(value);
    }
    for value in [i16::MIN, -1, 0, 1, i16::MAX] {
        round_trip(value);
    }
    for value in [i32::MIN, -1, 0, 1, i32::MAX] {
        round_trip(value);
    }
    for value in [i64::MIN, -1, 0, 1, i64::MAX] {
        round_trip(value);
    }
    for value in [isize::MIN, -1, 0, 1, isize::MAX] {
        round_trip(value);
    }
}

#[test]
fn test_signed_integer_64_minimum() {
    // The minimum must come back exactly, never overflow-wrapped or unsigned.
    let value: i64 = -9223372036854775808;
    let data = encode(&value).unwrap();
    let back: i64 = decode(data).unwrap();
    assert_eq!(back, -9223372036854775808);
}

#[test]
fn test_floats() {
    for value in [0.0f32, -0.0, 1.5, -3.25, f32::MAX, f32::MIN_POSITIVE, f32::INFINITY] {
        round_trip(value);
    }
    for value in [0.0f64, -0.0, 3.141592653589793, -2.5e10, f64::MAX, f64::NEG_INFINITY] {
        round_trip(value);
    }
}

#[test]
fn test_float_nan_round_trips_as_nan() {
    let data = encode(&f64::NAN).unwrap();
    let back: f64 = decode(data).unwrap();
    assert!(back.is_nan());
}

#[test]
fn test_char() {
    for value in ['\0', 'a', 'Я', 'こ', '🚀'] {
        round_trip(value);
    }
}

#[test]
fn test_string() {
    for value in ["", "hello", "Привет, мир", "emoji 🎄 inside"] {
        round_trip(value.to_string());
    }
}

#[test]
fn test_option() {
    round_trip::<Option<i32>>(Some(42));
    round_trip::<Option<i32>>(None);
    round_trip::<Option<String>>(Some("present".to_string()));
    round_trip::<Option<String>>(None);
}

#[test]
fn test_nil_is_a_single_tag_byte() {
    let data = encode(&Value::Nil).unwrap();
    assert_eq!(data.as_ref(), &[TypeTag::Nil.byte()]);
}

#[test]
fn test_every_encoding_starts_with_its_tag_byte() {
    assert_eq!(encode(&true).unwrap()[0], TypeTag::Bool.byte());
    assert_eq!(encode(&1i8).unwrap()[0], TypeTag::Int8.byte());
    assert_eq!(encode(&1i16).unwrap()[0], TypeTag::Int16.byte());
    assert_eq!(encode(&1i32).unwrap()[0], TypeTag::Int32.byte());
    assert_eq!(encode(&1i64).unwrap()[0], TypeTag::Int64.byte());
    assert_eq!(encode(&1isize).unwrap()[0], TypeTag::Int.byte());
    assert_eq!(encode(&1u8).unwrap()[0], TypeTag::UInt8.byte());
    assert_eq!(encode(&1u16).unwrap()[0], TypeTag::UInt16.byte());
    assert_eq!(encode(&1u32).unwrap()[0], TypeTag::UInt32.byte());
    assert_eq!(encode(&1u64).unwrap()[0], TypeTag::UInt64.byte());
    assert_eq!(encode(&1usize).unwrap()[0], TypeTag::UInt.byte());
    assert_eq!(encode(&1.0f32).unwrap()[0], TypeTag::Float32.byte());
    assert_eq!(encode(&1.0f64).unwrap()[0], TypeTag::Float64.byte());
    assert_eq!(encode(&'a').unwrap()[0], TypeTag::Char.byte());
    assert_eq!(encode(&"a".to_string()).unwrap()[0], TypeTag::Str.byte());
    assert_eq!(encode(&vec![1u8]).unwrap()[0], TypeTag::Array.byte());
}

#[test]
fn test_scalar_payload_widths() {
    // One tag byte plus the fixed-width payload.
    assert_eq!(encode(&true).unwrap().len(), 2);
    assert_eq!(encode(&1i8).unwrap().len(), 2);
    assert_eq!(encode(&1i16).unwrap().len(), 3);
    assert_eq!(encode(&1i32).unwrap().len(), 5);
    assert_eq!(encode(&1i64).unwrap().len(), 9);
    assert_eq!(encode(&1isize).unwrap().len(), 9);
    assert_eq!(encode(&1usize).unwrap().len(), 9);
    assert_eq!(encode(&1.0f32).unwrap().len(), 5);
    assert_eq!(encode(&1.0f64).unwrap().len(), 9);
    assert_eq!(encode(&'a').unwrap().len(), 5);
}

#[test]
fn test_dynamic_primitive_round_trips() {
    let values = vec![
        Value::Nil,
        Value::Bool(true),
        Value::Int8(i8::MIN),
        Value::Int16(-300),
        Value::Int32(70_000),
        Value::Int64(i64::MIN),
        Value::Int(-1),
        Value::UInt8(200),
        Value::UInt16(50_000),
        Value::UInt32(u32::MAX),
        Value::UInt64(u64::MAX),
        Value::UInt(42),
        Value::Float32(1.25),
        Value::Float64(-0.5),
        Value::Char('λ'),
        Value::Str("round trip".to_string()),
    ];
    let registry = TypeRegistry::new();
    for value in values {
        let mut encoder = StreamTypedEncoder::new();
        encoder.encode_root_object(&value).unwrap();
        let mut decoder = StreamTypedDecoder::new(encoder.finish(), &registry);
        let back = decoder.decode_object().unwrap();
        assert_eq!(value, back);
        assert!(decoder.is_empty());
    }
}

#[test]
fn test_typed_decode_consumes_exactly_what_encode_produced() {
    let mut encoder = StreamTypedEncoder::new();
    encoder.encode_root_object(&"abc".to_string()).unwrap();
    encoder.encode_root_object(&7u16).unwrap();
    encoder.encode_root_object(&Some('x')).unwrap();

    let registry = TypeRegistry::new();
    let mut decoder = StreamTypedDecoder::new(encoder.finish(), &registry);
    assert_eq!(decoder.decode::<String>().unwrap(), "abc");
    assert_eq!(decoder.decode::<u16>().unwrap(), 7);
    assert_eq!(decoder.decode::<Option<char>>().unwrap(), Some('x'));
    assert!(decoder.is_empty());
}
