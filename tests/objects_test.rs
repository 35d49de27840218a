use std::collections::HashSet;

use indexmap::{indexmap, IndexMap};
use stream_typed_coder::{
    decode, decode_object, encode, CoderError, Decode, Encode, SerializableObject,
    StreamTypedDecoder, StreamTypedEncoder, TypeRegistry, Value,
};

#[derive(Encode, Decode, Debug, Clone, PartialEq)]
struct BoolModel {
    value: bool,
}

#[derive(Encode, Decode, Debug, Clone, PartialEq)]
struct SignedInteger64Model {
    int64: i64,
}

#[derive(Encode, Decode, Debug, Clone, PartialEq, Eq, Hash)]
struct StringModel {
    string: String,
}

#[derive(Encode, Decode, Debug, Clone, PartialEq)]
struct VehicleModel {
    model: String,
    color: String,
}

#[derive(Encode, Decode, Debug, Clone, PartialEq)]
struct MixedModel {
    bool_value: Option<bool>,
    float64: Option<f64>,
    uint32: Option<u32>,
    int64: Option<i64>,
    string: Option<String>,
    nested: Option<SignedInteger64Model>,
    string_array: Option<Vec<String>>,
    nested_array: Option<Vec<SignedInteger64Model>>,
    string_map: Option<IndexMap<String, String>>,
    nested_map: Option<IndexMap<String, SignedInteger64Model>>,
}

fn sample_mixed_model() -> MixedModel {
    MixedModel {
        bool_value: Some(true),
        float64: Some(-3.5),
        uint32: Some(u32::MAX),
        int64: Some(i64::MIN),
        string: Some("mixed".to_string()),
        nested: Some(SignedInteger64Model { int64: -1 }),
        string_array: Some(vec!["a".to_string(), "b".to_string()]),
        nested_array: Some(vec![
            SignedInteger64Model { int64: 1 },
            SignedInteger64Model { int64: 2 },
        ]),
        string_map: Some(indexmap! { "key".to_string() => "value".to_string() }),
        nested_map: Some(indexmap! {
            "min".to_string() => SignedInteger64Model { int64: i64::MIN },
        }),
    }
}

#[test]
fn test_simple_model_round_trip() {
    let model = BoolModel { value: true };
    let data = encode(&model).unwrap();
    let back: BoolModel = decode(data).unwrap();
    assert_eq!(model, back);
}

#[test]
fn test_signed_integer_64_model_minimum() {
    let model = SignedInteger64Model {
        int64: -9223372036854775808,
    };
    let data = encode(&model).unwrap();
    let back: SignedInteger64Model = decode(data).unwrap();
    assert_eq!(model, back);
}

#[test]
fn test_two_field_model_round_trip() {
    let model = VehicleModel {
        model: "Tesla Model S".to_string(),
        color: "red".to_string(),
    };
    let data = encode(&model).unwrap();
    let back: VehicleModel = decode(data).unwrap();
    assert_eq!(model, back);
}

#[test]
fn test_mixed_model_round_trip() {
    let model = sample_mixed_model();
    let data = encode(&model).unwrap();
    let back: MixedModel = decode(data).unwrap();
    assert_eq!(model, back);
}

#[test]
fn test_mixed_model_with_every_field_absent() {
    let model = MixedModel {
        bool_value: None,
        float64: None,
        uint32: None,
        int64: None,
        string: None,
        nested: None,
        string_array: None,
        nested_array: None,
        string_map: None,
        nested_map: None,
    };
    let data = encode(&model).unwrap();
    let back: MixedModel = decode(data).unwrap();
    assert_eq!(model, back);
}

#[test]
fn test_vec_of_models() {
    let models = vec![
        SignedInteger64Model { int64: 1 },
        SignedInteger64Model { int64: -2 },
    ];
    let data = encode(&models).unwrap();
    let back: Vec<SignedInteger64Model> = decode(data).unwrap();
    assert_eq!(models, back);
}

#[test]
fn test_hash_set_of_models() {
    let models: HashSet<StringModel> = [
        StringModel {
            string: "first".to_string(),
        },
        StringModel {
            string: "second".to_string(),
        },
    ]
    .into_iter()
    .collect();
    let data = encode(&models).unwrap();
    let back: HashSet<StringModel> = decode(data).unwrap();
    assert_eq!(models, back);
}

#[test]
fn test_type_ident_defaults_to_struct_name() {
    let model = BoolModel { value: false };
    assert_eq!(model.type_ident(), "BoolModel");
    assert_eq!(model.field_count(), 1);
}

#[test]
fn test_object_header_carries_the_ident_token() {
    let data = encode(&VehicleModel {
        model: "m".to_string(),
        color: "c".to_string(),
    })
    .unwrap();
    let needle = b"VehicleModel";
    assert!(data
        .windows(needle.len())
        .any(|window| window == needle));
}

#[test]
fn test_dynamic_object_round_trip() {
    let mut registry = TypeRegistry::new();
    registry.register::<VehicleModel>();
    assert!(registry.is_registered("VehicleModel"));

    let value = Value::object(VehicleModel {
        model: "Phantom".to_string(),
        color: "black".to_string(),
    });
    let data = encode(&value).unwrap();
    let back = decode_object(data, &registry).unwrap();
    assert_eq!(value, back);
}

#[test]
fn test_dynamic_decode_rejects_unregistered_types() {
    let value = Value::object(BoolModel { value: true });
    let data = encode(&value).unwrap();

    let registry = TypeRegistry::new();
    let err = decode_object(data, &registry).unwrap_err();
    match err {
        CoderError::UnregisteredType(ident) => assert_eq!(ident, "BoolModel"),
        other => panic!("expected UnregisteredType, got {:?}", other),
    }
}

#[test]
fn test_value_set_of_objects_coalesces_equal_models() {
    let set = Value::set(vec![
        Value::object(StringModel {
            string: "dup".to_string(),
        }),
        Value::object(StringModel {
            string: "unique".to_string(),
        }),
        Value::object(StringModel {
            string: "dup".to_string(),
        }),
    ]);
    match &set {
        Value::Set(items) => assert_eq!(items.len(), 2),
        other => panic!("expected a set, got {:?}", other),
    }

    let mut registry = TypeRegistry::new();
    registry.register::<StringModel>();
    let data = encode(&set).unwrap();
    let back = decode_object(data, &registry).unwrap();
    assert_eq!(set, back);
}

#[test]
fn test_object_equality_never_crosses_types() {
    let a = Value::object(BoolModel { value: true });
    let b = Value::object(StringModel {
        string: "true".to_string(),
    });
    assert_ne!(a, b);
}

#[derive(Encode, Decode, Debug, Clone, PartialEq)]
#[stream(ident = "legacy.ColorModel")]
struct RenamedModel {
    name: String,
}

#[test]
fn test_ident_override_round_trip() {
    let model = RenamedModel {
        name: "crimson".to_string(),
    };
    assert_eq!(model.type_ident(), "legacy.ColorModel");

    let data = encode(&model).unwrap();
    let needle = b"legacy.ColorModel";
    assert!(data
        .windows(needle.len())
        .any(|window| window == needle));

    let back: RenamedModel = decode(data).unwrap();
    assert_eq!(model, back);
}

#[test]
fn test_ident_override_through_the_registry() {
    let mut registry = TypeRegistry::new();
    registry.register::<RenamedModel>();
    assert!(registry.is_registered("legacy.ColorModel"));
    assert!(!registry.is_registered("RenamedModel"));

    let value = Value::object(RenamedModel {
        name: "teal".to_string(),
    });
    let data = encode(&value).unwrap();
    let back = decode_object(data, &registry).unwrap();
    assert_eq!(value, back);
}

// Two revisions of the same logical type, sharing one ident token with
// different field counts.
#[derive(Encode, Decode, Debug, Clone, PartialEq)]
#[stream(ident = "Versioned")]
struct VersionedV1 {
    a: i32,
    b: i32,
}

#[derive(Encode, Decode, Debug, Clone, PartialEq)]
#[stream(ident = "Versioned")]
struct VersionedV2 {
    a: i32,
    b: i32,
    c: i32,
}

#[test]
fn test_field_count_mismatch_on_typed_decode() {
    let data = encode(&VersionedV2 { a: 1, b: 2, c: 3 }).unwrap();
    let err = decode::<VersionedV1>(data).unwrap_err();
    match err {
        CoderError::FieldCountMismatch {
            ident,
            declared,
            expected,
        } => {
            assert_eq!(ident, "Versioned");
            assert_eq!(declared, 3);
            assert_eq!(expected, 2);
        }
        other => panic!("expected FieldCountMismatch, got {:?}", other),
    }
}

#[test]
fn test_field_count_mismatch_on_dynamic_decode() {
    let mut registry = TypeRegistry::new();
    registry.register::<VersionedV1>();

    let data = encode(&Value::object(VersionedV2 { a: 1, b: 2, c: 3 })).unwrap();
    let err = decode_object(data, &registry).unwrap_err();
    assert!(matches!(err, CoderError::FieldCountMismatch { .. }));
}

#[test]
fn test_typed_decode_rejects_a_foreign_ident() {
    let data = encode(&BoolModel { value: true }).unwrap();
    let err = decode::<RenamedModel>(data).unwrap_err();
    assert!(matches!(err, CoderError::Malformed(_)));
}

#[test]
fn test_multiple_objects_in_one_stream() {
    let mut encoder = StreamTypedEncoder::new();
    encoder
        .encode_root_object(&BoolModel { value: true })
        .unwrap();
    encoder
        .encode_root_object(&SignedInteger64Model { int64: 99 })
        .unwrap();

    let registry = TypeRegistry::new();
    let mut decoder = StreamTypedDecoder::new(encoder.finish(), &registry);
    assert_eq!(
        decoder.decode::<BoolModel>().unwrap(),
        BoolModel { value: true }
    );
    assert_eq!(
        decoder.decode::<SignedInteger64Model>().unwrap(),
        SignedInteger64Model { int64: 99 }
    );
    assert!(decoder.is_empty());
}
