use crate::object::SerializableObject;
use crate::tag::TypeTag;

/// A dynamically-typed value graph: the tagged union over every wire kind.
///
/// `Value` is what [`decode_object`](crate::StreamTypedDecoder::decode_object)
/// returns and what [`encode_root_object`](crate::StreamTypedEncoder::encode_root_object)
/// accepts when the caller does not know the static type. The closed variant
/// set maps one-to-one onto [`TypeTag`]; a value the enum cannot represent is
/// a value the format cannot encode.
#[derive(Debug)]
pub enum Value {
    /// Absent value.
    Nil,
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    /// Native-width signed integer.
    Int(isize),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    /// Native-width unsigned integer.
    UInt(usize),
    Float32(f32),
    Float64(f64),
    Char(char),
    Str(String),
    /// Ordered, possibly-empty sequence.
    Array(Vec<Value>),
    /// Unique elements; first occurrence order. Build with [`Value::set`]
    /// to get deduplication on construction.
    Set(Vec<Value>),
    /// Unique keys, insertion order preserved. Build with [`Value::map`]
    /// to get key deduplication on construction.
    Map(Vec<(Value, Value)>),
    /// A user-defined serializable object.
    Object(Box<dyn SerializableObject>),
}

impl Value {
    /// Builds a set value, coalescing duplicates; the first occurrence of
    /// each element wins.
    pub fn set<I: IntoIterator<Item = Value>>(items: I) -> Value {
        let mut unique: Vec<Value> = Vec::new();
        for item in items {
            if !unique.contains(&item) {
                unique.push(item);
            }
        }
        Value::Set(unique)
    }

    /// Builds a map value with unique keys; a repeated key replaces the
    /// earlier value, dictionary-style, keeping the original position.
    pub fn map<I: IntoIterator<Item = (Value, Value)>>(entries: I) -> Value {
        let mut unique: Vec<(Value, Value)> = Vec::new();
        for (key, value) in entries {
            if let Some(slot) = unique.iter_mut().find(|(existing, _)| *existing == key) {
                slot.1 = value;
            } else {
                unique.push((key, value));
            }
        }
        Value::Map(unique)
    }

    /// Wraps a serializable object.
    pub fn object<T: SerializableObject>(object: T) -> Value {
        Value::Object(Box::new(object))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// The wire tag this value encodes under.
    pub fn tag(&self) -> TypeTag {
        match self {
            Value::Nil => TypeTag::Nil,
            Value::Bool(_) => TypeTag::Bool,
            Value::Int8(_) => TypeTag::Int8,
            Value::Int16(_) => TypeTag::Int16,
            Value::Int32(_) => TypeTag::Int32,
            Value::Int64(_) => TypeTag::Int64,
            Value::Int(_) => TypeTag::Int,
            Value::UInt8(_) => TypeTag::UInt8,
            Value::UInt16(_) => TypeTag::UInt16,
            Value::UInt32(_) => TypeTag::UInt32,
            Value::UInt64(_) => TypeTag::UInt64,
            Value::UInt(_) => TypeTag::UInt,
            Value::Float32(_) => TypeTag::Float32,
            Value::Float64(_) => TypeTag::Float64,
            Value::Char(_) => TypeTag::Char,
            Value::Str(_) => TypeTag::Str,
            Value::Array(_) => TypeTag::Array,
            Value::Set(_) => TypeTag::Set,
            Value::Map(_) => TypeTag::Map,
            Value::Object(_) => TypeTag::Object,
        }
    }
}

impl Clone for Value {
    fn clone(&self) -> Value {
        match self {
            Value::Nil => Value::Nil,
            Value::Bool(v) => Value::Bool(*v),
            Value::Int8(v) => Value::Int8(*v),
            Value::Int16(v) => Value::Int16(*v),
            Value::Int32(v) => Value::Int32(*v),
            Value::Int64(v) => Value::Int64(*v),
            Value::Int(v) => Value::Int(*v),
            Value::UInt8(v) => Value::UInt8(*v),
            Value::UInt16(v) => Value::UInt16(*v),
            Value::UInt32(v) => Value::UInt32(*v),
            Value::UInt64(v) => Value::UInt64(*v),
            Value::UInt(v) => Value::UInt(*v),
            Value::Float32(v) => Value::Float32(*v),
            Value::Float64(v) => Value::Float64(*v),
            Value::Char(v) => Value::Char(*v),
            Value::Str(v) => Value::Str(v.clone()),
            Value::Array(v) => Value::Array(v.clone()),
            Value::Set(v) => Value::Set(v.clone()),
            Value::Map(v) => Value::Map(v.clone()),
            Value::Object(v) => Value::Object(v.clone_object()),
        }
    }
}

/// Value-level equality: primitives and strings compare by value, arrays
/// element-wise in order, sets by mutual membership, maps by mutual
/// association, objects field-wise through their own equality. Variants
/// never compare equal across kinds.
///
/// Set and Map comparison checks containment in both directions, so the
/// relation stays symmetric even for hand-built variants carrying
/// duplicate elements or keys.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int8(a), Value::Int8(b)) => a == b,
            (Value::Int16(a), Value::Int16(b)) => a == b,
            (Value::Int32(a), Value::Int32(b)) => a == b,
            (Value::Int64(a), Value::Int64(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::UInt8(a), Value::UInt8(b)) => a == b,
            (Value::UInt16(a), Value::UInt16(b)) => a == b,
            (Value::UInt32(a), Value::UInt32(b)) => a == b,
            (Value::UInt64(a), Value::UInt64(b)) => a == b,
            (Value::UInt(a), Value::UInt(b)) => a == b,
            (Value::Float32(a), Value::Float32(b)) => a == b,
            (Value::Float64(a), Value::Float64(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => {
                a.iter().all(|item| b.contains(item))
                    && b.iter().all(|item| a.contains(item))
            }
            (Value::Map(a), Value::Map(b)) => {
                let contains = |entries: &[(Value, Value)], key: &Value, value: &Value| {
                    entries.iter().any(|(k, v)| k == key && v == value)
                };
                a.iter().all(|(key, value)| contains(b, key, value))
                    && b.iter().all(|(key, value)| contains(a, key, value))
            }
            (Value::Object(a), Value::Object(b)) => a.eq_object(b.as_ref()),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Value {
        Value::Bool(v)
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Value {
        Value::Int8(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Value {
        Value::Int16(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Value {
        Value::Int32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Value {
        Value::Int64(v)
    }
}

impl From<isize> for Value {
    fn from(v: isize) -> Value {
        Value::Int(v)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Value {
        Value::UInt8(v)
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Value {
        Value::UInt16(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Value {
        Value::UInt32(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Value {
        Value::UInt64(v)
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Value {
        Value::UInt(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Value {
        Value::Float32(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Value {
        Value::Float64(v)
    }
}

impl From<char> for Value {
    fn from(v: char) -> Value {
        Value::Char(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Value {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Value {
        Value::Str(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Value {
        Value::Array(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Value {
        match v {
            Some(inner) => inner.into(),
            None => Value::Nil,
        }
    }
}
