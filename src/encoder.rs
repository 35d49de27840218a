use std::any::Any;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::Hash;
use std::sync::Arc;

use bytes::Bytes;
use indexmap::{IndexMap, IndexSet};

use crate::object::SerializableObject;
use crate::value::Value;
use crate::writer::StreamWriter;
use crate::{CoderError, Encoder, Result};

/// Serializes a root value and everything reachable from it into a byte
/// buffer.
///
/// The encoder owns its [`StreamWriter`] exclusively for the duration of the
/// encode call; it is stateless across calls apart from the accumulated
/// buffer. Encoding is fail-fast: nothing is rolled back on error, the
/// caller discards the buffer.
#[derive(Debug, Default)]
pub struct StreamTypedEncoder {
    writer: StreamWriter,
}

impl StreamTypedEncoder {
    pub fn new() -> Self {
        StreamTypedEncoder {
            writer: StreamWriter::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        StreamTypedEncoder {
            writer: StreamWriter::with_capacity(capacity),
        }
    }

    /// Encodes one root value. The root is simply the first value in the
    /// stream; nested values are encoded recursively through the same
    /// dispatch.
    pub fn encode_root_object<T: Encoder>(&mut self, value: &T) -> Result<()> {
        value.encode(self)
    }

    /// Classifies a value's runtime type against the closed set of
    /// supported primitive kinds and encodes it on a match.
    ///
    /// Anything outside the set is a hard error carrying the offending
    /// type's name: an integration defect, not a runtime condition. Typed
    /// callers should prefer [`encode_root_object`](Self::encode_root_object),
    /// which rules this error out statically.
    pub fn encode_any<T: Any>(&mut self, value: &T) -> Result<()> {
        let any = value as &dyn Any;
        if let Some(v) = any.downcast_ref::<bool>() {
            self.writer.write_bool(*v);
        } else if let Some(v) = any.downcast_ref::<i8>() {
            self.writer.write_i8(*v);
        } else if let Some(v) = any.downcast_ref::<i16>() {
            self.writer.write_i16(*v);
        } else if let Some(v) = any.downcast_ref::<i32>() {
            self.writer.write_i32(*v);
        } else if let Some(v) = any.downcast_ref::<i64>() {
            self.writer.write_i64(*v);
        } else if let Some(v) = any.downcast_ref::<isize>() {
            self.writer.write_int(*v);
        } else if let Some(v) = any.downcast_ref::<u8>() {
            self.writer.write_u8(*v);
        } else if let Some(v) = any.downcast_ref::<u16>() {
            self.writer.write_u16(*v);
        } else if let Some(v) = any.downcast_ref::<u32>() {
            self.writer.write_u32(*v);
        } else if let Some(v) = any.downcast_ref::<u64>() {
            self.writer.write_u64(*v);
        } else if let Some(v) = any.downcast_ref::<usize>() {
            self.writer.write_uint(*v);
        } else if let Some(v) = any.downcast_ref::<f32>() {
            self.writer.write_f32(*v);
        } else if let Some(v) = any.downcast_ref::<f64>() {
            self.writer.write_f64(*v);
        } else if let Some(v) = any.downcast_ref::<char>() {
            self.writer.write_char(*v);
        } else if let Some(v) = any.downcast_ref::<String>() {
            self.writer.write_str(v)?;
        } else if let Some(v) = any.downcast_ref::<&str>() {
            self.writer.write_str(v)?;
        } else if let Some(v) = any.downcast_ref::<Value>() {
            self.put_value(v)?;
        } else {
            return Err(CoderError::UnsupportedType(
                std::any::type_name::<T>().to_string(),
            ));
        }
        Ok(())
    }

    /// Recursive dispatch over the closed tag set.
    pub fn put_value(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Nil => self.writer.write_nil(),
            Value::Bool(v) => self.writer.write_bool(*v),
            Value::Int8(v) => self.writer.write_i8(*v),
            Value::Int16(v) => self.writer.write_i16(*v),
            Value::Int32(v) => self.writer.write_i32(*v),
            Value::Int64(v) => self.writer.write_i64(*v),
            Value::Int(v) => self.writer.write_int(*v),
            Value::UInt8(v) => self.writer.write_u8(*v),
            Value::UInt16(v) => self.writer.write_u16(*v),
            Value::UInt32(v) => self.writer.write_u32(*v),
            Value::UInt64(v) => self.writer.write_u64(*v),
            Value::UInt(v) => self.writer.write_uint(*v),
            Value::Float32(v) => self.writer.write_f32(*v),
            Value::Float64(v) => self.writer.write_f64(*v),
            Value::Char(v) => self.writer.write_char(*v),
            Value::Str(v) => self.writer.write_str(v)?,
            Value::Array(items) => {
                self.writer.write_array_header(items.len())?;
                for item in items {
                    self.put_value(item)?;
                }
            }
            Value::Set(items) => {
                self.writer.write_set_header(items.len())?;
                for item in items {
                    self.put_value(item)?;
                }
            }
            Value::Map(entries) => {
                self.writer.write_map_header(entries.len())?;
                for (key, value) in entries {
                    self.put_value(key)?;
                    self.put_value(value)?;
                }
            }
            Value::Object(object) => self.put_object(object.as_ref())?,
        }
        Ok(())
    }

    /// Writes an object: tag, type-identifier token, declared field count,
    /// then the object's own positional field stream with no further
    /// framing.
    pub fn put_object(&mut self, object: &dyn SerializableObject) -> Result<()> {
        self.writer
            .write_object_header(object.type_ident(), object.field_count())?;
        object.encode_fields(self)
    }

    /// Direct access to the underlying writer, used by [`Encoder`] impls.
    pub fn writer(&mut self) -> &mut StreamWriter {
        &mut self.writer
    }

    pub fn len(&self) -> usize {
        self.writer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writer.is_empty()
    }

    /// Consumes the encoder and returns the finished buffer.
    pub fn finish(self) -> Bytes {
        self.writer.freeze()
    }
}

impl Encoder for bool {
    fn encode(&self, encoder: &mut StreamTypedEncoder) -> Result<()> {
        encoder.writer().write_bool(*self);
        Ok(())
    }
}

impl Encoder for i8 {
    fn encode(&self, encoder: &mut StreamTypedEncoder) -> Result<()> {
        encoder.writer().write_i8(*self);
        Ok(())
    }
}

impl Encoder for i16 {
    fn encode(&self, encoder: &mut StreamTypedEncoder) -> Result<()> {
        encoder.writer().write_i16(*self);
        Ok(())
    }
}

impl Encoder for i32 {
    fn encode(&self, encoder: &mut StreamTypedEncoder) -> Result<()> {
        encoder.writer().write_i32(*self);
        Ok(())
    }
}

impl Encoder for i64 {
    fn encode(&self, encoder: &mut StreamTypedEncoder) -> Result<()> {
        encoder.writer().write_i64(*self);
        Ok(())
    }
}

impl Encoder for isize {
    fn encode(&self, encoder: &mut StreamTypedEncoder) -> Result<()> {
        encoder.writer().write_int(*self);
        Ok(())
    }
}

impl Encoder for u8 {
    fn encode(&self, encoder: &mut StreamTypedEncoder) -> Result<()> {
        encoder.writer().write_u8(*self);
        Ok(())
    }
}

impl Encoder for u16 {
    fn encode(&self, encoder: &mut StreamTypedEncoder) -> Result<()> {
        encoder.writer().write_u16(*self);
        Ok(())
    }
}

impl Encoder for u32 {
    fn encode(&self, encoder: &mut StreamTypedEncoder) -> Result<()> {
        encoder.writer().write_u32(*self);
        Ok(())
    }
}

impl Encoder for u64 {
    fn encode(&self, encoder: &mut StreamTypedEncoder) -> Result<()> {
        encoder.writer().write_u64(*self);
        Ok(())
    }
}

impl Encoder for usize {
    fn encode(&self, encoder: &mut StreamTypedEncoder) -> Result<()> {
        encoder.writer().write_uint(*self);
        Ok(())
    }
}

impl Encoder for f32 {
    fn encode(&self, encoder: &mut StreamTypedEncoder) -> Result<()> {
        encoder.writer().write_f32(*self);
        Ok(())
    }
}

impl Encoder for f64 {
    fn encode(&self, encoder: &mut StreamTypedEncoder) -> Result<()> {
        encoder.writer().write_f64(*self);
        Ok(())
    }
}

impl Encoder for char {
    fn encode(&self, encoder: &mut StreamTypedEncoder) -> Result<()> {
        encoder.writer().write_char(*self);
        Ok(())
    }
}

impl Encoder for str {
    fn encode(&self, encoder: &mut StreamTypedEncoder) -> Result<()> {
        encoder.writer().write_str(self)
    }
}

impl Encoder for String {
    fn encode(&self, encoder: &mut StreamTypedEncoder) -> Result<()> {
        encoder.writer().write_str(self)
    }
}

/// `None` is encoded as the bare `Nil` tag; `Some` contributes no wrapper
/// of its own, just the inner value's tagged encoding.
impl<T: Encoder> Encoder for Option<T> {
    fn encode(&self, encoder: &mut StreamTypedEncoder) -> Result<()> {
        match self {
            Some(value) => value.encode(encoder),
            None => {
                encoder.writer().write_nil();
                Ok(())
            }
        }
    }
}

impl<T: Encoder> Encoder for Vec<T> {
    fn encode(&self, encoder: &mut StreamTypedEncoder) -> Result<()> {
        encoder.writer().write_array_header(self.len())?;
        for item in self {
            item.encode(encoder)?;
        }
        Ok(())
    }
}

impl<T: Encoder, const N: usize> Encoder for [T; N] {
    fn encode(&self, encoder: &mut StreamTypedEncoder) -> Result<()> {
        encoder.writer().write_array_header(N)?;
        for item in self {
            item.encode(encoder)?;
        }
        Ok(())
    }
}

impl<T: Encoder + Eq + Hash> Encoder for HashSet<T> {
    fn encode(&self, encoder: &mut StreamTypedEncoder) -> Result<()> {
        encoder.writer().write_set_header(self.len())?;
        for item in self {
            item.encode(encoder)?;
        }
        Ok(())
    }
}

impl<T: Encoder + Ord> Encoder for BTreeSet<T> {
    fn encode(&self, encoder: &mut StreamTypedEncoder) -> Result<()> {
        encoder.writer().write_set_header(self.len())?;
        for item in self {
            item.encode(encoder)?;
        }
        Ok(())
    }
}

impl<T: Encoder + Eq + Hash> Encoder for IndexSet<T> {
    fn encode(&self, encoder: &mut StreamTypedEncoder) -> Result<()> {
        encoder.writer().write_set_header(self.len())?;
        for item in self {
            item.encode(encoder)?;
        }
        Ok(())
    }
}

impl<K: Encoder, V: Encoder> Encoder for HashMap<K, V> {
    fn encode(&self, encoder: &mut StreamTypedEncoder) -> Result<()> {
        encoder.writer().write_map_header(self.len())?;
        for (key, value) in self {
            key.encode(encoder)?;
            value.encode(encoder)?;
        }
        Ok(())
    }
}

impl<K: Encoder, V: Encoder> Encoder for BTreeMap<K, V> {
    fn encode(&self, encoder: &mut StreamTypedEncoder) -> Result<()> {
        encoder.writer().write_map_header(self.len())?;
        for (key, value) in self {
            key.encode(encoder)?;
            value.encode(encoder)?;
        }
        Ok(())
    }
}

impl<K: Encoder, V: Encoder> Encoder for IndexMap<K, V> {
    fn encode(&self, encoder: &mut StreamTypedEncoder) -> Result<()> {
        encoder.writer().write_map_header(self.len())?;
        for (key, value) in self {
            key.encode(encoder)?;
            value.encode(encoder)?;
        }
        Ok(())
    }
}

impl Encoder for Value {
    fn encode(&self, encoder: &mut StreamTypedEncoder) -> Result<()> {
        encoder.put_value(self)
    }
}

impl<T: Encoder + ?Sized> Encoder for &T {
    fn encode(&self, encoder: &mut StreamTypedEncoder) -> Result<()> {
        (*self).encode(encoder)
    }
}

impl<T: Encoder> Encoder for Box<T> {
    fn encode(&self, encoder: &mut StreamTypedEncoder) -> Result<()> {
        (**self).encode(encoder)
    }
}

impl<T: Encoder> Encoder for Arc<T> {
    fn encode(&self, encoder: &mut StreamTypedEncoder) -> Result<()> {
        (**self).encode(encoder)
    }
}
