use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::Hash;
use std::sync::Arc;

use bytes::Bytes;
use indexmap::{IndexMap, IndexSet};

use crate::reader::StreamReader;
use crate::registry::TypeRegistry;
use crate::tag::TypeTag;
use crate::value::Value;
use crate::{CoderError, Decoder, Result};

/// Reconstructs values from a byte buffer produced by
/// [`StreamTypedEncoder`](crate::StreamTypedEncoder).
///
/// The decoder owns the read cursor exclusively for the duration of the
/// decode call and borrows an explicit [`TypeRegistry`] for reconstructing
/// dynamically-typed objects. Decoding either fully succeeds or fails
/// outright; no partially-decoded value is ever returned.
#[derive(Debug)]
pub struct StreamTypedDecoder<'a> {
    reader: StreamReader,
    registry: &'a TypeRegistry,
}

/// Upper bound on dynamic container nesting. Keeps a corrupt or hostile
/// buffer of nested container headers from recursing past the stack.
const MAX_NESTING_DEPTH: usize = 128;

impl<'a> StreamTypedDecoder<'a> {
    pub fn new(data: impl Into<Bytes>, registry: &'a TypeRegistry) -> Self {
        StreamTypedDecoder {
            reader: StreamReader::new(data),
            registry,
        }
    }

    /// Decodes whatever value sits at the cursor, dispatching on the next
    /// tag.
    ///
    /// Container elements are decoded recursively; sets coalesce later
    /// duplicates (first occurrence wins) and maps keep keys unique (a
    /// repeated key replaces the earlier value in place). Objects are
    /// reconstructed through the registry; an unregistered type-identifier
    /// is a hard error, as is nesting deeper than [`MAX_NESTING_DEPTH`].
    pub fn decode_object(&mut self) -> Result<Value> {
        self.decode_value(0)
    }

    fn decode_value(&mut self, depth: usize) -> Result<Value> {
        if depth >= MAX_NESTING_DEPTH {
            return Err(CoderError::Malformed(format!(
                "container nesting exceeds {} levels",
                MAX_NESTING_DEPTH
            )));
        }
        let tag = self.reader.peek_tag()?;
        let value = match tag {
            TypeTag::Nil => {
                self.reader.read_nil()?;
                Value::Nil
            }
            TypeTag::Bool => Value::Bool(self.reader.read_bool()?),
            TypeTag::Int8 => Value::Int8(self.reader.read_i8()?),
            TypeTag::Int16 => Value::Int16(self.reader.read_i16()?),
            TypeTag::Int32 => Value::Int32(self.reader.read_i32()?),
            TypeTag::Int64 => Value::Int64(self.reader.read_i64()?),
            TypeTag::Int => Value::Int(self.reader.read_int()?),
            TypeTag::UInt8 => Value::UInt8(self.reader.read_u8()?),
            TypeTag::UInt16 => Value::UInt16(self.reader.read_u16()?),
            TypeTag::UInt32 => Value::UInt32(self.reader.read_u32()?),
            TypeTag::UInt64 => Value::UInt64(self.reader.read_u64()?),
            TypeTag::UInt => Value::UInt(self.reader.read_uint()?),
            TypeTag::Float32 => Value::Float32(self.reader.read_f32()?),
            TypeTag::Float64 => Value::Float64(self.reader.read_f64()?),
            TypeTag::Char => Value::Char(self.reader.read_char()?),
            TypeTag::Str => Value::Str(self.reader.read_str()?),
            TypeTag::Array => {
                let count = self.reader.read_array_header()?;
                let mut items = Vec::with_capacity(count);
                for _ in 0..count {
                    items.push(self.decode_value(depth + 1)?);
                }
                Value::Array(items)
            }
            TypeTag::Set => {
                let count = self.reader.read_set_header()?;
                let mut items: Vec<Value> = Vec::with_capacity(count);
                for _ in 0..count {
                    let item = self.decode_value(depth + 1)?;
                    if !items.contains(&item) {
                        items.push(item);
                    }
                }
                Value::Set(items)
            }
            TypeTag::Map => {
                let count = self.reader.read_map_header()?;
                let mut entries: Vec<(Value, Value)> = Vec::with_capacity(count);
                for _ in 0..count {
                    let key = self.decode_value(depth + 1)?;
                    let value = self.decode_value(depth + 1)?;
                    if let Some(slot) =
                        entries.iter_mut().find(|(existing, _)| *existing == key)
                    {
                        slot.1 = value;
                    } else {
                        entries.push((key, value));
                    }
                }
                Value::Map(entries)
            }
            TypeTag::Object => {
                let (ident, declared) = self.reader.read_object_header()?;
                let entry = self
                    .registry
                    .entry_for(&ident)
                    .ok_or(CoderError::UnregisteredType(ident.clone()))?;
                if declared != entry.field_count {
                    return Err(CoderError::FieldCountMismatch {
                        ident,
                        declared,
                        expected: entry.field_count,
                    });
                }
                Value::Object((entry.decode)(self)?)
            }
        };
        Ok(value)
    }

    /// Typed decode of the value at the cursor.
    pub fn decode<T: Decoder>(&mut self) -> Result<T> {
        T::decode(self)
    }

    /// Validates an object header against a statically-known type: the
    /// type-identifier token must match and the declared field count must
    /// equal the count the type was compiled with. Leaves the cursor at the
    /// start of the field sequence.
    pub fn begin_object(&mut self, ident: &str, field_count: usize) -> Result<()> {
        let (found, declared) = self.reader.read_object_header()?;
        if found != ident {
            return Err(CoderError::Malformed(format!(
                "object type mismatch: expected `{}`, found `{}`",
                ident, found
            )));
        }
        if declared != field_count {
            return Err(CoderError::FieldCountMismatch {
                ident: found,
                declared,
                expected: field_count,
            });
        }
        Ok(())
    }

    /// Direct access to the underlying reader, used by [`Decoder`] impls.
    pub fn reader(&mut self) -> &mut StreamReader {
        &mut self.reader
    }

    pub fn registry(&self) -> &TypeRegistry {
        self.registry
    }

    pub fn remaining(&self) -> usize {
        self.reader.remaining()
    }

    pub fn is_empty(&self) -> bool {
        self.reader.is_empty()
    }
}

impl Decoder for bool {
    fn decode(decoder: &mut StreamTypedDecoder<'_>) -> Result<Self> {
        decoder.reader().read_bool()
    }
}

impl Decoder for i8 {
    fn decode(decoder: &mut StreamTypedDecoder<'_>) -> Result<Self> {
        decoder.reader().read_i8()
    }
}

impl Decoder for i16 {
    fn decode(decoder: &mut StreamTypedDecoder<'_>) -> Result<Self> {
        decoder.reader().read_i16()
    }
}

impl Decoder for i32 {
    fn decode(decoder: &mut StreamTypedDecoder<'_>) -> Result<Self> {
        decoder.reader().read_i32()
    }
}

impl Decoder for i64 {
    fn decode(decoder: &mut StreamTypedDecoder<'_>) -> Result<Self> {
        decoder.reader().read_i64()
    }
}

impl Decoder for isize {
    fn decode(decoder: &mut StreamTypedDecoder<'_>) -> Result<Self> {
        decoder.reader().read_int()
    }
}

impl Decoder for u8 {
    fn decode(decoder: &mut StreamTypedDecoder<'_>) -> Result<Self> {
        decoder.reader().read_u8()
    }
}

impl Decoder for u16 {
    fn decode(decoder: &mut StreamTypedDecoder<'_>) -> Result<Self> {
        decoder.reader().read_u16()
    }
}

impl Decoder for u32 {
    fn decode(decoder: &mut StreamTypedDecoder<'_>) -> Result<Self> {
        decoder.reader().read_u32()
    }
}

impl Decoder for u64 {
    fn decode(decoder: &mut StreamTypedDecoder<'_>) -> Result<Self> {
        decoder.reader().read_u64()
    }
}

impl Decoder for usize {
    fn decode(decoder: &mut StreamTypedDecoder<'_>) -> Result<Self> {
        decoder.reader().read_uint()
    }
}

impl Decoder for f32 {
    fn decode(decoder: &mut StreamTypedDecoder<'_>) -> Result<Self> {
        decoder.reader().read_f32()
    }
}

impl Decoder for f64 {
    fn decode(decoder: &mut StreamTypedDecoder<'_>) -> Result<Self> {
        decoder.reader().read_f64()
    }
}

impl Decoder for char {
    fn decode(decoder: &mut StreamTypedDecoder<'_>) -> Result<Self> {
        decoder.reader().read_char()
    }
}

impl Decoder for String {
    fn decode(decoder: &mut StreamTypedDecoder<'_>) -> Result<Self> {
        decoder.reader().read_str()
    }
}

/// A bare `Nil` tag decodes to `None`; any other tag is handed to the inner
/// type's decode.
impl<T: Decoder> Decoder for Option<T> {
    fn decode(decoder: &mut StreamTypedDecoder<'_>) -> Result<Self> {
        if decoder.reader().peek_tag()? == TypeTag::Nil {
            decoder.reader().read_nil()?;
            return Ok(None);
        }
        Ok(Some(T::decode(decoder)?))
    }
}

impl<T: Decoder> Decoder for Vec<T> {
    fn decode(decoder: &mut StreamTypedDecoder<'_>) -> Result<Self> {
        let count = decoder.reader().read_array_header()?;
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(T::decode(decoder)?);
        }
        Ok(items)
    }
}

impl<T: Decoder, const N: usize> Decoder for [T; N] {
    fn decode(decoder: &mut StreamTypedDecoder<'_>) -> Result<Self> {
        let count = decoder.reader().read_array_header()?;
        if count != N {
            return Err(CoderError::Malformed(format!(
                "array length mismatch: expected {}, stream declares {}",
                N, count
            )));
        }
        let mut items = Vec::with_capacity(N);
        for _ in 0..N {
            items.push(T::decode(decoder)?);
        }
        items
            .try_into()
            .map_err(|_| CoderError::Malformed("array conversion failed".to_string()))
    }
}

impl<T: Decoder + Eq + Hash> Decoder for HashSet<T> {
    fn decode(decoder: &mut StreamTypedDecoder<'_>) -> Result<Self> {
        let count = decoder.reader().read_set_header()?;
        let mut items = HashSet::with_capacity(count);
        for _ in 0..count {
            items.insert(T::decode(decoder)?);
        }
        Ok(items)
    }
}

impl<T: Decoder + Ord> Decoder for BTreeSet<T> {
    fn decode(decoder: &mut StreamTypedDecoder<'_>) -> Result<Self> {
        let count = decoder.reader().read_set_header()?;
        let mut items = BTreeSet::new();
        for _ in 0..count {
            items.insert(T::decode(decoder)?);
        }
        Ok(items)
    }
}

impl<T: Decoder + Eq + Hash> Decoder for IndexSet<T> {
    fn decode(decoder: &mut StreamTypedDecoder<'_>) -> Result<Self> {
        let count = decoder.reader().read_set_header()?;
        let mut items = IndexSet::with_capacity(count);
        for _ in 0..count {
            items.insert(T::decode(decoder)?);
        }
        Ok(items)
    }
}

impl<K: Decoder + Eq + Hash, V: Decoder> Decoder for HashMap<K, V> {
    fn decode(decoder: &mut StreamTypedDecoder<'_>) -> Result<Self> {
        let count = decoder.reader().read_map_header()?;
        let mut map = HashMap::with_capacity(count);
        for _ in 0..count {
            let key = K::decode(decoder)?;
            let value = V::decode(decoder)?;
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<K: Decoder + Ord, V: Decoder> Decoder for BTreeMap<K, V> {
    fn decode(decoder: &mut StreamTypedDecoder<'_>) -> Result<Self> {
        let count = decoder.reader().read_map_header()?;
        let mut map = BTreeMap::new();
        for _ in 0..count {
            let key = K::decode(decoder)?;
            let value = V::decode(decoder)?;
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<K: Decoder + Eq + Hash, V: Decoder> Decoder for IndexMap<K, V> {
    fn decode(decoder: &mut StreamTypedDecoder<'_>) -> Result<Self> {
        let count = decoder.reader().read_map_header()?;
        let mut map = IndexMap::with_capacity(count);
        for _ in 0..count {
            let key = K::decode(decoder)?;
            let value = V::decode(decoder)?;
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl Decoder for Value {
    fn decode(decoder: &mut StreamTypedDecoder<'_>) -> Result<Self> {
        decoder.decode_object()
    }
}

impl<T: Decoder> Decoder for Box<T> {
    fn decode(decoder: &mut StreamTypedDecoder<'_>) -> Result<Self> {
        Ok(Box::new(T::decode(decoder)?))
    }
}

impl<T: Decoder> Decoder for Arc<T> {
    fn decode(decoder: &mut StreamTypedDecoder<'_>) -> Result<Self> {
        Ok(Arc::new(T::decode(decoder)?))
    }
}
