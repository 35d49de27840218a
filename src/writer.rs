use bytes::{BufMut, Bytes, BytesMut};

use crate::tag::TypeTag;
use crate::{CoderError, Result};

/// The write side of the wire format: appends tagged, length-prefixed
/// values to a growable byte buffer.
///
/// Each typed write emits one tag byte followed by the payload. Fixed-width
/// scalar payloads are little-endian; variable-width payloads carry a
/// 32-bit little-endian length or count prefix. The buffer grows
/// monotonically and is exclusively owned by one in-flight encode call; the
/// writer performs no reads.
#[derive(Debug, Default)]
pub struct StreamWriter {
    buf: BytesMut,
}

impl StreamWriter {
    pub fn new() -> Self {
        StreamWriter {
            buf: BytesMut::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        StreamWriter {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consumes the writer and returns the finished buffer.
    pub fn freeze(self) -> Bytes {
        self.buf.freeze()
    }

    pub fn write_tag(&mut self, tag: TypeTag) {
        self.buf.put_u8(tag.byte());
    }

    /// Writes a 32-bit little-endian length/count prefix.
    ///
    /// Lengths that do not fit the prefix are rejected rather than
    /// truncated; the wire format cannot represent them.
    pub fn write_len(&mut self, len: usize) -> Result<()> {
        let len = u32::try_from(len).map_err(|_| {
            CoderError::UnsupportedType(format!(
                "length {} exceeds the 32-bit length prefix",
                len
            ))
        })?;
        self.buf.put_u32_le(len);
        Ok(())
    }

    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.buf.put_slice(bytes);
    }

    /// Emits the `Nil` tag alone; absent values have no payload.
    pub fn write_nil(&mut self) {
        self.write_tag(TypeTag::Nil);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.write_tag(TypeTag::Bool);
        self.buf.put_u8(value as u8);
    }

    pub fn write_i8(&mut self, value: i8) {
        self.write_tag(TypeTag::Int8);
        self.buf.put_i8(value);
    }

    pub fn write_i16(&mut self, value: i16) {
        self.write_tag(TypeTag::Int16);
        self.buf.put_i16_le(value);
    }

    pub fn write_i32(&mut self, value: i32) {
        self.write_tag(TypeTag::Int32);
        self.buf.put_i32_le(value);
    }

    pub fn write_i64(&mut self, value: i64) {
        self.write_tag(TypeTag::Int64);
        self.buf.put_i64_le(value);
    }

    /// Native-width signed integer; the payload is always 8 bytes.
    pub fn write_int(&mut self, value: isize) {
        self.write_tag(TypeTag::Int);
        self.buf.put_i64_le(value as i64);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.write_tag(TypeTag::UInt8);
        self.buf.put_u8(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.write_tag(TypeTag::UInt16);
        self.buf.put_u16_le(value);
    }

    pub fn write_u32(&mut self, value: u32) {
        self.write_tag(TypeTag::UInt32);
        self.buf.put_u32_le(value);
    }

    pub fn write_u64(&mut self, value: u64) {
        self.write_tag(TypeTag::UInt64);
        self.buf.put_u64_le(value);
    }

    /// Native-width unsigned integer; the payload is always 8 bytes.
    pub fn write_uint(&mut self, value: usize) {
        self.write_tag(TypeTag::UInt);
        self.buf.put_u64_le(value as u64);
    }

    pub fn write_f32(&mut self, value: f32) {
        self.write_tag(TypeTag::Float32);
        self.buf.put_f32_le(value);
    }

    pub fn write_f64(&mut self, value: f64) {
        self.write_tag(TypeTag::Float64);
        self.buf.put_f64_le(value);
    }

    /// Encodes a character as its Unicode scalar value.
    pub fn write_char(&mut self, value: char) {
        self.write_tag(TypeTag::Char);
        self.buf.put_u32_le(value as u32);
    }

    /// Tag, byte length, then the UTF-8 bytes.
    pub fn write_str(&mut self, value: &str) -> Result<()> {
        self.write_tag(TypeTag::Str);
        self.write_len(value.len())?;
        self.buf.put_slice(value.as_bytes());
        Ok(())
    }

    /// Array tag plus element count; the caller follows with each
    /// element's own tagged encoding.
    pub fn write_array_header(&mut self, count: usize) -> Result<()> {
        self.write_tag(TypeTag::Array);
        self.write_len(count)
    }

    pub fn write_set_header(&mut self, count: usize) -> Result<()> {
        self.write_tag(TypeTag::Set);
        self.write_len(count)
    }

    /// Map tag plus entry count; the caller follows with each key's tagged
    /// encoding, each immediately followed by its value's.
    pub fn write_map_header(&mut self, count: usize) -> Result<()> {
        self.write_tag(TypeTag::Map);
        self.write_len(count)
    }

    /// Object tag, type-identifier token, then the declared field count.
    /// The caller follows with the object's positional field stream.
    pub fn write_object_header(&mut self, ident: &str, field_count: usize) -> Result<()> {
        self.write_tag(TypeTag::Object);
        self.write_len(ident.len())?;
        self.buf.put_slice(ident.as_bytes());
        self.write_len(field_count)
    }
}
