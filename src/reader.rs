use bytes::{Buf, Bytes};

use crate::tag::TypeTag;
use crate::{CoderError, Result};

/// The read side of the wire format: sequentially consumes tagged values
/// from a byte buffer, validating tags and lengths before materializing
/// typed values.
///
/// Every successful read advances the cursor by exactly the number of bytes
/// the matching [`StreamWriter`](crate::StreamWriter) operation produced.
/// The cursor state is exclusively owned by one in-flight decode call.
#[derive(Debug)]
pub struct StreamReader {
    buf: Bytes,
}

impl StreamReader {
    pub fn new(data: impl Into<Bytes>) -> Self {
        StreamReader { buf: data.into() }
    }

    /// Bytes left in the buffer.
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    fn need(&self, count: usize) -> Result<()> {
        if self.buf.remaining() < count {
            return Err(CoderError::Truncated);
        }
        Ok(())
    }

    /// Returns the next tag without advancing the cursor.
    pub fn peek_tag(&self) -> Result<TypeTag> {
        self.need(1)?;
        let byte = self.buf.chunk()[0];
        TypeTag::from_byte(byte).ok_or(CoderError::UnsupportedTag(byte))
    }

    /// Consumes and returns the next tag.
    pub fn read_tag(&mut self) -> Result<TypeTag> {
        self.need(1)?;
        let byte = self.buf.get_u8();
        TypeTag::from_byte(byte).ok_or(CoderError::UnsupportedTag(byte))
    }

    /// Consumes the next tag and fails unless it is the expected one.
    pub fn expect_tag(&mut self, expected: TypeTag) -> Result<()> {
        let found = self.read_tag()?;
        if found != expected {
            return Err(CoderError::Malformed(format!(
                "expected {:?} tag (0x{:02X}), found {:?} (0x{:02X})",
                expected,
                expected.byte(),
                found,
                found.byte()
            )));
        }
        Ok(())
    }

    /// Reads a 32-bit little-endian length/count prefix.
    ///
    /// Every encoded item occupies at least one byte, so a count larger
    /// than the remaining buffer can never be satisfied and is rejected
    /// up front, for byte lengths and element counts alike.
    pub fn read_len(&mut self) -> Result<usize> {
        self.need(4)?;
        let len = self.buf.get_u32_le() as usize;
        if len > self.buf.remaining() {
            return Err(CoderError::Malformed(format!(
                "length prefix {} exceeds {} remaining bytes",
                len,
                self.buf.remaining()
            )));
        }
        Ok(len)
    }

    /// Consumes exactly `len` raw bytes.
    pub fn read_raw(&mut self, len: usize) -> Result<Bytes> {
        self.need(len)?;
        Ok(self.buf.split_to(len))
    }

    /// Consumes a bare `Nil` tag.
    pub fn read_nil(&mut self) -> Result<()> {
        self.expect_tag(TypeTag::Nil)
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        self.expect_tag(TypeTag::Bool)?;
        self.need(1)?;
        match self.buf.get_u8() {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(CoderError::Malformed(format!(
                "invalid bool payload byte 0x{:02X}",
                other
            ))),
        }
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        self.expect_tag(TypeTag::Int8)?;
        self.need(1)?;
        Ok(self.buf.get_i8())
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        self.expect_tag(TypeTag::Int16)?;
        self.need(2)?;
        Ok(self.buf.get_i16_le())
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.expect_tag(TypeTag::Int32)?;
        self.need(4)?;
        Ok(self.buf.get_i32_le())
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        self.expect_tag(TypeTag::Int64)?;
        self.need(8)?;
        Ok(self.buf.get_i64_le())
    }

    /// Native-width signed integer; 8-byte payload on the wire.
    pub fn read_int(&mut self) -> Result<isize> {
        self.expect_tag(TypeTag::Int)?;
        self.need(8)?;
        let value = self.buf.get_i64_le();
        isize::try_from(value).map_err(|_| {
            CoderError::Malformed(format!(
                "native integer {} does not fit this platform's isize",
                value
            ))
        })
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.expect_tag(TypeTag::UInt8)?;
        self.need(1)?;
        Ok(self.buf.get_u8())
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.expect_tag(TypeTag::UInt16)?;
        self.need(2)?;
        Ok(self.buf.get_u16_le())
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.expect_tag(TypeTag::UInt32)?;
        self.need(4)?;
        Ok(self.buf.get_u32_le())
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        self.expect_tag(TypeTag::UInt64)?;
        self.need(8)?;
        Ok(self.buf.get_u64_le())
    }

    /// Native-width unsigned integer; 8-byte payload on the wire.
    pub fn read_uint(&mut self) -> Result<usize> {
        self.expect_tag(TypeTag::UInt)?;
        self.need(8)?;
        let value = self.buf.get_u64_le();
        usize::try_from(value).map_err(|_| {
            CoderError::Malformed(format!(
                "native unsigned integer {} does not fit this platform's usize",
                value
            ))
        })
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        self.expect_tag(TypeTag::Float32)?;
        self.need(4)?;
        Ok(self.buf.get_f32_le())
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        self.expect_tag(TypeTag::Float64)?;
        self.need(8)?;
        Ok(self.buf.get_f64_le())
    }

    pub fn read_char(&mut self) -> Result<char> {
        self.expect_tag(TypeTag::Char)?;
        self.need(4)?;
        let scalar = self.buf.get_u32_le();
        char::from_u32(scalar).ok_or_else(|| {
            CoderError::Malformed(format!("invalid Unicode scalar value 0x{:08X}", scalar))
        })
    }

    pub fn read_str(&mut self) -> Result<String> {
        self.expect_tag(TypeTag::Str)?;
        let len = self.read_len()?;
        let bytes = self.read_raw(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|err| CoderError::Malformed(format!("invalid UTF-8 string payload: {}", err)))
    }

    /// Consumes an Array tag and returns the element count.
    pub fn read_array_header(&mut self) -> Result<usize> {
        self.expect_tag(TypeTag::Array)?;
        self.read_len()
    }

    /// Consumes a Set tag and returns the element count.
    pub fn read_set_header(&mut self) -> Result<usize> {
        self.expect_tag(TypeTag::Set)?;
        self.read_len()
    }

    /// Consumes a Map tag and returns the entry count.
    pub fn read_map_header(&mut self) -> Result<usize> {
        self.expect_tag(TypeTag::Map)?;
        self.read_len()
    }

    /// Consumes an Object tag and returns the type-identifier token and the
    /// declared field count.
    pub fn read_object_header(&mut self) -> Result<(String, usize)> {
        self.expect_tag(TypeTag::Object)?;
        let ident_len = self.read_len()?;
        let ident_bytes = self.read_raw(ident_len)?;
        let ident = String::from_utf8(ident_bytes.to_vec()).map_err(|err| {
            CoderError::Malformed(format!("invalid UTF-8 type identifier: {}", err))
        })?;
        let field_count = self.read_len()?;
        Ok((ident, field_count))
    }
}
