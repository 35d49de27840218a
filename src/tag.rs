/// Type tags used in the stream-typed binary format.
///
/// Every encoded value begins with exactly one tag byte identifying how the
/// bytes that follow must be parsed. The tag values are stable and part of
/// the wire format. The enumeration is closed: the encoder never produces a
/// byte outside this set, so an unknown byte on the read side always means
/// foreign or corrupt data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TypeTag {
    /// Absent value; the tag stands alone with no payload.
    Nil = 0x00,
    Bool = 0x01,
    Int8 = 0x02,
    Int16 = 0x03,
    Int32 = 0x04,
    Int64 = 0x05,
    /// Native-width signed integer. The payload is always 8 bytes so that
    /// streams are portable across pointer widths.
    Int = 0x06,
    UInt8 = 0x07,
    UInt16 = 0x08,
    UInt32 = 0x09,
    UInt64 = 0x0A,
    /// Native-width unsigned integer, 8-byte payload.
    UInt = 0x0B,
    Float32 = 0x0C,
    Float64 = 0x0D,
    /// Unicode scalar value, 4-byte payload.
    Char = 0x0E,
    /// Length-prefixed UTF-8 bytes.
    Str = 0x0F,
    /// Count-prefixed sequence of tagged elements.
    Array = 0x10,
    /// Count-prefixed sequence of unique tagged elements.
    Set = 0x11,
    /// Count-prefixed sequence of tagged key/value pairs, keys unique,
    /// insertion order preserved.
    Map = 0x12,
    /// Type-identifier token, declared field count, then the object's own
    /// positional field stream.
    Object = 0x13,
}

impl TypeTag {
    /// Maps a raw byte back into the closed enumeration.
    ///
    /// Returns `None` for bytes the format never produces.
    pub fn from_byte(byte: u8) -> Option<TypeTag> {
        let tag = match byte {
            0x00 => TypeTag::Nil,
            0x01 => TypeTag::Bool,
            0x02 => TypeTag::Int8,
            0x03 => TypeTag::Int16,
            0x04 => TypeTag::Int32,
            0x05 => TypeTag::Int64,
            0x06 => TypeTag::Int,
            0x07 => TypeTag::UInt8,
            0x08 => TypeTag::UInt16,
            0x09 => TypeTag::UInt32,
            0x0A => TypeTag::UInt64,
            0x0B => TypeTag::UInt,
            0x0C => TypeTag::Float32,
            0x0D => TypeTag::Float64,
            0x0E => TypeTag::Char,
            0x0F => TypeTag::Str,
            0x10 => TypeTag::Array,
            0x11 => TypeTag::Set,
            0x12 => TypeTag::Map,
            0x13 => TypeTag::Object,
            _ => return None,
        };
        Some(tag)
    }

    /// The wire byte for this tag.
    pub const fn byte(self) -> u8 {
        self as u8
    }
}
