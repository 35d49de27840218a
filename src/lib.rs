//! # stream-typed-coder
//!
//! A tag-per-value binary object coder. `StreamTypedEncoder` walks an object
//! graph (primitives, optionals, collections, user-defined serializable
//! types) and produces a self-describing byte stream; `StreamTypedDecoder`
//! consumes the same stream and reconstructs an equal value graph.
//!
//! - Every value travels as one [`TypeTag`] byte followed by a fixed-width
//!   little-endian payload (scalars) or a length-prefixed payload (strings,
//!   containers, objects).
//! - All signed/unsigned integer widths, both float widths, booleans,
//!   characters and strings round-trip exactly; arrays, sets and ordered
//!   maps nest to arbitrary depth.
//! - User-defined types participate through a positional field contract:
//!   the fields written by [`SerializableObject::encode_fields`] are read
//!   back, in the same order, by [`DecodableObject::decode_fields`]. A
//!   [`TypeRegistry`] maps type-identifier tokens to reconstruction entry
//!   points for dynamic decoding.
//! - Custom derive macros generate both sides of the contract.
//!
//! ## Example
//!
//! ```rust
//! use stream_typed_coder::{encode, decode, Encode, Decode};
//!
//! #[derive(Encode, Decode, Debug, Clone, PartialEq)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! let point = Point { x: 4, y: -2 };
//! let data = encode(&point).unwrap();
//! let back: Point = decode(data).unwrap();
//! assert_eq!(point, back);
//! ```
//!
//! Dynamic decoding reconstructs whatever the stream holds as a [`Value`]:
//!
//! ```rust
//! use stream_typed_coder::{StreamTypedEncoder, StreamTypedDecoder, TypeRegistry, Value};
//!
//! let mut encoder = StreamTypedEncoder::new();
//! encoder.encode_root_object(&Value::from("hello")).unwrap();
//!
//! let registry = TypeRegistry::new();
//! let mut decoder = StreamTypedDecoder::new(encoder.finish(), &registry);
//! assert_eq!(decoder.decode_object().unwrap(), Value::from("hello"));
//! ```

mod decoder;
mod encoder;
mod object;
mod reader;
mod registry;
mod tag;
mod value;
mod writer;

pub use decoder::StreamTypedDecoder;
pub use encoder::StreamTypedEncoder;
pub use object::{DecodableObject, SerializableObject};
pub use reader::StreamReader;
pub use registry::{ObjectDecodeFn, TypeRegistry};
pub use stream_typed_coder_derive::{Decode, Encode};
pub use tag::TypeTag;
pub use value::Value;
pub use writer::StreamWriter;

use bytes::Bytes;

/// Errors raised by encoding and decoding operations.
///
/// Two families cover everything. `UnsupportedType`, `UnsupportedTag`,
/// `UnregisteredType` and `FieldCountMismatch` are integration defects: a
/// value or stream refers to something outside the closed, registered set.
/// `Malformed` and `Truncated` mean the input buffer itself is corrupt; the
/// only recovery is re-acquiring a valid buffer from the source.
#[derive(Debug, thiserror::Error)]
pub enum CoderError {
    /// A runtime value's type is outside the supported closed set.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),
    /// A tag byte outside the closed enumeration was encountered.
    #[error("unsupported type tag: 0x{0:02X}")]
    UnsupportedTag(u8),
    /// An object type-identifier with no registered reconstruction entry
    /// point was encountered during dynamic decoding.
    #[error("no reconstruction entry point registered for object type `{0}`")]
    UnregisteredType(String),
    /// The field count declared in the stream does not match the count the
    /// local type was compiled with.
    #[error("field count mismatch for object type `{ident}`: stream declares {declared}, type expects {expected}")]
    FieldCountMismatch {
        ident: String,
        declared: usize,
        expected: usize,
    },
    /// The buffer contents are inconsistent with the format (bad length
    /// prefix, invalid payload, tag mismatch).
    #[error("malformed stream: {0}")]
    Malformed(String),
    /// The buffer was exhausted before a complete value could be read.
    #[error("unexpected end of stream")]
    Truncated,
}

/// The result type used throughout this crate.
pub type Result<T> = std::result::Result<T, CoderError>;

/// Trait for values that can be written to the stream-typed format.
///
/// Implementations exist for all supported primitives, strings, `Option`,
/// the container types and [`Value`]. User-defined types should use
/// `#[derive(Encode)]`, which also implements the [`SerializableObject`]
/// contract.
pub trait Encoder {
    /// Encode the value, tag first, into the given encoder's buffer.
    fn encode(&self, encoder: &mut StreamTypedEncoder) -> Result<()>;
}

/// Trait for values that can be read back from the stream-typed format.
///
/// Every implementation consumes exactly the bytes the matching [`Encoder`]
/// implementation produced. User-defined types should use
/// `#[derive(Decode)]`, which also implements the [`DecodableObject`]
/// contract.
pub trait Decoder: Sized {
    /// Decode a value of this type from the decoder's current position.
    fn decode(decoder: &mut StreamTypedDecoder<'_>) -> Result<Self>;
}

/// Encodes a single root value and returns the finished buffer.
///
/// ```rust
/// let data = stream_typed_coder::encode(&42u16).unwrap();
/// let back: u16 = stream_typed_coder::decode(data).unwrap();
/// assert_eq!(back, 42);
/// ```
pub fn encode<T: Encoder>(value: &T) -> Result<Bytes> {
    let mut encoder = StreamTypedEncoder::new();
    encoder.encode_root_object(value)?;
    Ok(encoder.finish())
}

/// Decodes a single typed root value from a buffer.
///
/// Typed decoding resolves object types statically and needs no registry.
/// If the stream may contain dynamically-typed objects (fields of type
/// [`Value`]), construct a [`StreamTypedDecoder`] with a populated
/// [`TypeRegistry`] instead.
pub fn decode<T: Decoder>(data: impl Into<Bytes>) -> Result<T> {
    let registry = TypeRegistry::new();
    let mut decoder = StreamTypedDecoder::new(data, &registry);
    T::decode(&mut decoder)
}

/// Decodes whatever value the buffer holds, reconstructing registered
/// object types through the given registry.
pub fn decode_object(data: impl Into<Bytes>, registry: &TypeRegistry) -> Result<Value> {
    let mut decoder = StreamTypedDecoder::new(data, registry);
    decoder.decode_object()
}
