use std::any::Any;
use std::fmt::Debug;

use crate::{Result, StreamTypedDecoder, StreamTypedEncoder};

/// The encode half of the serializable-object contract.
///
/// A conforming type contributes an ordered sequence of typed fields to the
/// stream; there is no field-name tagging, only positional/typed sequencing
/// per the type's own contract. The trait is object-safe so that decoded
/// instances of different types can travel inside
/// [`Value::Object`](crate::Value::Object).
///
/// Use `#[derive(Encode)]` rather than implementing this by hand; the derive
/// keeps `encode_fields`, `field_count` and the decode side in lockstep.
pub trait SerializableObject: Any + Debug {
    /// The type-identifier token written to the stream, sufficient for the
    /// decoder to locate the matching reconstruction entry point.
    fn type_ident(&self) -> &'static str;

    /// Number of fields `encode_fields` writes. Declared in the object
    /// header so the decoder can reject streams written by a different
    /// revision of the type.
    fn field_count(&self) -> usize;

    /// Encodes the object's fields, in order, with no further framing.
    fn encode_fields(&self, encoder: &mut StreamTypedEncoder) -> Result<()>;

    fn as_any(&self) -> &dyn Any;

    /// Field-wise equality across trait objects; false when `other` is a
    /// different concrete type.
    fn eq_object(&self, other: &dyn SerializableObject) -> bool;

    fn clone_object(&self) -> Box<dyn SerializableObject>;
}

/// The decode half of the serializable-object contract: the reconstruction
/// entry point.
///
/// `decode_fields` is invoked with the decoder positioned at the start of
/// the object's field sequence and must consume exactly the fields
/// `encode_fields` wrote, in the same order and with the same types.
///
/// Use `#[derive(Decode)]` rather than implementing this by hand.
pub trait DecodableObject: Sized {
    /// The type-identifier token this type answers to.
    const TYPE_IDENT: &'static str;

    /// The field count this type was compiled with.
    const FIELD_COUNT: usize;

    /// Rebuilds an instance from its encoded field sequence.
    fn decode_fields(decoder: &mut StreamTypedDecoder<'_>) -> Result<Self>;
}
