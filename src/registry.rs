use std::collections::HashMap;
use std::fmt;

use crate::object::{DecodableObject, SerializableObject};
use crate::{Result, StreamTypedDecoder};

/// A reconstruction entry point: rebuilds one object type from its encoded
/// field sequence.
pub type ObjectDecodeFn =
    fn(&mut StreamTypedDecoder<'_>) -> Result<Box<dyn SerializableObject>>;

#[derive(Clone, Copy)]
pub(crate) struct RegistryEntry {
    pub(crate) field_count: usize,
    pub(crate) decode: ObjectDecodeFn,
}

/// Maps type-identifier tokens to reconstruction entry points.
///
/// The registry replaces the ambient process-wide class table of the legacy
/// format with an explicit object: populate it once at startup, before any
/// decode that might encounter the registered types, and treat it as
/// read-only thereafter. Typed decoding (`T::decode`) resolves types
/// statically and does not consult the registry; only dynamic
/// [`decode_object`](crate::StreamTypedDecoder::decode_object) does.
#[derive(Default)]
pub struct TypeRegistry {
    entries: HashMap<&'static str, RegistryEntry>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        TypeRegistry {
            entries: HashMap::new(),
        }
    }

    /// Registers `T`'s reconstruction entry point under its type-identifier
    /// token. Registering the same type twice is harmless.
    pub fn register<T>(&mut self)
    where
        T: SerializableObject + DecodableObject + 'static,
    {
        fn reconstruct<T>(
            decoder: &mut StreamTypedDecoder<'_>,
        ) -> Result<Box<dyn SerializableObject>>
        where
            T: SerializableObject + DecodableObject + 'static,
        {
            Ok(Box::new(T::decode_fields(decoder)?))
        }

        self.entries.insert(
            T::TYPE_IDENT,
            RegistryEntry {
                field_count: T::FIELD_COUNT,
                decode: reconstruct::<T>,
            },
        );
    }

    pub fn is_registered(&self, ident: &str) -> bool {
        self.entries.contains_key(ident)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn entry_for(&self, ident: &str) -> Option<RegistryEntry> {
        self.entries.get(ident).copied()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}
