//! Derive macros for the stream-typed-coder binary object coder.
//!
//! `#[derive(Encode)]` implements the encode half of the serializable-object
//! contract for a named struct: the fields are written to the stream in
//! declaration order, preceded by the object header. `#[derive(Decode)]`
//! implements the matching reconstruction entry point, consuming the fields
//! in the same order. Keeping both derives on the same struct keeps the
//! positional contract in lockstep by construction.
//!
//! The type-identifier token defaults to the struct's name and can be
//! overridden with `#[stream(ident = "...")]`, which keeps old streams
//! decodable when a type is renamed.

extern crate proc_macro;

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, FieldsNamed, Ident, LitStr};

/// Resolves the type-identifier token: the struct name, unless overridden
/// with `#[stream(ident = "...")]`.
fn type_ident_from_attrs(attrs: &[Attribute], default: &Ident) -> syn::Result<String> {
    let mut ident = default.to_string();
    for attr in attrs {
        if !attr.path().is_ident("stream") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("ident") {
                let value: LitStr = meta.value()?.parse()?;
                ident = value.value();
                Ok(())
            } else {
                Err(meta.error("unsupported stream attribute; expected `ident = \"...\"`"))
            }
        })?;
    }
    Ok(ident)
}

/// The positional field contract only makes sense for named structs;
/// reject everything else with a pointed error.
fn named_fields(input: &DeriveInput) -> syn::Result<&FieldsNamed> {
    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => Ok(fields),
            _ => Err(syn::Error::new_spanned(
                &input.ident,
                "Encode/Decode can only be derived for structs with named fields",
            )),
        },
        _ => Err(syn::Error::new_spanned(
            &input.ident,
            "Encode/Decode can only be derived for structs with named fields",
        )),
    }
}

/// Derives the encode half of the serializable-object contract.
///
/// Emits `SerializableObject` (type-identifier token, field count, ordered
/// field encoding, downcast-based equality and cloning) and an `Encoder`
/// impl that writes the object header followed by the field sequence.
///
/// Requires `Clone`, `PartialEq` and `Debug` on the deriving type.
#[proc_macro_derive(Encode, attributes(stream))]
pub fn derive_encode(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_encode(&input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

/// Derives the reconstruction entry point.
///
/// Emits `DecodableObject` (compile-time type-identifier token and field
/// count, plus `decode_fields` reading the fields in declaration order) and
/// a `Decoder` impl that validates the object header first.
#[proc_macro_derive(Decode, attributes(stream))]
pub fn derive_decode(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_decode(&input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

fn expand_encode(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let fields = named_fields(input)?;
    let ident_lit = type_ident_from_attrs(&input.attrs, name)?;
    let field_idents: Vec<&Ident> = fields
        .named
        .iter()
        .map(|field| field.ident.as_ref().expect("named field"))
        .collect();
    let field_count = field_idents.len();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::stream_typed_coder::SerializableObject for #name #ty_generics #where_clause {
            fn type_ident(&self) -> &'static str {
                #ident_lit
            }

            fn field_count(&self) -> usize {
                #field_count
            }

            fn encode_fields(
                &self,
                encoder: &mut ::stream_typed_coder::StreamTypedEncoder,
            ) -> ::stream_typed_coder::Result<()> {
                #(
                    ::stream_typed_coder::Encoder::encode(&self.#field_idents, encoder)?;
                )*
                Ok(())
            }

            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }

            fn eq_object(&self, other: &dyn ::stream_typed_coder::SerializableObject) -> bool {
                match other.as_any().downcast_ref::<Self>() {
                    Some(other) => self == other,
                    None => false,
                }
            }

            fn clone_object(
                &self,
            ) -> ::std::boxed::Box<dyn ::stream_typed_coder::SerializableObject> {
                ::std::boxed::Box::new(::core::clone::Clone::clone(self))
            }
        }

        impl #impl_generics ::stream_typed_coder::Encoder for #name #ty_generics #where_clause {
            fn encode(
                &self,
                encoder: &mut ::stream_typed_coder::StreamTypedEncoder,
            ) -> ::stream_typed_coder::Result<()> {
                encoder.put_object(self)
            }
        }
    })
}

fn expand_decode(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let fields = named_fields(input)?;
    let ident_lit = type_ident_from_attrs(&input.attrs, name)?;
    let field_idents: Vec<&Ident> = fields
        .named
        .iter()
        .map(|field| field.ident.as_ref().expect("named field"))
        .collect();
    let field_count = field_idents.len();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::stream_typed_coder::DecodableObject for #name #ty_generics #where_clause {
            const TYPE_IDENT: &'static str = #ident_lit;
            const FIELD_COUNT: usize = #field_count;

            fn decode_fields(
                decoder: &mut ::stream_typed_coder::StreamTypedDecoder<'_>,
            ) -> ::stream_typed_coder::Result<Self> {
                Ok(Self {
                    #(
                        #field_idents: ::stream_typed_coder::Decoder::decode(decoder)?,
                    )*
                })
            }
        }

        impl #impl_generics ::stream_typed_coder::Decoder for #name #ty_generics #where_clause {
            fn decode(
                decoder: &mut ::stream_typed_coder::StreamTypedDecoder<'_>,
            ) -> ::stream_typed_coder::Result<Self> {
                decoder.begin_object(
                    <Self as ::stream_typed_coder::DecodableObject>::TYPE_IDENT,
                    <Self as ::stream_typed_coder::DecodableObject>::FIELD_COUNT,
                )?;
                <Self as ::stream_typed_coder::DecodableObject>::decode_fields(decoder)
            }
        }
    })
}
