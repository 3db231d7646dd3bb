mod filterable;

use proc_macro::TokenStream;

/// Implements `criteria::Filterable` and `criteria::FieldReader` for a struct with named fields.
///
/// Only fields marked `#[filterable]` are exposed. `#[filterable(rename = "userId")]` changes the
/// name used in filter expressions, and `#[filterable(name = "...")]` on the struct overrides the
/// record type name.
#[proc_macro_derive(Filterable, attributes(filterable))]
pub fn derive_filterable(input: TokenStream) -> TokenStream { filterable::derive_filterable_impl(input) }
