use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, GenericArgument, LitStr, Meta, PathArguments, Type};

pub fn derive_filterable_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand(input: DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let record_type = filterable_option(&input.attrs, "name")?.unwrap_or_else(|| name.unraw().to_string());

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => return Err(syn::Error::new_spanned(name, "Filterable requires a struct with named fields")),
        },
        _ => return Err(syn::Error::new_spanned(name, "Filterable can only be derived for structs")),
    };

    let mut field_infos = Vec::new();
    let mut read_arms = Vec::new();
    for field in fields {
        if !field.attrs.iter().any(|attr| attr.path().is_ident("filterable")) {
            continue;
        }
        let Some(ident) = &field.ident else { continue };
        let field_name = filterable_option(&field.attrs, "rename")?.unwrap_or_else(|| ident.unraw().to_string());
        let type_tag = type_tag(&field.ty)?;

        field_infos.push(quote! {
            ::criteria::FieldInfo::new(#field_name, ::criteria::TypeTag::#type_tag)
        });
        read_arms.push(quote! {
            #field_name => ::core::option::Option::Some(::criteria::Value::from(::core::clone::Clone::clone(&self.#ident)))
        });
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::criteria::Filterable for #name #ty_generics #where_clause {
            fn record_type() -> &'static str {
                #record_type
            }

            fn filterable_fields() -> ::std::vec::Vec<::criteria::FieldInfo> {
                ::std::vec![#(#field_infos),*]
            }
        }

        impl #impl_generics ::criteria::FieldReader for #name #ty_generics #where_clause {
            fn field(&self, name: &str) -> ::core::option::Option<::criteria::Value> {
                match name {
                    #(#read_arms,)*
                    _ => ::core::option::Option::None,
                }
            }
        }
    })
}

/// Value of `key = "..."` inside `#[filterable(...)]`, if present. Bare `#[filterable]` has none.
fn filterable_option(attrs: &[Attribute], key: &str) -> syn::Result<Option<String>> {
    let mut found = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("filterable")) {
        if !matches!(attr.meta, Meta::List(_)) {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") || meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                if meta.path.is_ident(key) {
                    found = Some(value.value());
                }
                Ok(())
            } else {
                Err(meta.error("expected `rename = \"...\"` or `name = \"...\"`"))
            }
        })?;
    }
    Ok(found)
}

/// Map a field type onto a `criteria::TypeTag` variant. `Option<T>` maps to the tag of `T`.
fn type_tag(ty: &Type) -> syn::Result<proc_macro2::Ident> {
    let unsupported =
        || syn::Error::new_spanned(ty, "unsupported filterable field type; expected String, an integer, a float, bool, or Option of those");
    let Type::Path(path) = ty else { return Err(unsupported()) };
    let segment = path.path.segments.last().ok_or_else(unsupported)?;

    if segment.ident == "Option" {
        if let PathArguments::AngleBracketed(args) = &segment.arguments {
            if let Some(GenericArgument::Type(inner)) = args.args.first() {
                return type_tag(inner);
            }
        }
        return Err(unsupported());
    }

    let tag = match segment.ident.to_string().as_str() {
        "String" => "Text",
        "i8" | "i16" | "i32" | "u8" | "u16" => "Int32",
        "i64" | "u32" => "Int64",
        "f32" => "Float32",
        "f64" => "Float64",
        "bool" => "Bool",
        _ => return Err(unsupported()),
    };
    Ok(format_ident!("{}", tag))
}
