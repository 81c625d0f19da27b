//! Procedural macros for the docaccess project.
//!
//! - `#[derive(Storable)]` with `#[storable(collection = "name")]` implements
//!   `Storable` for a type.
//! - `#[derive(Identified)]` implements `HasIdentifier` over a `String` field, either the
//!   one marked `#[storable(id)]` or the field named `id`.
//!
//! Generated code refers to the `docaccess` facade crate.
//!
//! ```ignore
//! #[derive(Debug, Clone, Serialize, Deserialize, Storable, Identified)]
//! #[storable(collection = "users")]
//! pub struct User {
//!     #[storable(id)]
//!     pub uid: String,
//!     pub name: String,
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as docaccess_macros;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Ident, LitStr, parse_macro_input};

#[proc_macro_derive(Storable, attributes(storable))]
pub fn derive_storable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    expand_storable(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

#[proc_macro_derive(Identified, attributes(storable))]
pub fn derive_identified(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    expand_identified(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand_storable(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let mut collection: Option<LitStr> = None;

    for attr in input.attrs.iter().filter(|attr| attr.path().is_ident("storable")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("collection") {
                collection = Some(meta.value()?.parse()?);
                Ok(())
            } else {
                Err(meta.error("expected `collection = \"...\"`"))
            }
        })?;
    }

    let collection = collection.ok_or_else(|| {
        syn::Error::new_spanned(
            &input.ident,
            "missing `#[storable(collection = \"...\")]` attribute",
        )
    })?;

    if collection.value().is_empty() {
        return Err(syn::Error::new_spanned(&collection, "collection name must not be empty"));
    }

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::docaccess::document::Storable for #ident #ty_generics #where_clause {
            fn collection() -> ::docaccess::collection::CollectionRef {
                ::docaccess::collection::CollectionRef::new(#collection)
            }
        }
    })
}

fn expand_identified(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(&input.ident, "Identified can only be derived for structs"));
    };
    let Fields::Named(fields) = &data.fields else {
        return Err(syn::Error::new_spanned(&input.ident, "Identified requires named fields"));
    };

    let mut marked: Option<&Ident> = None;
    for field in &fields.named {
        for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("storable")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("id") {
                    Ok(())
                } else {
                    Err(meta.error("expected `id`"))
                }
            })?;

            if marked.is_some() {
                return Err(syn::Error::new_spanned(attr, "only one field may be marked `#[storable(id)]`"));
            }
            marked = field.ident.as_ref();
        }
    }

    let id_field = marked
        .or_else(|| {
            fields
                .named
                .iter()
                .filter_map(|field| field.ident.as_ref())
                .find(|ident| *ident == "id")
        })
        .ok_or_else(|| {
            syn::Error::new_spanned(
                &input.ident,
                "no `id` field; mark the identifier with `#[storable(id)]`",
            )
        })?;

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::docaccess::document::HasIdentifier for #ident #ty_generics #where_clause {
            fn id(&self) -> &str {
                &self.#id_field
            }

            fn set_id(&mut self, id: ::std::string::String) {
                self.#id_field = id;
            }
        }
    })
}
