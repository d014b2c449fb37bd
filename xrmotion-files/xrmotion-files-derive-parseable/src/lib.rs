extern crate proc_macro2;

use proc_macro_crate::{FoundCrate, crate_name};
use proc_macro2::{Span, TokenStream};
use quote::{quote, quote_spanned};
use syn::{Data, DeriveInput, Fields, FieldsNamed, Ident, parse_macro_input, spanned::Spanned};

/// Implements `Parseable` for a struct with named fields, reading every field in declaration order.
#[proc_macro_derive(Parse)]
pub fn derive_parseable(item: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    derive_parse_internal(input).into()
}

/// Implements `Writable` for a struct with named fields, writing every field in declaration order.
#[proc_macro_derive(Write)]
pub fn derive_writable(item: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    derive_write_internal(input).into()
}

fn files_crate() -> TokenStream {
    let found_crate = crate_name("xrmotion-files").expect("xrmotion-files is present in `Cargo.toml`");

    match found_crate {
        FoundCrate::Itself => quote!(crate),
        FoundCrate::Name(name) => {
            let ident = Ident::new(&name, Span::call_site());
            quote!(#ident)
        }
    }
}

fn named_fields<'a>(input: &'a DeriveInput, derive: &str) -> &'a FieldsNamed {
    let ident = &input.ident;
    match &input.data {
        Data::Struct(s) => match &s.fields {
            Fields::Named(fields) => fields,
            _ => panic!(
                "`#[derive({})]` only supports named struct fields at the moment: {}",
                derive, ident
            ),
        },
        _ => panic!("`#[derive({})]` is only available on structs: {}", derive, ident),
    }
}

// taken from sharnoff/derive-syn-parse: put it into a separate function for testability
pub(crate) fn derive_parse_internal(input: DeriveInput) -> TokenStream {
    let crate_name = files_crate();
    let fields = named_fields(&input, "Parse");

    let recurse = fields.named.iter().map(|f| {
        let name = &f.ident;
        let ftype = &f.ty;
        // <T>::parse instead of T::parse, so that generic field types like [f32; 4] or Vec<T> work, too
        quote_spanned! {f.span()=>
            #name: <#ftype as #crate_name::common::reader::Parseable<#ftype>>::parse(rdr)?,
        }
    });

    let ident = &input.ident;
    quote!(
        impl #crate_name::common::reader::Parseable<#ident> for #ident {
            fn parse(rdr: &mut #crate_name::common::packed::PackedReader<'_>) -> Result<#ident, #crate_name::ParserError> {
                Ok(#ident {
                    #(#recurse)*
                })
            }
        }

        impl #crate_name::common::reader::Parseable<Vec<#ident>> for Vec<#ident> {
            fn parse(rdr: &mut #crate_name::common::packed::PackedReader<'_>) -> Result<Vec<#ident>, #crate_name::ParserError> {
                #crate_name::common::reader::read_chunk_array(rdr)
            }
        }
    )
}

pub(crate) fn derive_write_internal(input: DeriveInput) -> TokenStream {
    let crate_name = files_crate();
    let fields = named_fields(&input, "Write");

    let recurse = fields.named.iter().map(|f| {
        let name = &f.ident;
        quote_spanned! {f.span()=>
            #crate_name::common::reader::Writable::write(&self.#name, wtr);
        }
    });

    let ident = &input.ident;
    quote!(
        impl #crate_name::common::reader::Writable for #ident {
            fn write(&self, wtr: &mut #crate_name::common::packed::PackedWriter) {
                #(#recurse)*
            }
        }
    )
}
