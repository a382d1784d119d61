//! Procedural macros for rndi.
//!
//! `#[derive(Injectable)]` turns a struct's named fields into the
//! parameter table the container resolves by keyword, and submits the type
//! to the class catalog.
//!
//! ```rust,ignore
//! #[derive(Injectable)]
//! struct Mailer {
//!     host: String,
//!     #[inject(default = "25")]
//!     port: u16,
//!     #[inject(name = "mail_transport")]
//!     transport: Transport,
//!     #[inject(default)]
//!     retries: u8,
//! }
//! ```

use darling::ast::{Data, Style};
use darling::util::{Ignored, Override};
use darling::{FromDeriveInput, FromField};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{DeriveInput, Generics, Ident, LitStr, Path, Type, parse_macro_input, parse_quote};

/// Container-level options: `#[injectable(crate = "path")]`.
#[derive(FromDeriveInput)]
#[darling(attributes(injectable), supports(struct_named, struct_unit))]
struct InjectableInput {
    ident: Ident,
    generics: Generics,
    data: Data<Ignored, InjectField>,
    #[darling(rename = "crate", default)]
    krate: Option<Path>,
}

/// Field-level options: `#[inject(name = "..", default | default = "..")]`.
#[derive(FromField)]
#[darling(attributes(inject))]
struct InjectField {
    ident: Option<Ident>,
    ty: Type,
    #[darling(default)]
    name: Option<String>,
    #[darling(default)]
    default: Option<Override<LitStr>>,
}

/// Derives `rndi::Injectable`.
///
/// Every field becomes a parameter resolved by its name, or by
/// `#[inject(name = "..")]`. `#[inject(default)]` falls back to
/// `Default::default()` when nothing is bound; `#[inject(default = "expr")]`
/// falls back to `expr`.
#[proc_macro_derive(Injectable, attributes(inject, injectable))]
pub fn derive_injectable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    InjectableInput::from_derive_input(&input)
        .and_then(expand)
        .unwrap_or_else(darling::Error::write_errors)
        .into()
}

fn expand(input: InjectableInput) -> darling::Result<TokenStream2> {
    if !input.generics.params.is_empty() {
        return Err(darling::Error::custom("`Injectable` cannot be derived for generic types")
            .with_span(&input.generics));
    }

    let krate = input.krate.unwrap_or_else(|| parse_quote!(::rndi));
    let ident = &input.ident;

    let Some(fields) = input.data.take_struct() else {
        return Err(darling::Error::unsupported_shape("enum").with_span(ident));
    };
    let is_unit = matches!(fields.style, Style::Unit);

    let mut parameters = Vec::with_capacity(fields.len());
    let mut initializers = Vec::with_capacity(fields.len());
    let mut errors = darling::Error::accumulator();

    for field in fields.fields {
        let Some(field_ident) = field.ident else {
            errors.push(darling::Error::custom("expected a named field").with_span(&field.ty));
            continue;
        };
        let keyword = field
            .name
            .unwrap_or_else(|| field_ident.unraw().to_string());
        let keyword = LitStr::new(&keyword, field_ident.span());
        let ty = &field.ty;

        match field.default {
            None => {
                parameters.push(quote! { #krate::Parameter::required::<#ty>(#keyword) });
                initializers.push(quote! { #field_ident: args.take::<#ty>(#keyword)? });
            }
            Some(default) => {
                let fallback = match default {
                    Override::Inherit => quote! { ::core::default::Default::default() },
                    Override::Explicit(lit) => {
                        let parsed = lit.parse::<syn::Expr>().map_err(darling::Error::from);
                        match errors.handle(parsed) {
                            Some(expr) => quote! { #expr },
                            None => continue,
                        }
                    }
                };
                parameters.push(quote! { #krate::Parameter::optional::<#ty>(#keyword) });
                initializers.push(quote! {
                    #field_ident: args.take_or_else::<#ty>(#keyword, || #fallback)?
                });
            }
        }
    }

    errors.finish()?;

    let instance = if is_unit {
        quote! { Self }
    } else {
        quote! { Self { #(#initializers),* } }
    };

    Ok(quote! {
        impl #krate::Injectable for #ident {
            fn parameters() -> ::std::vec::Vec<#krate::Parameter> {
                ::std::vec![#(#parameters),*]
            }

            #[allow(unused_variables)]
            fn construct(
                args: &mut #krate::Arguments,
            ) -> ::core::result::Result<Self, #krate::GraphError> {
                ::core::result::Result::Ok(#instance)
            }
        }

        #krate::inventory::submit! {
            #krate::ClassRef::of::<#ident>()
        }
    })
}
