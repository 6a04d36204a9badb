//! `#[stack_trace_debug]` attribute for snafu error enums.
//!
//! Generates a `Debug` impl that prints the variant name, its display
//! message, the implicit `location` (when the variant carries one) and the
//! debug form of any `source` field, so logged errors read as a chain.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::Fields;
use syn::ItemEnum;
use syn::Variant;
use syn::parse_macro_input;

#[proc_macro_attribute]
pub fn stack_trace_debug(_args: TokenStream, input: TokenStream) -> TokenStream {
    let item = parse_macro_input!(input as ItemEnum);
    expand(&item).into()
}

fn expand(item: &ItemEnum) -> TokenStream2 {
    let name = &item.ident;
    let (impl_generics, ty_generics, where_clause) = item.generics.split_for_impl();
    let arms = item.variants.iter().map(variant_arm);

    quote! {
        #item

        impl #impl_generics ::std::fmt::Debug for #name #ty_generics #where_clause {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self {
                    #(#arms)*
                }
            }
        }
    }
}

fn variant_arm(variant: &Variant) -> TokenStream2 {
    let ident = &variant.ident;
    let label = ident.to_string();

    match &variant.fields {
        Fields::Named(named) => {
            let has_field = |wanted: &str| {
                named
                    .named
                    .iter()
                    .any(|field| field.ident.as_ref().is_some_and(|id| id == wanted))
            };

            let (bind_location, write_location) = if has_field("location") {
                (
                    quote! { location, },
                    quote! { ::std::write!(f, " at {}", location)?; },
                )
            } else {
                (quote! {}, quote! {})
            };
            let (bind_source, write_source) = if has_field("source") {
                (
                    quote! { source, },
                    quote! { ::std::write!(f, "\nCaused by: {:?}", source)?; },
                )
            } else {
                (quote! {}, quote! {})
            };

            quote! {
                Self::#ident { #bind_location #bind_source .. } => {
                    ::std::write!(f, "{}: {}", #label, self)?;
                    #write_location
                    #write_source
                    ::std::result::Result::Ok(())
                }
            }
        }
        Fields::Unnamed(_) => quote! {
            Self::#ident(..) => ::std::write!(f, "{}: {}", #label, self),
        },
        Fields::Unit => quote! {
            Self::#ident => ::std::write!(f, "{}: {}", #label, self),
        },
    }
}
