//! `#[derive(WalkAst)]`: generates `crate::walk::Walk` for AST node types.
//!
//! Every field is walked in declaration order. Fields marked `#[walk(skip)]`
//! are left out, which keeps leaf data (positions, flags, decoded values)
//! from needing a `Walk` impl of its own.

use proc_macro::TokenStream;
use quote::{format_ident, quote, quote_spanned};
use syn::{Data, DeriveInput, Field, Fields, Index, parse_macro_input, spanned::Spanned};

#[proc_macro_derive(WalkAst, attributes(walk))]
pub fn derive_walk_ast(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let span = input.span();

    let walk_body = match generate_walk_body(&input.data) {
        Ok(body) => body,
        Err(err) => return err.into_compile_error().into(),
    };

    let expanded = quote_spanned! {span =>
        impl<'ast> crate::walk::Walk<'ast> for #name {
            #[inline(always)]
            #[allow(unused_variables)]
            fn walk<V: crate::walk::Visitor<'ast> + ?Sized>(
                &self,
                a: &'ast crate::ast::AstArena,
                v: &mut V
            ) {
                #walk_body
            }
        }
    };

    expanded.into()
}

fn generate_walk_body(data: &Data) -> syn::Result<proc_macro2::TokenStream> {
    match data {
        Data::Struct(data_struct) => generate_fields_walk(&data_struct.fields),
        Data::Enum(data_enum) => {
            let arms = data_enum
                .variants
                .iter()
                .map(|variant| generate_variant_arm(&variant.ident, &variant.fields))
                .collect::<syn::Result<Vec<_>>>()?;

            Ok(quote! {
                match self {
                    #(#arms)*
                }
            })
        }
        Data::Union(u) => Err(syn::Error::new_spanned(
            u.union_token,
            "WalkAst cannot be derived for unions",
        )),
    }
}

/// True for fields annotated with `#[walk(skip)]`.
fn is_skipped(field: &Field) -> syn::Result<bool> {
    let mut skip = false;
    for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("walk")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                skip = true;
                Ok(())
            } else {
                Err(meta.error("expected `skip`"))
            }
        })?;
    }
    Ok(skip)
}

fn generate_fields_walk(fields: &Fields) -> syn::Result<proc_macro2::TokenStream> {
    let mut walk_calls = Vec::new();
    for (i, field) in fields.iter().enumerate() {
        if is_skipped(field)? {
            continue;
        }
        let field_access = match &field.ident {
            Some(ident) => quote! { &self.#ident },
            None => {
                let index = Index::from(i);
                quote! { &self.#index }
            }
        };
        walk_calls.push(quote! { crate::walk::Walk::walk(#field_access, a, v); });
    }

    Ok(quote! { #(#walk_calls)* })
}

fn generate_variant_arm(
    variant_name: &syn::Ident,
    fields: &Fields,
) -> syn::Result<proc_macro2::TokenStream> {
    // Bindings get a prefix so field names never shadow `a` or `v`.
    let mut patterns = Vec::new();
    let mut walk_calls = Vec::new();
    for (i, field) in fields.iter().enumerate() {
        let binding = match &field.ident {
            Some(ident) => format_ident!("__walk_{}", ident),
            None => format_ident!("__walk_{}", i),
        };
        if is_skipped(field)? {
            if let Some(ident) = &field.ident {
                patterns.push(quote! { #ident: _ });
            } else {
                patterns.push(quote! { _ });
            }
            continue;
        }
        match &field.ident {
            Some(ident) => patterns.push(quote! { #ident: #binding }),
            None => patterns.push(quote! { #binding }),
        }
        walk_calls.push(quote! { crate::walk::Walk::walk(#binding, a, v); });
    }

    Ok(match fields {
        Fields::Unit => quote! { Self::#variant_name => {} },
        Fields::Named(_) => quote! {
            Self::#variant_name { #(#patterns),* } => {
                #(#walk_calls)*
            }
        },
        Fields::Unnamed(_) => quote! {
            Self::#variant_name(#(#patterns),*) => {
                #(#walk_calls)*
            }
        },
    })
}
