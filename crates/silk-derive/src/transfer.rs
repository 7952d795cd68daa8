//! Transfer derive macro implementation

use crate::common::syn_types::{ScalarKind, scalar_kind};
use heck::ToLowerCamelCase;
use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, Result};

struct FieldAttrs {
    rename: Option<String>,
    skip: bool,
}

fn parse_field_attrs(field: &syn::Field) -> Result<FieldAttrs> {
    let mut attrs = FieldAttrs {
        rename: None,
        skip: false,
    };
    for attr in &field.attrs {
        if !attr.path().is_ident("silk") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                attrs.skip = true;
                Ok(())
            } else if meta.path.is_ident("rename") {
                let lit: syn::LitStr = meta.value()?.parse()?;
                attrs.rename = Some(lit.value());
                Ok(())
            } else {
                Err(meta.error("expected `rename = \"...\"` or `skip`"))
            }
        })?;
    }
    Ok(attrs)
}

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Transfer can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Transfer can only be derived for structs",
            ));
        }
    };

    let mut defs = Vec::new();
    let mut arms = Vec::new();

    for field in fields {
        let attrs = parse_field_attrs(field)?;
        if attrs.skip {
            continue;
        }
        let Some(kind) = scalar_kind(&field.ty) else {
            if attrs.rename.is_some() {
                return Err(syn::Error::new_spanned(
                    &field.ty,
                    "Transfer fields must be String, an integer, a float or bool",
                ));
            }
            continue;
        };

        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let rust_name = ident.unraw().to_string();
        let key = attrs.rename.unwrap_or_else(|| rust_name.clone());
        let alias = key.to_lower_camel_case();
        let index = defs.len();
        let ty = &field.ty;

        let (kind_tokens, arm) = match kind {
            ScalarKind::Text => (
                quote!(silk::FieldKind::Text),
                quote!((#index, silk::Coerced::Text(v)) => self.#ident = v,),
            ),
            ScalarKind::Int => (
                quote!(silk::FieldKind::Int),
                quote!((#index, silk::Coerced::Int(v)) => self.#ident = v as #ty,),
            ),
            ScalarKind::Float => (
                quote!(silk::FieldKind::Float),
                quote!((#index, silk::Coerced::Float(v)) => self.#ident = v as #ty,),
            ),
            ScalarKind::Bool => (
                quote!(silk::FieldKind::Bool),
                quote!((#index, silk::Coerced::Bool(v)) => self.#ident = v,),
            ),
        };

        defs.push(quote! {
            silk::FieldDef { name: #key, alias: #alias, kind: #kind_tokens }
        });
        arms.push(arm);
    }

    let type_name = name.to_string();

    Ok(quote! {
        impl #impl_generics silk::Transfer for #name #ty_generics #where_clause {
            const FIELDS: &'static [silk::FieldDef] = &[#(#defs),*];

            #[allow(unreachable_code, clippy::unnecessary_cast, clippy::cast_possible_truncation)]
            fn set_field(&mut self, index: usize, value: silk::Coerced) -> silk::SilkResult<()> {
                match (index, value) {
                    #(#arms)*
                    (index, value) => {
                        return Err(silk::SilkError::invalid_target(format!(
                            "{} cannot accept {:?} at field #{}",
                            #type_name, value, index
                        )));
                    }
                }
                Ok(())
            }
        }
    })
}
