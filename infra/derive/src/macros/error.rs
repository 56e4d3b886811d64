use fxhash::FxHashSet;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Attribute, Data, DeriveInput, Field, Fields, Ident, Type, Variant};

const CONTEXT_FIELD: &str = "context";
const INTERNAL_VARIANT: &str = "Internal";

struct VariantMeta<'a> {
    ident: &'a Ident,
    source: Option<(&'a Ident, &'a Type)>,
    has_context: bool,
    cfg_attrs: Vec<Attribute>,
}

/// Expands `#[vreg_error]` on an enum.
pub fn expand_derive(input: DeriveInput) -> TokenStream {
    match try_expand(&input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error(),
    }
}

fn try_expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let ext = format_ident!("{name}Ext");

    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(name, "vreg_error can only be applied to enums"));
    };

    let variants = data.variants.iter().map(parse_variant).collect::<syn::Result<Vec<_>>>()?;
    if let Some(v) = variants.iter().find(|v| v.source.is_some() && !v.has_context) {
        return Err(syn::Error::new_spanned(
            v.ident,
            "vreg_error requires `context: Option<Cow<'static, str>>` for variants with a source",
        ));
    }

    let derives = derived_trait_names(&input.attrs);
    let mut missing = Vec::new();
    if !derives.contains("Debug") {
        missing.push(quote!(Debug));
    }
    if !derives.contains("Error") {
        missing.push(quote!(::thiserror::Error));
    }
    let derive_attr =
        if missing.is_empty() { quote!() } else { quote! { #[derive(#(#missing),*)] } };

    let context_trait = context_trait(name, &ext, &variants);
    let source_impls = variants.iter().filter_map(|v| source_impls(name, &ext, v));
    let internal_impls = internal_impls(name, &variants);
    let kind_impl = kind_impl(name, &variants);

    Ok(quote! {
        #[allow(non_shorthand_field_patterns)]
        #derive_attr
        #input

        #context_trait
        #(#source_impls)*
        #internal_impls
        #kind_impl

        #[allow(dead_code)]
        fn format_context(context: &Option<std::borrow::Cow<'static, str>>) -> std::borrow::Cow<'static, str> {
            context.as_ref().map_or(std::borrow::Cow::Borrowed(""), |c| std::borrow::Cow::Owned(format!(" ({c})")))
        }
    })
}

fn parse_variant(v: &Variant) -> syn::Result<VariantMeta<'_>> {
    let Fields::Named(fields) = &v.fields else {
        return Err(syn::Error::new_spanned(
            v,
            "vreg_error requires named fields for source/context handling",
        ));
    };

    let context = fields.named.iter().find(|f| f.ident.as_ref().is_some_and(|i| i == CONTEXT_FIELD));
    if let Some(field) = context
        && !is_context_type(&field.ty)
    {
        return Err(syn::Error::new_spanned(
            &field.ty,
            "context field must be Option<Cow<'static, str>>",
        ));
    }

    let source = fields.named.iter().find(|f| is_source_field(f)).and_then(|f| {
        let ident = f.ident.as_ref()?;
        Some((ident, &f.ty))
    });

    Ok(VariantMeta {
        ident: &v.ident,
        source,
        has_context: context.is_some(),
        cfg_attrs: v.attrs.iter().filter(|attr| attr.path().is_ident("cfg")).cloned().collect(),
    })
}

fn is_source_field(field: &Field) -> bool {
    field.ident.as_ref().is_some_and(|ident| ident == "source")
        || field.attrs.iter().any(|attr| attr.path().is_ident("source") || attr.path().is_ident("from"))
}

/// Accepts `Option<Cow<'static, str>>` with any path prefix on `Option` / `Cow`.
fn is_context_type(ty: &Type) -> bool {
    let rendered = quote!(#ty).to_string().replace(' ', "");
    let Some((outer, inner)) = rendered.split_once('<') else {
        return false;
    };
    (outer == "Option" || outer.ends_with("::Option"))
        && (inner == "Cow<'static,str>>" || inner.ends_with("::Cow<'static,str>>"))
}

fn context_trait(name: &Ident, ext: &Ident, variants: &[VariantMeta<'_>]) -> TokenStream {
    let arms = variants.iter().filter(|v| v.has_context).map(|v| {
        let cfg_attrs = &v.cfg_attrs;
        let ident = v.ident;
        quote! { #(#cfg_attrs)* #name::#ident { context: c, .. } => *c = Some(context.into()), }
    });

    quote! {
        pub trait #ext<T> {
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Result<T, #name>;
        }

        #[automatically_derived]
        impl<T> #ext<T> for Result<T, #name> {
            #[inline]
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Self {
                self.map_err(|mut e| {
                    match &mut e {
                        #( #arms )*
                        _ => {}
                    }
                    e
                })
            }
        }
    }
}

fn source_impls(name: &Ident, ext: &Ident, v: &VariantMeta<'_>) -> Option<TokenStream> {
    if v.ident == INTERNAL_VARIANT {
        return None;
    }
    let (field, ty) = v.source?;
    let ident = v.ident;
    let cfg_attrs = &v.cfg_attrs;

    Some(quote! {
        #(#cfg_attrs)*
        #[automatically_derived]
        impl From<#ty> for #name {
            #[inline]
            fn from(#field: #ty) -> Self { Self::#ident { #field, context: None } }
        }

        #(#cfg_attrs)*
        impl<T> #ext<T> for std::result::Result<T, #ty> {
            #[inline]
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> std::result::Result<T, #name> {
                self.map_err(|#field| #name::#ident { #field, context: Some(context.into()) })
            }
        }
    })
}

fn internal_impls(name: &Ident, variants: &[VariantMeta<'_>]) -> TokenStream {
    let Some(internal) = variants.iter().find(|v| v.ident == INTERNAL_VARIANT) else {
        return quote!();
    };
    let cfg_attrs = &internal.cfg_attrs;

    quote! {
        #(#cfg_attrs)*
        impl From<&'static str> for #name {
            #[inline]
            fn from(s: &'static str) -> Self { Self::Internal { message: std::borrow::Cow::Borrowed(s), context: None } }
        }
        #(#cfg_attrs)*
        impl From<String> for #name {
            #[inline]
            fn from(s: String) -> Self { Self::Internal { message: std::borrow::Cow::Owned(s), context: None } }
        }
    }
}

fn kind_impl(name: &Ident, variants: &[VariantMeta<'_>]) -> TokenStream {
    let arms = variants.iter().map(|v| {
        let cfg_attrs = &v.cfg_attrs;
        let ident = v.ident;
        let kind = snake_case(&ident.to_string());
        quote! { #(#cfg_attrs)* Self::#ident { .. } => #kind, }
    });

    quote! {
        #[automatically_derived]
        impl #name {
            /// Stable `snake_case` name of the variant.
            #[must_use]
            pub const fn kind(&self) -> &'static str {
                match self {
                    #( #arms )*
                }
            }
        }
    }
}

fn snake_case(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len() + 4);
    let mut prev_lower = false;
    for ch in ident.chars() {
        if ch.is_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
            prev_lower = false;
        } else {
            out.push(ch);
            prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        }
    }
    out
}

fn derived_trait_names(attrs: &[Attribute]) -> FxHashSet<String> {
    let mut traits = FxHashSet::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("derive")) {
        let _ = attr.parse_nested_meta(|meta| {
            if let Some(segment) = meta.path.segments.last() {
                traits.insert(segment.ident.to_string());
            }
            Ok(())
        });
    }

    traits
}

#[cfg(test)]
mod tests {
    use super::{expand_derive, snake_case};
    use syn::parse_quote;

    #[test]
    fn rejects_source_without_context() {
        let input = parse_quote! {
            pub enum DemoError {
                #[error("IO error: {source}")]
                Io { source: std::io::Error },
            }
        };
        let out = expand_derive(input).to_string();
        assert!(out.contains("compile_error"));
        assert!(out.contains("requires `context"));
    }

    #[test]
    fn rejects_tuple_variants() {
        let input = parse_quote! {
            pub enum DemoError {
                #[error("IO error: {0}")]
                Io(std::io::Error),
            }
        };
        let out = expand_derive(input).to_string();
        assert!(out.contains("requires named fields"));
    }

    #[test]
    fn rejects_bad_context_type() {
        let input = parse_quote! {
            pub enum DemoError {
                #[error("Bad: {message}")]
                Bad { message: String, context: Option<String> },
            }
        };
        let out = expand_derive(input).to_string();
        assert!(out.contains("context field must be"));
    }

    #[test]
    fn rejects_structs() {
        let input = parse_quote! {
            pub struct NotAnEnum { message: String }
        };
        let out = expand_derive(input).to_string();
        assert!(out.contains("can only be applied to enums"));
    }

    #[test]
    fn accepts_qualified_context_type() {
        let input = parse_quote! {
            pub enum DemoError {
                #[error("Bad: {message}")]
                Bad { message: String, context: Option<std::borrow::Cow<'static, str>> },
            }
        };
        let out = expand_derive(input).to_string();
        assert!(!out.contains("compile_error"));
        assert!(out.contains("DemoErrorExt"));
    }

    #[test]
    fn kind_names_are_snake_case() {
        assert_eq!(snake_case("Input"), "input");
        assert_eq!(snake_case("SessionNotFound"), "session_not_found");
        assert_eq!(snake_case("HTTPStatus"), "httpstatus");
    }
}
