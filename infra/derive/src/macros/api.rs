use fxhash::FxHashSet;
use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{Attribute, Expr, ItemFn, ItemStruct, Lit, LitStr, Meta, MetaNameValue, Token};

const DEFAULT_RENAME: &str = "camelCase";

/// Expands `#[api_model]`: common derives, optional `ToSchema`, and the serde policy.
pub fn expand_api_model(args: TokenStream, input: ItemStruct) -> TokenStream {
    match try_expand_api_model(args, &input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error(),
    }
}

fn try_expand_api_model(args: TokenStream, input: &ItemStruct) -> syn::Result<TokenStream> {
    let args = ModelArgs::parse(args)?;
    let derives = derived_trait_names(&input.attrs);
    let existing = SerdeAttrs::collect(&input.attrs)?;

    let mut missing = Vec::new();
    for (name, path) in [
        ("Debug", quote!(Debug)),
        ("Serialize", quote!(::serde::Serialize)),
        ("Deserialize", quote!(::serde::Deserialize)),
    ] {
        if !derives.contains(name) {
            missing.push(path);
        }
    }
    let derive_attr =
        if missing.is_empty() { quote!() } else { quote! { #[derive(#(#missing),*)] } };

    let schema_attr = if derives.contains("ToSchema") {
        quote!()
    } else {
        quote! { #[cfg_attr(feature = "server", derive(::utoipa::ToSchema))] }
    };

    let rename = args.rename_all.unwrap_or_else(|| LitStr::new(DEFAULT_RENAME, Span::call_site()));
    let rename_attr = match &existing.rename_all {
        Some(current) if current.value() != rename.value() => {
            return Err(syn::Error::new_spanned(
                current,
                "Conflicting serde rename_all; remove it or pass the same value to api_model",
            ));
        },
        Some(_) => quote!(),
        None => quote! { #[serde(rename_all = #rename)] },
    };

    let deny = args.deny_unknown_fields.unwrap_or(true);
    let deny_attr = match (existing.deny_unknown_fields, deny) {
        (true, false) => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "deny_unknown_fields is already set via serde; remove it before disabling",
            ));
        },
        (false, true) => quote! { #[serde(deny_unknown_fields)] },
        _ => quote!(),
    };

    Ok(quote! {
        #derive_attr
        #schema_attr
        #rename_attr
        #deny_attr
        #input
    })
}

/// Expands `#[api_handler]`: `utoipa::path` registration plus a tracing span per handler.
pub fn expand_api_handler(args: TokenStream, input: ItemFn) -> TokenStream {
    let ItemFn { attrs, vis, sig, block } = input;
    let span_name = sig.ident.to_string();

    quote! {
        #(#attrs)*
        #[allow(clippy::unused_async)]
        #[cfg_attr(feature = "server", ::utoipa::path(#args))]
        #[::tracing::instrument(name = #span_name, level = "debug", skip_all)]
        #vis #sig #block
    }
}

#[derive(Default)]
struct ModelArgs {
    rename_all: Option<LitStr>,
    deny_unknown_fields: Option<bool>,
}

impl ModelArgs {
    fn parse(args: TokenStream) -> syn::Result<Self> {
        let metas = Punctuated::<Meta, Token![,]>::parse_terminated.parse2(args)?;
        let mut parsed = Self::default();

        for meta in metas {
            let Meta::NameValue(nv) = meta else {
                return Err(syn::Error::new_spanned(
                    meta,
                    "Expected name-value arguments like `rename_all = \"...\"`",
                ));
            };

            if nv.path.is_ident("rename_all") {
                let Lit::Str(value) = literal(&nv)? else {
                    return Err(syn::Error::new_spanned(&nv.value, "rename_all must be a string"));
                };
                if parsed.rename_all.replace(value).is_some() {
                    return Err(syn::Error::new_spanned(&nv, "Duplicate argument"));
                }
            } else if nv.path.is_ident("deny_unknown_fields") {
                let Lit::Bool(value) = literal(&nv)? else {
                    return Err(syn::Error::new_spanned(
                        &nv.value,
                        "deny_unknown_fields must be a boolean",
                    ));
                };
                if parsed.deny_unknown_fields.replace(value.value).is_some() {
                    return Err(syn::Error::new_spanned(&nv, "Duplicate argument"));
                }
            } else {
                return Err(syn::Error::new_spanned(
                    &nv.path,
                    "Unsupported argument; expected rename_all or deny_unknown_fields",
                ));
            }
        }

        Ok(parsed)
    }
}

fn literal(nv: &MetaNameValue) -> syn::Result<Lit> {
    match &nv.value {
        Expr::Lit(expr) => Ok(expr.lit.clone()),
        other => Err(syn::Error::new_spanned(other, "Expected a literal value")),
    }
}

#[derive(Default)]
struct SerdeAttrs {
    rename_all: Option<LitStr>,
    deny_unknown_fields: bool,
}

impl SerdeAttrs {
    fn collect(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut found = Self::default();
        for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename_all") {
                    found.rename_all = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("deny_unknown_fields") {
                    found.deny_unknown_fields = true;
                } else if meta.input.peek(Token![=]) {
                    let _: Expr = meta.value()?.parse()?;
                }
                Ok(())
            })?;
        }
        Ok(found)
    }
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
