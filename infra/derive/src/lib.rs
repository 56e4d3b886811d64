#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by every crate of the registration desk.
//!
//! * [`vreg_error`] turns an enum into a context-aware error type.
//! * [`vreg_slice`] wraps feature state into a cheaply clonable slice handle.
//! * [`api_model`] / [`api_handler`] keep DTOs and Axum handlers consistent with `OpenAPI`.
//! * [`main`] boots the async runtime with one of the `vreg-runtime` profiles.
//!
//! The examples below are `ignore`d because they need the consuming crates in scope.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Attribute macro to bootstrap the Tokio runtime from a `vreg-runtime` profile.
///
/// Transforms an `async fn main` into a standard `fn main` that builds the runtime
/// and blocks on the body.
///
/// # Arguments
///
/// * `interactive` - Current-thread runtime; one request is driven to completion at a time.
/// * `default` - Multi-threaded runtime sized from the available parallelism.
///
/// # Examples
///
/// ```rust,ignore
/// #[vreg_runtime::main(interactive)]
/// async fn main() -> anyhow::Result<()> {
/// # Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn main(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::runtime::expand_main(args.into(), input).into()
}

/// Attribute macro to define a standard API data model.
///
/// # Injected Behaviors
///
/// * **Derives**: `Debug`, `Serialize` and `Deserialize` if missing.
/// * **`OpenAPI`**: `utoipa::ToSchema` when the consuming crate enables its `server` feature.
/// * **Serde Policy**: `rename_all = "camelCase"` and `deny_unknown_fields` unless overridden.
///
/// # Example
///
/// ```rust,ignore
/// use vreg_derive::api_model;
///
/// #[api_model(rename_all = "snake_case", deny_unknown_fields = false)]
/// pub struct SubmitForm {
///     pub name: String,
///     pub car_number: String,
/// }
/// ```
#[proc_macro_attribute]
pub fn api_model(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::api::expand_api_model(attr.into(), input).into()
}

/// Attribute macro to bridge Axum handlers with `OpenAPI` documentation.
///
/// Accepts standard `utoipa::path` arguments (`get`, `post`, `path = "..."`,
/// `responses(...)`, `tag = "..."`) and registers them when the `server` feature is on.
///
/// # Example
///
/// ```rust,ignore
/// use vreg_derive::api_handler;
///
/// #[api_handler(
///     get,
///     path = "/health",
///     responses((status = OK, body = HealthResponse)),
///     tag = "System"
/// )]
/// pub async fn health_handler() -> impl IntoResponse {
///     // ...
/// }
/// ```
#[proc_macro_attribute]
pub fn api_handler(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::api::expand_api_handler(args.into(), input).into()
}

/// Attribute macro for defining domain-specific error enums.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]`.
/// * **Context Support**: Generates a companion `...Ext` trait that adds `.context()`
///   to any `Result` that can be converted into this error type.
/// * **Standard Conversions**: Implements `From<T>` for variants containing a `source` field,
///   enabling the use of the `?` operator for upstream errors.
/// * **Internal Fallback**: `From<&'static str>` and `From<String>` if an `Internal` variant exists.
/// * **Stable Kind**: `kind()` returns the `snake_case` variant name, suitable for wire payloads.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum** with named-field variants.
/// 2. Variants with a source must also carry `context: Option<Cow<'static, str>>`.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[vreg_derive::vreg_error]
/// pub enum ClientError {
///     #[error("Transport error{}: {source}", format_context(.context))]
///     Transport { source: reqwest::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// async fn fetch(client: &reqwest::Client) -> Result<String, ClientError> {
///     let body = client.get("https://example.com").send().await.context("GET example")?;
///     body.text().await.context("Reading body")
/// }
/// ```
#[proc_macro_attribute]
pub fn vreg_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

/// Attribute macro to define a feature slice handle.
///
/// 1. Renames the annotated struct to `<Name>Inner`.
/// 2. Generates an `Arc` wrapper named `<Name>` with `Deref` to the inner state.
/// 3. Implements `FeatureSlice` so the slice can be registered in the server state.
///
/// # Example
/// ```rust,ignore
/// #[vreg_derive::vreg_slice]
/// pub struct Registration {
///     pub sessions: SessionStore,
/// }
///
/// let slice = Registration::new(RegistrationInner { sessions });
/// ```
#[proc_macro_attribute]
pub fn vreg_slice(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(item as ItemStruct);
    macros::slice::expand_slice(input).into()
}
