#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Attribute macros shared by every OGS crate. They remove the boilerplate that each
//! feature slice would otherwise repeat: error enums with context support, the
//! `Arc`-wrapped slice handle, and the serde/`OpenAPI` glue for request and response
//! models.
//!
//! The examples are `ignore`d because a proc-macro crate cannot use its own macros.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Declares a slice error enum.
///
/// Every variant must use named fields. Variants that carry a `context` field must type
/// it as `Option<Cow<'static, str>>`; variants with a `source` field (or a field marked
/// `#[source]`/`#[from]`) must also carry `context`.
///
/// # Generated items
///
/// * `#[derive(Debug, thiserror::Error)]` unless already derived.
/// * `<Name>Ext` with `.context(..)` for `Result<T, Name>` and for `Result<T, Source>`
///   of every wrapped source type.
/// * `From<Source>` for each wrapped source type.
/// * `From<&'static str>` and `From<String>` when an `Internal` variant exists.
/// * A private `format_context` helper used inside `#[error(..)]` strings.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[ogs_derive::ogs_error]
/// pub enum RoomError {
///     #[error("Room not found{}: {message}", format_context(.context))]
///     NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
///
///     #[error("Database error{}: {source}", format_context(.context))]
///     Database { source: ogs_database::DatabaseError, context: Option<Cow<'static, str>> },
/// }
///
/// fn load(repo: &RoomRepository, id: &str) -> Result<Room, RoomError> {
///     repo.get(id).await.context("Loading room")?
///         .ok_or_else(|| RoomError::NotFound { message: id.to_owned().into(), context: None })
/// }
/// ```
#[proc_macro_attribute]
pub fn ogs_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand(input).into()
}

/// Turns a struct into a feature slice handle.
///
/// The annotated struct becomes `<Name>Inner`; `<Name>` wraps it in an `Arc`, derefs to
/// it, and implements `ogs_kernel::domain::registry::FeatureSlice` so it can be stored
/// in the server state.
///
/// ```rust,ignore
/// #[ogs_derive::ogs_slice]
/// pub struct Facilities {
///     pub rooms: RoomService,
/// }
///
/// let slice = Facilities::new(FacilitiesInner { rooms });
/// ```
#[proc_macro_attribute]
pub fn ogs_slice(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::slice::expand(input).into()
}

/// Declares a request or response model.
///
/// Adds `Debug`, `Serialize`, `Deserialize` and `utoipa::ToSchema` when missing, renames
/// fields to `camelCase` and rejects unknown fields.
///
/// # Arguments
///
/// * `rename_all = "snake_case"` overrides the rename policy.
/// * `deny_unknown_fields = false` accepts unknown fields.
///
/// ```rust,ignore
/// #[ogs_derive::api_model]
/// pub struct CreateRoomRequest {
///     pub name: String,
///     pub capacity: u32,
/// }
/// ```
#[proc_macro_attribute]
pub fn api_model(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::api::expand_model(args.into(), input).into()
}

/// Registers an axum handler with `utoipa`.
///
/// Arguments are forwarded verbatim to `#[utoipa::path(..)]`.
///
/// ```rust,ignore
/// #[ogs_derive::api_handler(
///     get,
///     path = "/api/rooms/{id}",
///     responses((status = OK, body = RoomResponse)),
///     tag = FACILITIES_TAG,
/// )]
/// pub(crate) async fn get_room(..) -> Result<Json<RoomResponse>, ApiError> { .. }
/// ```
#[proc_macro_attribute]
pub fn api_handler(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::api::expand_handler(args.into(), input).into()
}
