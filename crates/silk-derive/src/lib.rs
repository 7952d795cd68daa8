//! Derive macros for silk
//!
//! Provides `#[derive(Transfer)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod common;
mod transfer;

/// Derive `Transfer` for a struct with named fields.
///
/// # Example
///
/// ```ignore
/// use silk::Transfer;
///
/// #[derive(Default, Transfer)]
/// struct Person {
///     name: String,
///     age: i32,
///     #[silk(rename = "is_admin")]
///     admin: bool,
///     #[silk(skip)]
///     cache: Vec<u8>,
/// }
/// ```
///
/// Each field is looked up by its name (or `rename`) and then by the lower camel case of
/// that name (`user_name` -> `userName`).
///
/// # Attributes
///
/// - `#[silk(rename = "key")]` - Look the field up under a different key
/// - `#[silk(skip)]` - Never assign the field
///
/// Fields whose type is not `String`, a primitive integer, a float or `bool` are skipped.
#[proc_macro_derive(Transfer, attributes(silk))]
pub fn derive_transfer(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    transfer::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
