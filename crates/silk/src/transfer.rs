//! Record -> struct coercion.
//!
//! A [`Transfer`] type publishes a static table of the fields it can receive, discovered
//! once per type (normally by `#[derive(Transfer)]`). [`transfer`] walks that table,
//! looks each field up in the record and hands a coerced value to the setter.
//!
//! Lookup policy: the exact field name wins; the lower-camel-cased alias (`user_name` ->
//! `userName`, `Age` -> `age`) is the fallback. A record carrying both keys with
//! different values is ambiguous and rejected with [`SilkError::KeyMismatch`].

use crate::coerce;
use crate::error::{SilkError, SilkResult};
use crate::value::{Record, Value};

/// The closed set of field types a record can be coerced into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Int,
    Float,
    Bool,
}

/// One receivable field of a [`Transfer`] type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    /// Key looked up first.
    pub name: &'static str,
    /// Fallback key (lower camel case of the field name).
    pub alias: &'static str,
    pub kind: FieldKind,
}

/// A coerced value on its way into a field.
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Coerced {
    fn from_value(kind: FieldKind, value: &Value) -> Self {
        match kind {
            FieldKind::Text => Coerced::Text(coerce::to_string(value)),
            FieldKind::Int => Coerced::Int(coerce::to_int(value)),
            FieldKind::Float => Coerced::Float(coerce::to_float(value)),
            FieldKind::Bool => Coerced::Bool(coerce::to_bool(value)),
        }
    }
}

/// A struct that can receive a [`Record`].
///
/// Usually derived:
///
/// ```ignore
/// #[derive(Default, silk::Transfer)]
/// struct Person {
///     name: String,
///     age: i32,
///     #[silk(rename = "is_admin")]
///     admin: bool,
///     #[silk(skip)]
///     cache: Vec<u8>,
/// }
/// ```
pub trait Transfer {
    /// Receivable fields; `set_field` is called with indices into this table.
    const FIELDS: &'static [FieldDef];

    /// Store `value` into the field at `index`.
    ///
    /// Must fail with [`SilkError::InvalidTarget`] when `index`/`value` do not describe
    /// one of [`Transfer::FIELDS`].
    fn set_field(&mut self, index: usize, value: Coerced) -> SilkResult<()>;
}

/// Copy `record` into `target`, coercing each value to its field's kind.
///
/// Fields without a matching key keep their current value.
pub fn transfer<T: Transfer>(record: &Record, target: &mut T) -> SilkResult<()> {
    for (index, field) in T::FIELDS.iter().enumerate() {
        let exact = record.get(field.name);
        let fallback = if field.alias != field.name {
            record.get(field.alias)
        } else {
            None
        };

        let source = match (exact, fallback) {
            (Some(a), Some(b)) if a != b => {
                return Err(SilkError::key_mismatch(
                    field.name,
                    format!(
                        "record has both '{}' ({}) and '{}' ({})",
                        field.name, a, field.alias, b
                    ),
                ));
            }
            (Some(value), _) | (None, Some(value)) => value,
            (None, None) => continue,
        };

        target.set_field(index, Coerced::from_value(field.kind, source))?;
    }
    Ok(())
}
