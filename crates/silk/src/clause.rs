//! The clause model: accumulated, not-yet-compiled query intent.
//!
//! Every clause carries its own bound values. [`ClauseModel::args`] flattens them in
//! exactly the order a [`Dialect`](crate::Dialect) emits placeholders:
//!
//! 1. raw UPDATE fragments, in declaration order (UPDATE only)
//! 2. `values` assignments, sorted by column (INSERT and UPDATE)
//! 3. the raw WHERE fragment (not INSERT)
//! 4. structured filters, in declaration order (not INSERT)

use crate::error::{SilkError, SilkResult};
use crate::value::{Value, Values};

/// The four statement kinds the compiler understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

impl StatementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementKind::Select => "SELECT",
            StatementKind::Insert => "INSERT",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
        }
    }

    fn renders_assignments(&self) -> bool {
        matches!(self, StatementKind::Insert | StatementKind::Update)
    }

    fn renders_where(&self) -> bool {
        !matches!(self, StatementKind::Insert)
    }
}

/// Shape of the placeholder run a filter compiles to.
///
/// Stored abstractly so the model never holds one dialect's marker syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// One marker: `?` / `$1`
    Single,
    /// A parenthesized list of `n` markers: `(?,?)` / `($1,$2)`
    List(usize),
}

impl Placeholder {
    /// Number of markers this shape expands to.
    pub fn len(&self) -> usize {
        match self {
            Placeholder::Single => 1,
            Placeholder::List(n) => *n,
        }
    }
}

/// One structured WHERE predicate: `<field> <operation> <placeholder>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub operation: String,
    pub placeholder: Placeholder,
    pub args: Vec<Value>,
}

/// One `LEFT JOIN <table> ON <left_field> <operation> <right_field>` condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    pub table: String,
    pub operation: String,
    pub left_field: String,
    pub right_field: String,
}

/// A literal SQL fragment with the values bound to its own markers.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFragment {
    pub expression: String,
    pub args: Vec<Value>,
}

/// `ORDER BY <field> <direction>`; the direction is passed through as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub field: String,
    pub direction: String,
}

/// Everything one in-flight statement has accumulated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClauseModel {
    pub table: String,
    /// Projected columns; empty means `*`.
    pub fields: Vec<String>,
    pub filters: Vec<Filter>,
    pub joins: Vec<Join>,
    /// Single raw WHERE fragment; replaced, not accumulated.
    pub raw_filter: Option<RawFragment>,
    pub raw_updates: Vec<RawFragment>,
    pub values: Values,
    pub order: Option<Order>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl ClauseModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every field with a fresh empty value.
    ///
    /// Containers are swapped for new ones rather than cleared so no capacity (or
    /// anything reachable through it) survives into the next use.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// True when nothing has been accumulated.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether the WHERE clause has anything to render.
    pub fn has_where(&self) -> bool {
        self.raw_filter.is_some() || !self.filters.is_empty()
    }

    /// The flat argument sequence for `kind`, in placeholder order.
    pub fn args(&self, kind: StatementKind) -> Vec<Value> {
        let mut args = Vec::with_capacity(self.placeholder_count(kind));

        if kind.renders_assignments() {
            if kind == StatementKind::Update {
                for raw in &self.raw_updates {
                    args.extend(raw.args.iter().cloned());
                }
            }
            args.extend(self.values.values().cloned());
        }

        if kind.renders_where() {
            if let Some(raw) = &self.raw_filter {
                args.extend(raw.args.iter().cloned());
            }
            for filter in &self.filters {
                args.extend(filter.args.iter().cloned());
            }
        }

        args
    }

    /// Number of placeholder markers a compiler emits for `kind`.
    ///
    /// Raw fragments count as many markers as they carry args; their text is never parsed.
    pub fn placeholder_count(&self, kind: StatementKind) -> usize {
        let mut count = 0;
        if kind.renders_assignments() {
            count += self.values.len();
            if kind == StatementKind::Update {
                count += self.raw_updates.iter().map(|r| r.args.len()).sum::<usize>();
            }
        }
        if kind.renders_where() {
            count += self.raw_filter.as_ref().map_or(0, |r| r.args.len());
            count += self.filters.iter().map(|f| f.placeholder.len()).sum::<usize>();
        }
        count
    }

    /// Reject models that would compile into nonsensical text.
    pub fn validate(&self, kind: StatementKind) -> SilkResult<()> {
        if self.table.trim().is_empty() {
            return Err(SilkError::invalid_statement(format!(
                "{} requires a table name",
                kind.as_str()
            )));
        }

        match kind {
            StatementKind::Insert if self.values.is_empty() => Err(SilkError::invalid_statement(
                format!("INSERT INTO {} has no values", self.table),
            )),
            StatementKind::Update if self.values.is_empty() && self.raw_updates.is_empty() => {
                Err(SilkError::invalid_statement(format!(
                    "UPDATE {} has no assignments",
                    self.table
                )))
            }
            _ => Ok(()),
        }
    }
}

/// Compiled statement text and the arguments bound to its markers.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    pub sql: String,
    pub args: Vec<Value>,
}
