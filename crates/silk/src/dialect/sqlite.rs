//! SQLite dialect: `?` markers, double-quote quoting.

use super::{Dialect, quote_with};
use crate::clause::{Statement, StatementKind};
use crate::error::{SilkError, SilkResult};
use std::borrow::Cow;

/// SQLite dialect.
#[derive(Debug, Clone)]
pub struct Sqlite {
    quote: bool,
}

impl Default for Sqlite {
    fn default() -> Self {
        Self { quote: true }
    }
}

impl Sqlite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle identifier quoting (on by default).
    pub fn with_quoting(mut self, quote: bool) -> Self {
        self.quote = quote;
        self
    }
}

impl Dialect for Sqlite {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn placeholder(&self, _index: usize) -> Cow<'static, str> {
        Cow::Borrowed("?")
    }

    fn quote_ident(&self, ident: &str) -> String {
        if self.quote {
            quote_with(ident, '"', '"')
        } else {
            ident.to_string()
        }
    }

    fn write_pagination(&self, out: &mut String, limit: Option<i64>, offset: Option<i64>) {
        // OFFSET is only valid after a LIMIT; -1 means unbounded.
        match (limit, offset) {
            (Some(limit), _) => out.push_str(&format!(" LIMIT {limit}")),
            (None, Some(_)) => out.push_str(" LIMIT -1"),
            (None, None) => {}
        }
        if let Some(offset) = offset {
            out.push_str(&format!(" OFFSET {offset}"));
        }
    }

    fn show_tables(&self) -> Statement {
        Statement {
            kind: StatementKind::Select,
            sql: "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name"
                .to_string(),
            args: Vec::new(),
        }
    }

    fn show_columns(&self, table: &str) -> SilkResult<Statement> {
        if table.trim().is_empty() {
            return Err(SilkError::invalid_statement("PRAGMA table_info requires a table name"));
        }
        Ok(Statement {
            kind: StatementKind::Select,
            sql: format!("PRAGMA table_info({})", quote_with(table, '"', '"')),
            args: Vec::new(),
        })
    }
}
