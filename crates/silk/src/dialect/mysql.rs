//! MySQL / MariaDB dialect: `?` markers, backtick quoting.

use super::{Dialect, quote_with};
use crate::clause::{Statement, StatementKind};
use crate::error::{SilkError, SilkResult};
use std::borrow::Cow;

/// MySQL dialect.
#[derive(Debug, Clone)]
pub struct MySql {
    quote: bool,
}

impl Default for MySql {
    fn default() -> Self {
        Self { quote: true }
    }
}

impl MySql {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle identifier quoting (on by default).
    pub fn with_quoting(mut self, quote: bool) -> Self {
        self.quote = quote;
        self
    }
}

impl Dialect for MySql {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn placeholder(&self, _index: usize) -> Cow<'static, str> {
        Cow::Borrowed("?")
    }

    fn quote_ident(&self, ident: &str) -> String {
        if self.quote {
            quote_with(ident, '`', '`')
        } else {
            ident.to_string()
        }
    }

    fn write_pagination(&self, out: &mut String, limit: Option<i64>, offset: Option<i64>) {
        // MySQL has no bare OFFSET; the documented idiom is the largest u64 as LIMIT.
        match (limit, offset) {
            (Some(limit), _) => out.push_str(&format!(" LIMIT {limit}")),
            (None, Some(_)) => out.push_str(" LIMIT 18446744073709551615"),
            (None, None) => {}
        }
        if let Some(offset) = offset {
            out.push_str(&format!(" OFFSET {offset}"));
        }
    }

    fn show_tables(&self) -> Statement {
        Statement {
            kind: StatementKind::Select,
            sql: "SHOW TABLES".to_string(),
            args: Vec::new(),
        }
    }

    fn show_columns(&self, table: &str) -> SilkResult<Statement> {
        if table.trim().is_empty() {
            return Err(SilkError::invalid_statement("SHOW COLUMNS requires a table name"));
        }
        Ok(Statement {
            kind: StatementKind::Select,
            sql: format!("SHOW COLUMNS FROM {}", self.quote_ident(table)),
            args: Vec::new(),
        })
    }
}
