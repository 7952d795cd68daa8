//! PostgreSQL dialect: `$n` markers, double-quote quoting.

use super::{Dialect, quote_with};
use crate::clause::{Statement, StatementKind};
use crate::error::{SilkError, SilkResult};
use crate::value::Value;
use std::borrow::Cow;

/// Pre-rendered markers for the common case; larger indices are formatted on demand.
const MARKERS: [&str; 17] = [
    "$0", "$1", "$2", "$3", "$4", "$5", "$6", "$7", "$8", "$9", "$10", "$11", "$12", "$13",
    "$14", "$15", "$16",
];

/// PostgreSQL dialect.
#[derive(Debug, Clone)]
pub struct Postgres {
    quote: bool,
}

impl Default for Postgres {
    fn default() -> Self {
        Self { quote: true }
    }
}

impl Postgres {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle identifier quoting (on by default).
    pub fn with_quoting(mut self, quote: bool) -> Self {
        self.quote = quote;
        self
    }
}

impl Dialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn placeholder(&self, index: usize) -> Cow<'static, str> {
        match MARKERS.get(index) {
            Some(marker) if index > 0 => Cow::Borrowed(*marker),
            _ => Cow::Owned(format!("${index}")),
        }
    }

    fn quote_ident(&self, ident: &str) -> String {
        if self.quote {
            quote_with(ident, '"', '"')
        } else {
            ident.to_string()
        }
    }

    fn show_tables(&self) -> Statement {
        Statement {
            kind: StatementKind::Select,
            sql: "SELECT table_name::text AS table_name FROM information_schema.tables \
                  WHERE table_schema = current_schema() ORDER BY table_name"
                .to_string(),
            args: Vec::new(),
        }
    }

    fn show_columns(&self, table: &str) -> SilkResult<Statement> {
        if table.trim().is_empty() {
            return Err(SilkError::invalid_statement("column listing requires a table name"));
        }
        Ok(Statement {
            kind: StatementKind::Select,
            sql: "SELECT column_name::text AS column_name, data_type::text AS data_type, \
                  is_nullable::text AS is_nullable, column_default::text AS column_default \
                  FROM information_schema.columns \
                  WHERE table_schema = current_schema() AND table_name = $1 \
                  ORDER BY ordinal_position"
                .to_string(),
            args: vec![Value::from(table)],
        })
    }
}
