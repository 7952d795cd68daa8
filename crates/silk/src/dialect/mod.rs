//! Dialect compilers.
//!
//! A [`Dialect`] turns a [`ClauseModel`] into statement text. All dialects share one
//! compile routine ([`Dialect::compile`]) and differ only in their hooks:
//!
//! - placeholder markers (`?` vs `$1, $2, ...`)
//! - identifier quoting (`` `name` `` vs `"name"`)
//! - LIMIT/OFFSET syntax when only one of them is set
//! - schema introspection statements
//!
//! The compiler never sees argument values. It emits markers in the same order
//! [`ClauseModel::args`] lists them, which is what keeps text and values aligned for
//! every dialect.

mod mysql;
mod postgres;
mod sqlite;
mod writer;

#[cfg(test)]
mod tests;

pub use mysql::MySql;
pub use postgres::Postgres;
pub use sqlite::Sqlite;
pub use writer::SqlWriter;

use crate::clause::{ClauseModel, Statement, StatementKind};
use crate::error::SilkResult;
use serde::Deserialize;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// A target SQL grammar.
pub trait Dialect: fmt::Debug + Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// The marker for the `index`-th bound argument (1-based).
    fn placeholder(&self, index: usize) -> Cow<'static, str>;

    /// Quote a column/table reference.
    ///
    /// Plain (optionally dotted) identifiers are quoted segment by segment; anything
    /// else (`count(*)`, `*`, `lower(name)`) is returned verbatim.
    fn quote_ident(&self, ident: &str) -> String;

    /// Append LIMIT/OFFSET for a SELECT.
    fn write_pagination(&self, out: &mut String, limit: Option<i64>, offset: Option<i64>) {
        if let Some(limit) = limit {
            out.push_str(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = offset {
            out.push_str(&format!(" OFFSET {offset}"));
        }
    }

    /// Statement listing the tables of the current database.
    fn show_tables(&self) -> Statement;

    /// Statement listing the columns of `table`.
    fn show_columns(&self, table: &str) -> SilkResult<Statement>;

    /// Compile `model` as a `kind` statement.
    fn compile(&self, kind: StatementKind, model: &ClauseModel) -> SilkResult<String> {
        model.validate(kind)?;
        let mut writer = SqlWriter::new(self);
        match kind {
            StatementKind::Select => writer.select(model)?,
            StatementKind::Insert => writer.insert(model),
            StatementKind::Update => writer.update(model)?,
            StatementKind::Delete => writer.delete(model)?,
        }
        Ok(writer.finish())
    }

    /// Compile `model` and pair the text with its arguments.
    fn statement(&self, kind: StatementKind, model: &ClauseModel) -> SilkResult<Statement> {
        let sql = self.compile(kind, model)?;
        Ok(Statement {
            kind,
            sql,
            args: model.args(kind),
        })
    }
}

/// Built-in dialects, selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    #[serde(alias = "mariadb")]
    MySql,
    #[default]
    #[serde(alias = "postgresql", alias = "pg")]
    Postgres,
    Sqlite,
}

impl DialectKind {
    /// Instantiate the dialect with default settings.
    pub fn dialect(self) -> Arc<dyn Dialect> {
        match self {
            DialectKind::MySql => Arc::new(MySql::new()),
            DialectKind::Postgres => Arc::new(Postgres::new()),
            DialectKind::Sqlite => Arc::new(Sqlite::new()),
        }
    }
}

/// Whether `seg` matches `[A-Za-z_][A-Za-z0-9_$]*`.
pub(crate) fn is_plain_segment(seg: &str) -> bool {
    let mut chars = seg.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first == '_' || first.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c == '$' || c.is_ascii_alphanumeric())
}

/// Quote every segment of a dotted identifier with `open`/`close`, doubling `close`.
///
/// A trailing `*` segment (`users.*`) is kept bare. Returns `ident` untouched when it is
/// not a plain identifier.
pub(crate) fn quote_with(ident: &str, open: char, close: char) -> String {
    let segments: Vec<&str> = ident.split('.').collect();
    let last = segments.len() - 1;
    let plain = segments
        .iter()
        .enumerate()
        .all(|(i, seg)| is_plain_segment(seg) || (i == last && i > 0 && *seg == "*"));
    if !plain {
        return ident.to_string();
    }

    let mut out = String::with_capacity(ident.len() + segments.len() * 2);
    for (i, seg) in segments.iter().enumerate() {
        if i > 0 {
            out.push('.');
        }
        if *seg == "*" {
            out.push('*');
            continue;
        }
        out.push(open);
        for c in seg.chars() {
            if c == close {
                out.push(close);
            }
            out.push(c);
        }
        out.push(close);
    }
    out
}
