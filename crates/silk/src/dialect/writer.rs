//! Shared compile routine used by every [`Dialect`].

use super::Dialect;
use crate::clause::{ClauseModel, Filter, Placeholder, RawFragment};
use crate::error::{SilkError, SilkResult};

/// Statement text under construction, with a running placeholder index.
pub struct SqlWriter<'a, D: Dialect + ?Sized> {
    dialect: &'a D,
    sql: String,
    next_index: usize,
}

impl<'a, D: Dialect + ?Sized> SqlWriter<'a, D> {
    pub fn new(dialect: &'a D) -> Self {
        Self {
            dialect,
            sql: String::with_capacity(128),
            next_index: 1,
        }
    }

    /// Number of markers written so far.
    pub fn placeholders(&self) -> usize {
        self.next_index - 1
    }

    pub fn finish(self) -> String {
        self.sql
    }

    pub fn push(&mut self, s: &str) -> &mut Self {
        self.sql.push_str(s);
        self
    }

    pub fn push_ident(&mut self, ident: &str) -> &mut Self {
        let quoted = self.dialect.quote_ident(ident);
        self.sql.push_str(&quoted);
        self
    }

    pub fn push_placeholder(&mut self) -> &mut Self {
        let marker = self.dialect.placeholder(self.next_index);
        self.sql.push_str(&marker);
        self.next_index += 1;
        self
    }

    fn push_shape(&mut self, shape: Placeholder) {
        match shape {
            Placeholder::Single => {
                self.push_placeholder();
            }
            Placeholder::List(n) => {
                self.sql.push('(');
                for i in 0..n {
                    if i > 0 {
                        self.sql.push(',');
                    }
                    self.push_placeholder();
                }
                self.sql.push(')');
            }
        }
    }

    /// Append a raw fragment, rewriting each `?` outside string literals into this
    /// dialect's marker. `??` is written as a literal `?` (PostgreSQL jsonb `?`, `?|`,
    /// `?&`). The marker count must equal the fragment's arg count.
    pub fn push_raw(&mut self, raw: &RawFragment) -> SilkResult<&mut Self> {
        let mut markers = 0usize;
        let mut in_literal = false;
        let mut chars = raw.expression.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\'' => {
                    in_literal = !in_literal;
                    self.sql.push(c);
                }
                '?' if !in_literal && chars.peek() == Some(&'?') => {
                    chars.next();
                    self.sql.push('?');
                }
                '?' if !in_literal => {
                    self.push_placeholder();
                    markers += 1;
                }
                _ => self.sql.push(c),
            }
        }

        if markers != raw.args.len() {
            return Err(SilkError::invalid_statement(format!(
                "raw fragment `{}` has {} placeholder(s) but {} arg(s)",
                raw.expression,
                markers,
                raw.args.len()
            )));
        }
        Ok(self)
    }

    fn push_filter(&mut self, filter: &Filter) {
        self.push_ident(&filter.field);
        self.sql.push(' ');
        self.sql.push_str(filter.operation.trim());
        self.sql.push(' ');
        self.push_shape(filter.placeholder);
    }

    fn push_where(&mut self, model: &ClauseModel) -> SilkResult<()> {
        if !model.has_where() {
            return Ok(());
        }

        self.sql.push_str(" WHERE ");
        let mut first = true;
        if let Some(raw) = &model.raw_filter {
            // Parenthesized so an OR inside the fragment cannot swallow the filters.
            let wrap = !model.filters.is_empty();
            if wrap {
                self.sql.push('(');
            }
            self.push_raw(raw)?;
            if wrap {
                self.sql.push(')');
            }
            first = false;
        }
        for filter in &model.filters {
            if !first {
                self.sql.push_str(" AND ");
            }
            self.push_filter(filter);
            first = false;
        }
        Ok(())
    }

    pub(super) fn select(&mut self, model: &ClauseModel) -> SilkResult<()> {
        self.sql.push_str("SELECT ");
        if model.fields.is_empty() {
            self.sql.push('*');
        } else {
            for (i, field) in model.fields.iter().enumerate() {
                if i > 0 {
                    self.sql.push_str(", ");
                }
                self.push_ident(field);
            }
        }

        self.sql.push_str(" FROM ");
        self.push_ident(&model.table);

        for join in &model.joins {
            self.sql.push_str(" LEFT JOIN ");
            self.push_ident(&join.table);
            self.sql.push_str(" ON ");
            self.push_ident(&join.left_field);
            self.sql.push(' ');
            self.sql.push_str(join.operation.trim());
            self.sql.push(' ');
            self.push_ident(&join.right_field);
        }

        self.push_where(model)?;

        if let Some(order) = &model.order {
            self.sql.push_str(" ORDER BY ");
            self.push_ident(&order.field);
            let direction = order.direction.trim();
            if !direction.is_empty() {
                self.sql.push(' ');
                self.sql.push_str(direction);
            }
        }

        self.dialect
            .write_pagination(&mut self.sql, model.limit, model.offset);
        Ok(())
    }

    /// Columns and markers come from one pass over the sorted `values` map.
    pub(super) fn insert(&mut self, model: &ClauseModel) {
        self.sql.push_str("INSERT INTO ");
        self.push_ident(&model.table);
        self.sql.push_str(" (");
        for (i, column) in model.values.keys().enumerate() {
            if i > 0 {
                self.sql.push_str(", ");
            }
            self.push_ident(column);
        }
        self.sql.push_str(") VALUES (");
        for i in 0..model.values.len() {
            if i > 0 {
                self.sql.push_str(", ");
            }
            self.push_placeholder();
        }
        self.sql.push(')');
    }

    pub(super) fn update(&mut self, model: &ClauseModel) -> SilkResult<()> {
        self.sql.push_str("UPDATE ");
        self.push_ident(&model.table);
        self.sql.push_str(" SET ");

        let mut first = true;
        for raw in &model.raw_updates {
            if !first {
                self.sql.push_str(", ");
            }
            self.push_raw(raw)?;
            first = false;
        }
        for column in model.values.keys() {
            if !first {
                self.sql.push_str(", ");
            }
            self.push_ident(column);
            self.sql.push_str(" = ");
            self.push_placeholder();
            first = false;
        }

        self.push_where(model)
    }

    pub(super) fn delete(&mut self, model: &ClauseModel) -> SilkResult<()> {
        self.sql.push_str("DELETE FROM ");
        self.push_ident(&model.table);
        self.push_where(model)
    }
}
