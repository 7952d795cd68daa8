//! The fluent query builder.
//!
//! A [`Builder`] is drawn from a [`BuilderPool`] by [`Db`](crate::Db), accumulates clauses
//! through chained calls that take and return it by value, and is consumed by exactly one
//! terminal operation. Its frame goes back to the pool when the builder is dropped, which
//! happens once on every path out of a terminal operation (success, error, or a dropped
//! future).
//!
//! ```ignore
//! let rows = db
//!     .table("users")
//!     .where_("age", ">", 18)
//!     .where_in("role", ["admin", "editor"])
//!     .order_by("id", "desc")
//!     .take(10)
//!     .all()
//!     .await?;
//! ```

#[cfg(test)]
mod tests;

use crate::clause::{
    ClauseModel, Filter, Join, Order, Placeholder, RawFragment, Statement, StatementKind,
};
use crate::coerce;
use crate::dialect::Dialect;
use crate::error::{SilkError, SilkResult};
use crate::executor::{ExecResult, Executor};
use crate::log::SqlLog;
use crate::pool::{BuilderPool, Frame};
use crate::transfer::{Transfer, transfer};
use crate::value::{Record, Value, Values};
use std::sync::Arc;

const COUNT_FIELD: &str = "count(*)";

/// Chainable, single-owner statement builder.
#[must_use = "a builder does nothing until a terminal operation is awaited"]
pub struct Builder<E> {
    frame: Frame,
    conn: Arc<E>,
    dialect: Arc<dyn Dialect>,
    pool: BuilderPool,
    log: SqlLog,
}

impl<E> std::fmt::Debug for Builder<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builder")
            .field("dialect", &self.dialect.name())
            .field("model", &self.frame.model)
            .field("statement", &self.frame.statement)
            .finish()
    }
}

impl<E> Drop for Builder<E> {
    fn drop(&mut self) {
        let frame = std::mem::take(&mut self.frame);
        self.pool.release(frame);
    }
}

impl<E: Executor> Builder<E> {
    pub(crate) fn new(
        conn: Arc<E>,
        dialect: Arc<dyn Dialect>,
        pool: BuilderPool,
        log: SqlLog,
    ) -> Self {
        let frame = pool.acquire();
        Self {
            frame,
            conn,
            dialect,
            pool,
            log,
        }
    }

    // ==================== Accumulators ====================

    /// Set the target table.
    pub fn table(mut self, name: impl Into<String>) -> Self {
        self.frame.model.table = name.into();
        self
    }

    /// Replace the projected columns; no columns means `*`.
    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.frame.model.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// `ORDER BY field direction`. The direction is not interpreted.
    pub fn order_by(mut self, field: impl Into<String>, direction: impl Into<String>) -> Self {
        self.frame.model.order = Some(Order {
            field: field.into(),
            direction: direction.into(),
        });
        self
    }

    /// `OFFSET n`.
    pub fn skip(mut self, offset: i64) -> Self {
        self.frame.model.offset = Some(offset);
        self
    }

    /// `LIMIT n`.
    pub fn take(mut self, limit: i64) -> Self {
        self.frame.model.limit = Some(limit);
        self
    }

    /// Add `field operation ?`.
    pub fn where_(
        mut self,
        field: impl Into<String>,
        operation: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.frame.model.filters.push(Filter {
            field: field.into(),
            operation: operation.into(),
            placeholder: Placeholder::Single,
            args: vec![value.into()],
        });
        self
    }

    /// Add `field in (?,?,...)`. Does nothing when `values` is empty.
    pub fn where_in<I, V>(self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.push_list(field.into(), "in", values)
    }

    /// Add `field not in (?,?,...)`. Does nothing when `values` is empty.
    pub fn where_not_in<I, V>(self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.push_list(field.into(), "not in", values)
    }

    fn push_list<I, V>(mut self, field: String, operation: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let args: Vec<Value> = values.into_iter().map(Into::into).collect();
        if args.is_empty() {
            return self;
        }
        self.frame.model.filters.push(Filter {
            field,
            operation: operation.to_string(),
            placeholder: Placeholder::List(args.len()),
            args,
        });
        self
    }

    /// Set the raw WHERE fragment, replacing any earlier one together with its args.
    ///
    /// `?` marks a bound argument and is rewritten into the dialect's marker. Write `??`
    /// for a literal `?`, e.g. the jsonb operator in `data ?? 'admin'`.
    pub fn where_raw(
        mut self,
        expression: impl Into<String>,
        args: impl IntoIterator<Item = Value>,
    ) -> Self {
        self.frame.model.raw_filter = Some(RawFragment {
            expression: expression.into(),
            args: args.into_iter().collect(),
        });
        self
    }

    /// Append a raw `SET` fragment such as `hits = hits + ?`. As in
    /// [`where_raw`](Self::where_raw), `??` is a literal `?`.
    pub fn update_raw(
        mut self,
        expression: impl Into<String>,
        args: impl IntoIterator<Item = Value>,
    ) -> Self {
        self.frame.model.raw_updates.push(RawFragment {
            expression: expression.into(),
            args: args.into_iter().collect(),
        });
        self
    }

    /// Add `LEFT JOIN table ON left_field operation right_field`.
    pub fn left_join(
        mut self,
        table: impl Into<String>,
        left_field: impl Into<String>,
        operation: impl Into<String>,
        right_field: impl Into<String>,
    ) -> Self {
        self.frame.model.joins.push(Join {
            table: table.into(),
            operation: operation.into(),
            left_field: left_field.into(),
            right_field: right_field.into(),
        });
        self
    }

    // ==================== Inspection ====================

    /// The clauses accumulated so far.
    pub fn model(&self) -> &ClauseModel {
        &self.frame.model
    }

    /// Text of the most recent compile, empty before the first one.
    pub fn statement(&self) -> &str {
        &self.frame.statement
    }

    /// Compile without executing.
    pub fn to_statement(&self, kind: StatementKind) -> SilkResult<Statement> {
        self.dialect.statement(kind, &self.frame.model)
    }

    // ==================== Terminal reads ====================

    /// Fetch the first row; fails with [`SilkError::EmptyResult`] when there is none.
    pub async fn first(mut self) -> SilkResult<Record> {
        let rows = self.fetch(StatementKind::Select).await?;
        rows.into_iter().next().ok_or_else(|| {
            SilkError::empty_result(format!("no rows from `{}`", self.frame.statement))
        })
    }

    /// Fetch every row.
    pub async fn all(mut self) -> SilkResult<Vec<Record>> {
        self.fetch(StatementKind::Select).await
    }

    /// `where_("id", "=", id).first()`.
    pub async fn find(self, id: impl Into<Value>) -> SilkResult<Record> {
        self.where_("id", "=", id).first().await
    }

    /// `SELECT count(*)` over the current filters and joins.
    ///
    /// Ordering and pagination are dropped for the aggregate. No row counts as zero.
    pub async fn count(mut self) -> SilkResult<i64> {
        let model = &mut self.frame.model;
        model.fields = vec![COUNT_FIELD.to_string()];
        model.order = None;
        model.limit = None;
        model.offset = None;

        let rows = self.fetch(StatementKind::Select).await?;
        let Some(row) = rows.into_iter().next() else {
            return Ok(0);
        };
        Ok(aggregate_value(&row).map(coerce::to_int).unwrap_or(0))
    }

    /// `first()` coerced into `target`.
    pub async fn form_first<T: Transfer>(self, target: &mut T) -> SilkResult<()> {
        let record = self.first().await?;
        transfer(&record, target)
    }

    /// `first()` coerced into a fresh `T`.
    pub async fn first_as<T: Transfer + Default>(self) -> SilkResult<T> {
        let mut target = T::default();
        self.form_first(&mut target).await?;
        Ok(target)
    }

    /// `all()` with every row coerced into a fresh `T`.
    pub async fn all_as<T: Transfer + Default>(self) -> SilkResult<Vec<T>> {
        let rows = self.all().await?;
        rows.iter()
            .map(|record| {
                let mut target = T::default();
                transfer(record, &mut target)?;
                Ok(target)
            })
            .collect()
    }

    /// Columns of the builder's table, as reported by the dialect's introspection query.
    pub async fn show_columns(mut self) -> SilkResult<Vec<Record>> {
        let stmt = self.dialect.show_columns(&self.frame.model.table)?;
        self.query(stmt).await
    }

    /// Tables of the current database.
    pub async fn show_tables(mut self) -> SilkResult<Vec<Record>> {
        let stmt = self.dialect.show_tables();
        self.query(stmt).await
    }

    // ==================== Terminal writes ====================

    /// `INSERT` `values`; returns the generated id.
    pub async fn insert(mut self, values: Values) -> SilkResult<i64> {
        self.frame.model.values = values;
        let result = self.execute(StatementKind::Insert).await?;
        Ok(result.last_insert_id)
    }

    /// `UPDATE ... SET values` over the current filters; returns the generated id.
    pub async fn update(mut self, values: Values) -> SilkResult<i64> {
        self.frame.model.values = values;
        let result = self.execute(StatementKind::Update).await?;
        Ok(result.last_insert_id)
    }

    /// `UPDATE` whose `SET` clause is made of [`update_raw`](Self::update_raw) fragments.
    pub async fn exec(mut self) -> SilkResult<i64> {
        let result = self.execute(StatementKind::Update).await?;
        Ok(result.last_insert_id)
    }

    /// `DELETE` over the current filters; returns the number of deleted rows.
    pub async fn delete(mut self) -> SilkResult<u64> {
        let result = self.execute(StatementKind::Delete).await?;
        Ok(result.rows_affected)
    }

    // ==================== Plumbing ====================

    fn compile(&mut self, kind: StatementKind) -> SilkResult<Statement> {
        let stmt = self.dialect.statement(kind, &self.frame.model)?;
        self.frame.statement.clone_from(&stmt.sql);
        Ok(stmt)
    }

    async fn fetch(&mut self, kind: StatementKind) -> SilkResult<Vec<Record>> {
        let stmt = self.compile(kind)?;
        self.query(stmt).await
    }

    async fn query(&mut self, stmt: Statement) -> SilkResult<Vec<Record>> {
        self.frame.statement.clone_from(&stmt.sql);
        self.emit(&stmt);
        self.conn.query(&stmt.sql, &stmt.args).await
    }

    async fn execute(&mut self, kind: StatementKind) -> SilkResult<ExecResult> {
        let stmt = self.compile(kind)?;
        self.emit(&stmt);
        let result = self.conn.exec(&stmt.sql, &stmt.args).await?;
        if result.rows_affected < 1 {
            return Err(SilkError::no_affected_rows(format!(
                "{} on `{}` changed no rows",
                kind.as_str(),
                self.frame.model.table
            )));
        }
        Ok(result)
    }

    fn emit(&self, stmt: &Statement) {
        self.log.emit(
            self.dialect.name(),
            stmt.kind,
            &self.frame.model.table,
            &stmt.sql,
            stmt.args.len(),
        );
    }
}

/// The aggregate column of a `count(*)` row, whatever the driver named it.
fn aggregate_value(row: &Record) -> Option<&Value> {
    row.get(COUNT_FIELD)
        .or_else(|| row.get("count"))
        .or_else(|| match row.len() {
            1 => row.values().next(),
            _ => None,
        })
}
