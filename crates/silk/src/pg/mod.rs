//! PostgreSQL execution via `tokio-postgres`.
//!
//! Statements run through `GenericClient`, so a plain client, a transaction and (with the
//! `pool` feature) a deadpool pool or checked-out client all work as [`Executor`]s.
//! PostgreSQL has no last-insert-id, so [`ExecResult::last_insert_id`] is always `0`;
//! use `RETURNING id` through [`Executor::query`] when the id is needed.

mod row;
mod value;

#[cfg(feature = "pool")]
mod pool;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_with_config, create_pool_with_tls};

use crate::error::SilkResult;
use crate::executor::{ExecResult, Executor};
use crate::value::{Record, Value};
use tokio_postgres::GenericClient;
use tokio_postgres::types::ToSql;

fn params(args: &[Value]) -> Vec<&(dyn ToSql + Sync)> {
    args.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
}

async fn query_records<C>(client: &C, sql: &str, args: &[Value]) -> SilkResult<Vec<Record>>
where
    C: GenericClient + Sync,
{
    let params = params(args);
    let rows = client.query(sql, &params).await?;
    rows.iter().map(row::to_record).collect()
}

async fn exec_statement<C>(client: &C, sql: &str, args: &[Value]) -> SilkResult<ExecResult>
where
    C: GenericClient + Sync,
{
    let params = params(args);
    let rows_affected = client.execute(sql, &params).await?;
    Ok(ExecResult {
        rows_affected,
        last_insert_id: 0,
    })
}

impl Executor for tokio_postgres::Client {
    async fn query(&self, sql: &str, args: &[Value]) -> SilkResult<Vec<Record>> {
        query_records(self, sql, args).await
    }

    async fn exec(&self, sql: &str, args: &[Value]) -> SilkResult<ExecResult> {
        exec_statement(self, sql, args).await
    }
}

impl Executor for tokio_postgres::Transaction<'_> {
    async fn query(&self, sql: &str, args: &[Value]) -> SilkResult<Vec<Record>> {
        query_records(self, sql, args).await
    }

    async fn exec(&self, sql: &str, args: &[Value]) -> SilkResult<ExecResult> {
        exec_statement(self, sql, args).await
    }
}

/// Checks a connection out of the pool for each statement.
#[cfg(feature = "pool")]
impl Executor for deadpool_postgres::Pool {
    async fn query(&self, sql: &str, args: &[Value]) -> SilkResult<Vec<Record>> {
        let client = self.get().await?;
        query_records(&**client, sql, args).await
    }

    async fn exec(&self, sql: &str, args: &[Value]) -> SilkResult<ExecResult> {
        let client = self.get().await?;
        exec_statement(&**client, sql, args).await
    }
}

#[cfg(feature = "pool")]
impl Executor for deadpool_postgres::Client {
    async fn query(&self, sql: &str, args: &[Value]) -> SilkResult<Vec<Record>> {
        query_records(&***self, sql, args).await
    }

    async fn exec(&self, sql: &str, args: &[Value]) -> SilkResult<ExecResult> {
        exec_statement(&***self, sql, args).await
    }
}
