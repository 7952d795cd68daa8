//! The application-facing handle.

use crate::builder::Builder;
use crate::config::DbConfig;
use crate::dialect::Dialect;
use crate::executor::Executor;
use crate::log::SqlLog;
use crate::pool::BuilderPool;
use std::sync::Arc;

/// An executor, a dialect and a builder pool.
///
/// Cheap to clone; clones share the executor and the pool.
///
/// ```ignore
/// let client = /* tokio_postgres::Client */;
/// let db = Db::new(client, silk::Postgres::new());
/// let user = db.table("users").find(1).await?;
/// ```
pub struct Db<E> {
    conn: Arc<E>,
    dialect: Arc<dyn Dialect>,
    pool: BuilderPool,
    log: SqlLog,
}

impl<E> Clone for Db<E> {
    fn clone(&self) -> Self {
        Self {
            conn: Arc::clone(&self.conn),
            dialect: Arc::clone(&self.dialect),
            pool: self.pool.clone(),
            log: self.log,
        }
    }
}

impl<E> std::fmt::Debug for Db<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db")
            .field("dialect", &self.dialect.name())
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

impl<E: Executor> Db<E> {
    pub fn new(conn: E, dialect: impl Dialect + 'static) -> Self {
        Self::from_shared(Arc::new(conn), Arc::new(dialect))
    }

    /// Build from an already shared executor and dialect, with a fresh default pool.
    pub fn from_shared(conn: Arc<E>, dialect: Arc<dyn Dialect>) -> Self {
        Self {
            conn,
            dialect,
            pool: BuilderPool::new(),
            log: SqlLog::default(),
        }
    }

    pub fn from_config(conn: E, config: &DbConfig) -> Self {
        Self {
            conn: Arc::new(conn),
            dialect: config.dialect.dialect(),
            pool: config.pool(),
            log: config.sql_log(),
        }
    }

    /// Draw builders from `pool` instead of this handle's own.
    pub fn with_pool(mut self, pool: BuilderPool) -> Self {
        self.pool = pool;
        self
    }

    pub fn with_log(mut self, log: SqlLog) -> Self {
        self.log = log;
        self
    }

    /// A fresh builder with no table.
    pub fn builder(&self) -> Builder<E> {
        Builder::new(
            Arc::clone(&self.conn),
            Arc::clone(&self.dialect),
            self.pool.clone(),
            self.log,
        )
    }

    /// A fresh builder targeting `name`.
    pub fn table(&self, name: impl Into<String>) -> Builder<E> {
        self.builder().table(name)
    }

    pub fn pool(&self) -> &BuilderPool {
        &self.pool
    }

    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    pub fn executor(&self) -> &E {
        &self.conn
    }
}
