//! Convenient imports for typical `silk` usage.
//!
//! ```ignore
//! use silk::prelude::*;
//! ```

pub use crate::{
    Builder, BuilderPool, Db, DbConfig, Dialect, DialectKind, Executor, MySql, Postgres,
    Record, SilkError, SilkResult, Sqlite, Transfer, Value, Values, h,
};

#[cfg(feature = "pool")]
pub use crate::{create_pool, create_pool_with_config};
