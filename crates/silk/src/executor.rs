//! The execution seam consumed by terminal builder operations.

use crate::error::SilkResult;
use crate::value::{Record, Value};

/// Outcome of a write statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecResult {
    pub rows_affected: u64,
    /// Identifier generated by the statement; `0` when the driver reports none.
    pub last_insert_id: i64,
}

/// Runs compiled statements.
///
/// Implementations own connections, timeouts and cancellation; the builder only hands
/// over statement text and the argument sequence aligned with its markers.
pub trait Executor: Send + Sync {
    /// Execute a statement and return every row as a [`Record`].
    fn query(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = SilkResult<Vec<Record>>> + Send;

    /// Execute a statement and report affected rows and the generated id.
    fn exec(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = SilkResult<ExecResult>> + Send;
}
