//! Query execution with degrade-to-empty error handling.
//!
//! A failed statement never unwinds the caller: the error is written to a
//! diagnostics stream for the operator and an empty result is returned.

use std::io::Write;

use crate::db::{DatabaseClient, QueryResult};
use crate::error::Result;
use tracing::debug;

/// Runs statements against a borrowed database session.
pub struct QueryExecutor<'a> {
    db: &'a dyn DatabaseClient,
}

impl<'a> QueryExecutor<'a> {
    /// Creates a new query executor over `db`.
    pub fn new(db: &'a dyn DatabaseClient) -> Self {
        Self { db }
    }

    /// Executes `sql`, returning its columns and rows in database order.
    ///
    /// Any failure is reported on `diagnostics` and yields an empty result.
    pub async fn execute(&self, sql: &str, diagnostics: &mut dyn Write) -> QueryResult {
        match self.try_execute(sql).await {
            Ok(result) => result,
            Err(e) => {
                debug!(category = e.category(), "Query failed: {}", e);
                // A broken diagnostics stream must not turn into a failure either.
                let _ = writeln!(diagnostics, "Error executing query: {e}");
                QueryResult::new()
            }
        }
    }

    /// Executes `sql` once, propagating any failure.
    pub async fn try_execute(&self, sql: &str) -> Result<QueryResult> {
        debug!("Executing: {}", sql.trim());
        let result = self.db.execute_query(sql).await?;
        debug!(
            rows = result.row_count,
            elapsed_ms = result.execution_time.as_millis() as u64,
            "Query completed"
        );
        Ok(result)
    }
}
