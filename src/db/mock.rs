//! Mock database clients for testing.
//!
//! Provides in-memory sessions for tests and `--mock-db` runs.

use super::{ColumnInfo, DatabaseClient, QueryResult, Value};
use crate::error::{ReportError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// A mock database client that returns predefined results.
///
/// Statements registered with [`MockDatabaseClient::with_response`] return
/// their canned result. Any other `SELECT` yields a one-row placeholder and
/// every other statement yields an empty result.
#[derive(Default)]
pub struct MockDatabaseClient {
    responses: HashMap<String, QueryResult>,
    executed: Mutex<Vec<String>>,
    closed: AtomicBool,
}

impl MockDatabaseClient {
    /// Creates a new mock database client with no canned responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the result returned for `sql` (compared after trimming).
    pub fn with_response(mut self, sql: &str, result: QueryResult) -> Self {
        self.responses.insert(sql.trim().to_string(), result);
        self
    }

    /// Returns every statement executed so far, in order.
    pub fn executed(&self) -> Vec<String> {
        self.executed
            .lock()
            .map(|executed| executed.clone())
            .unwrap_or_default()
    }

    /// Returns true once `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        let sql = sql.trim();
        if let Ok(mut executed) = self.executed.lock() {
            executed.push(sql.to_string());
        }

        if let Some(result) = self.responses.get(sql) {
            return Ok(result.clone());
        }

        if sql.to_uppercase().starts_with("SELECT") {
            Ok(QueryResult::with_data(
                vec![ColumnInfo::new("result", "TEXT")],
                vec![vec![Value::from("mock")]],
            ))
        } else {
            Ok(QueryResult::new())
        }
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// A client whose every statement fails, for exercising error paths.
pub struct FailingDatabaseClient {
    message: String,
    closed: AtomicBool,
}

impl FailingDatabaseClient {
    /// Creates a client that fails every statement with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            closed: AtomicBool::new(false),
        }
    }

    /// Returns true once `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DatabaseClient for FailingDatabaseClient {
    async fn execute_query(&self, _sql: &str) -> Result<QueryResult> {
        Err(ReportError::query(self.message.clone()))
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
