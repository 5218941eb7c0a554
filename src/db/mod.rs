//! Database abstraction layer.
//!
//! Provides a trait-based interface for the database session, so the report
//! pipeline can run against PostgreSQL or an in-memory client interchangeably.

mod mock;
mod postgres;
mod types;

pub use mock::{FailingDatabaseClient, MockDatabaseClient};
pub use postgres::PostgresClient;
pub use types::{ColumnInfo, QueryResult, Row, Value};

use crate::config::ConnectionConfig;
use crate::error::Result;
use async_trait::async_trait;

/// Opens a PostgreSQL session for the given configuration.
pub async fn connect(config: &ConnectionConfig) -> Result<Box<dyn DatabaseClient>> {
    let client = PostgresClient::connect(config).await?;
    Ok(Box::new(client))
}

/// Trait defining the interface for database clients.
///
/// All database operations are async and return Results with ReportError.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Executes a SQL statement and returns every resulting row.
    ///
    /// Statements without a result set return an empty result; a result set
    /// with zero rows still carries its column names.
    async fn execute_query(&self, sql: &str) -> Result<QueryResult>;

    /// Closes the database connection.
    async fn close(&self) -> Result<()>;
}
