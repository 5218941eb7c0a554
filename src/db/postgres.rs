//! PostgreSQL database client implementation.
//!
//! Provides the `PostgresClient` struct that implements the `DatabaseClient` trait
//! for PostgreSQL databases using sqlx.

use crate::config::ConnectionConfig;
use crate::db::{ColumnInfo, DatabaseClient, QueryResult, Row, Value};
use crate::error::{ReportError, Result};
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgRow, PgTypeKind};
use sqlx::types::chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sqlx::types::{BigDecimal, JsonValue, Uuid};
use sqlx::{Column as _, Executor as _, Row as _, Statement as _, TypeInfo as _, ValueRef as _};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Maximum number of connection attempts.
const MAX_CONNECT_ATTEMPTS: u32 = 3;

/// Base delay between connection attempts (doubles each retry).
const RETRY_BASE_DELAY_MS: u64 = 500;

/// PostgreSQL database client.
///
/// The pool is capped at a single connection: the program works with one
/// session at a time.
#[derive(Debug)]
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Creates a new PostgresClient from an existing connection pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a session, retrying transient failures with exponential backoff.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let options = connect_options(config)?;
        let mut delay = Duration::from_millis(RETRY_BASE_DELAY_MS);
        let mut attempt = 1;

        loop {
            debug!(attempt, "Connecting to {}", config.display_string());

            let result = PgPoolOptions::new()
                .max_connections(1)
                .acquire_timeout(Duration::from_secs(10))
                .connect_with(options.clone())
                .await;

            match result {
                Ok(pool) => {
                    debug!("Connection established");
                    return Ok(Self { pool });
                }
                Err(e) if attempt < MAX_CONNECT_ATTEMPTS && is_transient_error(&e) => {
                    warn!(
                        "Connection attempt {} failed ({}), retrying in {:?}",
                        attempt, e, delay
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                    attempt += 1;
                }
                Err(e) => return Err(map_connection_error(e, config)),
            }
        }
    }

    /// Describes the result columns of a statement without running it.
    async fn describe_columns(&self, sql: &str) -> Result<Vec<ColumnInfo>> {
        let statement = (&self.pool)
            .prepare(sql)
            .await
            .map_err(|e| ReportError::query(format_query_error(e)))?;

        Ok(statement
            .columns()
            .iter()
            .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
            .collect())
    }
}

#[async_trait]
impl DatabaseClient for PostgresClient {
    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        let start = Instant::now();

        let pg_rows = sqlx::query(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ReportError::query(format_query_error(e)))?;

        let execution_time = start.elapsed();

        let columns = match pg_rows.first() {
            Some(first) => first
                .columns()
                .iter()
                .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
                .collect(),
            // No rows: either an empty result set or a statement without one.
            None => self.describe_columns(sql).await.unwrap_or_else(|e| {
                debug!("Could not describe columns: {}", e);
                Vec::new()
            }),
        };

        let rows: Vec<Row> = pg_rows.iter().map(convert_row).collect();

        Ok(QueryResult::with_data(columns, rows).with_execution_time(execution_time))
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }
}

/// Builds typed connect options, so credentials never pass through a URL.
fn connect_options(config: &ConnectionConfig) -> Result<PgConnectOptions> {
    let database = config
        .database
        .as_deref()
        .ok_or_else(|| ReportError::config("Database name is required"))?;

    let mut options = PgConnectOptions::new()
        .host(config.host.as_deref().unwrap_or("localhost"))
        .port(config.port)
        .database(database);
    if let Some(user) = &config.user {
        options = options.username(user);
    }
    if let Some(password) = &config.password {
        options = options.password(password);
    }
    Ok(options)
}

/// Converts a sqlx PgRow to our Row type.
fn convert_row(row: &PgRow) -> Row {
    (0..row.columns().len())
        .map(|i| convert_value(row, i))
        .collect()
}

/// Converts a single column value from a PgRow to our Value type.
fn convert_value(row: &PgRow, index: usize) -> Value {
    let (type_name, is_enum) = match row.try_get_raw(index) {
        Ok(raw) if raw.is_null() => return Value::Null,
        Ok(raw) => {
            let info = raw.type_info();
            let is_enum = matches!(info.kind(), PgTypeKind::Enum(_));
            (info.name().to_uppercase(), is_enum)
        }
        Err(_) => return Value::Null,
    };

    // Enum labels travel as text but fail the String compatibility check.
    if is_enum {
        return row
            .try_get_unchecked::<String, _>(index)
            .map(Value::String)
            .unwrap_or_else(|e| {
                debug!("Cannot decode enum column {}: {}", index, e);
                Value::String(format!("<{}>", type_name.to_lowercase()))
            });
    }

    let decoded = match type_name.as_str() {
        "BOOL" => row.try_get::<bool, _>(index).map(Value::Bool),
        "INT2" => row.try_get::<i16, _>(index).map(|v| Value::Int(v.into())),
        "INT4" => row.try_get::<i32, _>(index).map(|v| Value::Int(v.into())),
        "INT8" => row.try_get::<i64, _>(index).map(Value::Int),
        "FLOAT4" => row.try_get::<f32, _>(index).map(real),
        "FLOAT8" => row.try_get::<f64, _>(index).map(Value::Float),
        "NUMERIC" => row.try_get::<BigDecimal, _>(index).map(text),
        "DATE" => row.try_get::<NaiveDate, _>(index).map(text),
        "TIME" => row.try_get::<NaiveTime, _>(index).map(text),
        "TIMESTAMP" => row.try_get::<NaiveDateTime, _>(index).map(text),
        "TIMESTAMPTZ" => row.try_get::<DateTime<Utc>, _>(index).map(text),
        "UUID" => row.try_get::<Uuid, _>(index).map(text),
        "JSON" | "JSONB" => row.try_get::<JsonValue, _>(index).map(text),
        "BYTEA" => row.try_get::<Vec<u8>, _>(index).map(Value::Bytes),
        _ => row.try_get::<String, _>(index).map(Value::String),
    };

    decoded.unwrap_or_else(|e| {
        debug!("Cannot decode {} column {}: {}", type_name, index, e);
        Value::String(format!("<{}>", type_name.to_lowercase()))
    })
}

fn text(v: impl ToString) -> Value {
    Value::String(v.to_string())
}

/// `real` in its own shortest form, not widened to f64.
fn real(v: f32) -> Value {
    text(v)
}

/// Determines if a connection error is transient and worth retrying.
fn is_transient_error(error: &sqlx::Error) -> bool {
    if matches!(error, sqlx::Error::PoolTimedOut | sqlx::Error::Io(_)) {
        return true;
    }

    let msg = error.to_string().to_lowercase();
    ["connection refused", "timed out", "temporarily unavailable", "connection reset"]
        .iter()
        .any(|needle| msg.contains(needle))
}

/// Maps sqlx connection errors to operator-facing messages.
fn map_connection_error(error: sqlx::Error, config: &ConnectionConfig) -> ReportError {
    let host = config.host.as_deref().unwrap_or("localhost");
    let port = config.port;
    let msg = error.to_string().to_lowercase();

    if msg.contains("connection refused") || msg.contains("could not connect") {
        ReportError::connection(format!(
            "Cannot connect to {host}:{port}. Check that the server is running."
        ))
    } else if msg.contains("password authentication failed") {
        ReportError::connection(format!(
            "Authentication failed for user '{}'. Check your credentials.",
            config.user.as_deref().unwrap_or("unknown")
        ))
    } else if msg.contains("does not exist") && msg.contains("database") {
        ReportError::connection(format!(
            "Database '{}' does not exist.",
            config.database.as_deref().unwrap_or("unknown")
        ))
    } else if msg.contains("timed out") {
        ReportError::connection(format!("Connection to {host}:{port} timed out."))
    } else {
        ReportError::connection(error.to_string())
    }
}

/// Formats a query error, appending PostgreSQL detail and hint lines.
fn format_query_error(error: sqlx::Error) -> String {
    let Some(db_error) = error.as_database_error() else {
        return error.to_string();
    };

    let mut message = format!("ERROR: {}", db_error.message());

    if let Some(pg_error) = db_error.try_downcast_ref::<sqlx::postgres::PgDatabaseError>() {
        if let Some(detail) = pg_error.detail() {
            message.push_str("\n  DETAIL: ");
            message.push_str(detail);
        }
        if let Some(hint) = pg_error.hint() {
            message.push_str("\n  HINT: ");
            message.push_str(hint);
        }
    }

    message
}
