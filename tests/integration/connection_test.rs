//! Connection integration tests.
//!
//! Tests database connectivity and error handling.

use sales_reports::config::ConnectionConfig;
use sales_reports::db::{self, DatabaseClient, PostgresClient};
use sales_reports::error::ReportError;

#[tokio::test]
async fn test_connect_with_valid_credentials() {
    let Some(url) = std::env::var("DATABASE_URL").ok() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let config = ConnectionConfig::from_connection_string(&url).unwrap();
    let client = db::connect(&config).await.unwrap();

    let result = client.execute_query("SELECT current_database()").await.unwrap();
    assert_eq!(result.row_count, 1);

    client.close().await.unwrap();
}

#[tokio::test(flavor = "current_thread")]
async fn test_connect_with_closed_port_is_connection_error() {
    let config = ConnectionConfig {
        host: Some("127.0.0.1".to_string()),
        port: 59999, // Unlikely to be in use
        database: Some("sistema_vendas".to_string()),
        user: Some("report".to_string()),
        password: Some("secret".to_string()),
    };

    let result = PostgresClient::connect(&config).await;
    assert!(matches!(result, Err(ReportError::Connection(_))));
}

#[tokio::test]
async fn test_connect_without_database_is_config_error() {
    let config = ConnectionConfig {
        host: Some("localhost".to_string()),
        ..Default::default()
    };

    let result = PostgresClient::connect(&config).await;
    assert!(matches!(result, Err(ReportError::Config(_))));
}

#[test]
fn test_connection_roundtrip() {
    let config = ConnectionConfig {
        host: Some("localhost".to_string()),
        port: 5432,
        database: Some("sistema_vendas".to_string()),
        user: Some("report".to_string()),
        password: Some("secret".to_string()),
    };

    let conn_str = config.to_connection_string().unwrap();
    let parsed = ConnectionConfig::from_connection_string(&conn_str).unwrap();

    assert_eq!(config, parsed);
}
