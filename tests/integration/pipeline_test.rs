//! Executor, renderer and runner wired together over in-memory sessions.

use std::io::Cursor;

use pretty_assertions::assert_eq;
use sales_reports::app::{self, Mode, Streams};
use sales_reports::db::{ColumnInfo, FailingDatabaseClient, MockDatabaseClient, QueryResult, Value};
use sales_reports::query::ReportRunner;
use sales_reports::render::NO_ROWS_MESSAGE;
use sales_reports::reports::{Report, ReportCatalog};

const PEOPLE_SQL: &str = "SELECT id, name FROM people ORDER BY id";

fn people() -> QueryResult {
    QueryResult::with_data(
        vec![ColumnInfo::new("id", "INT4"), ColumnInfo::new("name", "TEXT")],
        vec![
            vec![Value::Int(1), Value::from("Ann")],
            vec![Value::Int(2), Value::Null],
        ],
    )
}

fn streams(input: &str) -> Streams<Cursor<Vec<u8>>, Vec<u8>, Vec<u8>> {
    Streams {
        input: Cursor::new(input.as_bytes().to_vec()),
        out: Vec::new(),
        diagnostics: Vec::new(),
    }
}

#[tokio::test]
async fn test_rows_render_as_aligned_table() {
    let db = MockDatabaseClient::new().with_response(PEOPLE_SQL, people());
    let mut runner = ReportRunner::new(&db, Vec::<u8>::new(), Vec::<u8>::new());

    runner.run_report(PEOPLE_SQL, "T").await.unwrap();

    let (out, diagnostics) = runner.into_inner();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "\nT\n=\nid | name\n---------\n1  | Ann \n2  | NULL\n\nTotal: 2 record(s)\n"
    );
    assert!(diagnostics.is_empty());
}

#[tokio::test]
async fn test_empty_result_prints_only_the_message() {
    let sql = "SELECT id FROM pedido WHERE false";
    let db = MockDatabaseClient::new().with_response(sql, QueryResult::new());
    let mut runner = ReportRunner::new(&db, Vec::<u8>::new(), Vec::<u8>::new());

    runner.run_report(sql, "").await.unwrap();

    let (out, _) = runner.into_inner();
    assert_eq!(String::from_utf8(out).unwrap(), format!("\n{NO_ROWS_MESSAGE}\n"));
}

#[tokio::test]
async fn test_failed_query_looks_like_no_rows() {
    let db = FailingDatabaseClient::new("relation \"pedidos\" does not exist");
    let mut runner = ReportRunner::new(&db, Vec::<u8>::new(), Vec::<u8>::new());

    runner.run_report("SELECT * FROM pedidos", "Broken").await.unwrap();

    let (out, diagnostics) = runner.into_inner();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        format!("\nBroken\n======\n{NO_ROWS_MESSAGE}\n")
    );
    let diagnostics = String::from_utf8(diagnostics).unwrap();
    assert!(diagnostics.starts_with("Error executing query: "));
    assert!(diagnostics.contains("relation \"pedidos\" does not exist"));
}

#[tokio::test]
async fn test_statement_without_rows_is_not_an_error() {
    let db = MockDatabaseClient::new();
    let mut runner = ReportRunner::new(&db, Vec::<u8>::new(), Vec::<u8>::new());

    runner
        .run_report("UPDATE produto SET preco = preco", "")
        .await
        .unwrap();

    let (out, diagnostics) = runner.into_inner();
    assert_eq!(String::from_utf8(out).unwrap(), format!("\n{NO_ROWS_MESSAGE}\n"));
    assert!(diagnostics.is_empty());
}

#[tokio::test]
async fn test_custom_report_runs_from_menu() {
    let catalog =
        ReportCatalog::with_custom(vec![Report::new("16", "People", PEOPLE_SQL)]).unwrap();
    let db = MockDatabaseClient::new().with_response(PEOPLE_SQL, people());

    let mut io = streams("16\n\n0\n");
    app::run(&db, &catalog, Mode::Interactive, &mut io)
        .await
        .unwrap();

    assert_eq!(db.executed(), vec![PEOPLE_SQL.to_string()]);
    assert!(db.is_closed());
    let out = String::from_utf8(io.out).unwrap();
    assert!(out.contains("\n16. People\n"));
    assert!(out.contains("\n16. People\n==========\nid | name\n"));
    assert!(out.contains("Total: 2 record(s)"));
}

#[tokio::test]
async fn test_every_builtin_report_runs_once() {
    let catalog = ReportCatalog::builtin();
    let db = MockDatabaseClient::new();

    let script: String = catalog.iter().map(|r| format!("{}\n\n", r.id)).collect();
    let mut io = streams(&format!("{script}0\n"));
    app::run(&db, &catalog, Mode::Interactive, &mut io)
        .await
        .unwrap();

    assert_eq!(db.executed().len(), catalog.len());
    let out = String::from_utf8(io.out).unwrap();
    assert_eq!(out.matches("Total: 1 record(s)").count(), catalog.len());
}
