//! Query execution and report running.
//!
//! The executor turns a SQL string into a `QueryResult`; the runner pairs it
//! with the table renderer.

pub mod executor;
pub mod runner;

pub use executor::QueryExecutor;
pub use runner::ReportRunner;
