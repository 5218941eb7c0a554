//! Report runner: execute a statement, then print its table.

use std::io::Write;

use super::executor::QueryExecutor;
use crate::db::DatabaseClient;
use crate::error::Result;
use crate::render::render_result;
use crate::reports::Report;

/// Composes the executor and the renderer over a pair of output streams.
///
/// Tables go to `out`; query failures are reported on `diagnostics`.
pub struct ReportRunner<'a, W: Write, E: Write> {
    executor: QueryExecutor<'a>,
    out: W,
    diagnostics: E,
}

impl<'a, W: Write, E: Write> ReportRunner<'a, W, E> {
    /// Creates a runner over a borrowed session.
    pub fn new(db: &'a dyn DatabaseClient, out: W, diagnostics: E) -> Self {
        Self {
            executor: QueryExecutor::new(db),
            out,
            diagnostics,
        }
    }

    /// Executes `sql` and writes the rendered table under `title`.
    ///
    /// Query failures are absorbed; only a failure to write the output is
    /// returned.
    pub async fn run_report(&mut self, sql: &str, title: &str) -> Result<()> {
        let result = self.executor.execute(sql, &mut self.diagnostics).await;
        let table = render_result(&result, title);

        writeln!(self.out)?;
        self.out.write_all(table.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    /// Runs a catalog entry under its heading.
    pub async fn run(&mut self, report: &Report) -> Result<()> {
        self.run_report(&report.sql, &report.heading()).await
    }

    /// Returns the table output stream, for callers that print around reports.
    pub fn out(&mut self) -> &mut W {
        &mut self.out
    }

    /// Consumes the runner and returns its output streams.
    pub fn into_inner(self) -> (W, E) {
        (self.out, self.diagnostics)
    }
}
