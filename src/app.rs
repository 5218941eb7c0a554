//! Application entry point once a session is open.
//!
//! Dispatches the selected run mode over the session and releases the
//! session on every exit path.

use std::io::{BufRead, Write};

use tracing::{info, warn};

use crate::db::DatabaseClient;
use crate::error::{ReportError, Result};
use crate::menu::run_menu;
use crate::query::ReportRunner;
use crate::reports::ReportCatalog;

/// Banner printed when the interactive menu starts.
pub const BANNER: &str = "Sales Reports CLI";

/// What to do with the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Show the numbered menu and read choices from the input stream.
    Interactive,
    /// Run the report with this id, then exit.
    Single(String),
    /// Print the catalog without touching the database.
    List,
}

/// Input and output streams used by a run.
pub struct Streams<R, W, E> {
    /// Operator input (menu choices).
    pub input: R,
    /// Report tables and menu text.
    pub out: W,
    /// Query error messages.
    pub diagnostics: E,
}

/// Runs `mode` over `db`, then closes the session whatever the outcome.
pub async fn run<R, W, E>(
    db: &dyn DatabaseClient,
    catalog: &ReportCatalog,
    mode: Mode,
    streams: &mut Streams<R, W, E>,
) -> Result<()>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    let outcome = run_mode(db, catalog, mode, streams).await;

    match db.close().await {
        Ok(()) => info!("Database connection closed"),
        Err(e) => warn!("Failed to close database connection: {}", e),
    }

    outcome
}

async fn run_mode<R, W, E>(
    db: &dyn DatabaseClient,
    catalog: &ReportCatalog,
    mode: Mode,
    streams: &mut Streams<R, W, E>,
) -> Result<()>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    let Streams {
        input,
        out,
        diagnostics,
    } = streams;

    match mode {
        Mode::List => {
            for report in catalog.iter() {
                writeln!(out, "{}", report.heading())?;
            }
            Ok(())
        }
        Mode::Single(id) => {
            let report = catalog
                .get(&id)
                .ok_or_else(|| ReportError::config(format!("Unknown report '{id}'")))?;
            ReportRunner::new(db, out, diagnostics).run(report).await
        }
        Mode::Interactive => {
            writeln!(out, "{BANNER}")?;
            writeln!(out, "{}", "=".repeat(50))?;
            let mut runner = ReportRunner::new(db, out, diagnostics);
            let count = run_menu(catalog, &mut runner, input).await?;
            info!("Menu closed after {} report(s)", count);
            Ok(())
        }
    }
}
