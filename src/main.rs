//! Sales reports: a terminal catalog of analytical SQL reports.

use std::io::{self, Write};

use sales_reports::app::{self, Mode, Streams};
use sales_reports::cli::Cli;
use sales_reports::config::Config;
use sales_reports::db::{self, MockDatabaseClient};
use sales_reports::error::Result;
use sales_reports::logging;
use sales_reports::reports::ReportCatalog;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // A .env file may provide PG* variables; its absence is fine.
    let _ = dotenvy::dotenv();
    logging::init_stderr_logging();

    if let Err(e) = run().await {
        error!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;
    let catalog = ReportCatalog::with_custom(config.reports.clone())?;

    let mode = cli.mode();
    let mut streams = Streams {
        input: io::stdin().lock(),
        out: io::stdout().lock(),
        diagnostics: io::stderr(),
    };

    if mode == Mode::List || cli.mock_db {
        // Listing needs no session; --mock-db swaps in the in-memory one.
        let mock = MockDatabaseClient::new();
        return app::run(&mock, &catalog, mode, &mut streams).await;
    }

    let connection =
        config.resolve_connection(cli.to_connection_config()?, cli.connection_name())?;
    info!("Connecting to {}", connection.display_string());
    let session = db::connect(&connection).await?;
    writeln!(streams.diagnostics, "Connected to {}", connection.display_string())?;

    let outcome = app::run(session.as_ref(), &catalog, mode, &mut streams).await;
    writeln!(streams.diagnostics, "Connection closed.")?;
    outcome
}
