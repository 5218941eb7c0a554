//! Interactive numbered menu.
//!
//! Reads choices line by line from any `BufRead`, so the loop runs the same
//! against stdin or an in-memory script.

use std::io::{BufRead, Write};

use crate::error::Result;
use crate::query::ReportRunner;
use crate::reports::ReportCatalog;

const MENU_RULE_WIDTH: usize = 40;
const EXIT_CHOICE: &str = "0";

/// Writes the numbered menu followed by the prompt.
pub fn print_menu(out: &mut impl Write, catalog: &ReportCatalog) -> Result<()> {
    let rule = "=".repeat(MENU_RULE_WIDTH);
    writeln!(out, "{rule}")?;
    for report in catalog.iter() {
        writeln!(out, "{}", report.heading())?;
    }
    writeln!(out, "{EXIT_CHOICE}. Exit")?;
    writeln!(out, "{rule}")?;
    write!(out, "Choose an option: ")?;
    out.flush()?;
    Ok(())
}

/// Runs the menu until the operator picks `0` or input ends.
///
/// Returns the number of reports run.
pub async fn run_menu<R, W, E>(
    catalog: &ReportCatalog,
    runner: &mut ReportRunner<'_, W, E>,
    input: &mut R,
) -> Result<usize>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    let mut reports_run = 0;

    loop {
        print_menu(runner.out(), catalog)?;

        let Some(choice) = read_line(input)? else {
            writeln!(runner.out())?;
            break;
        };

        if choice == EXIT_CHOICE {
            break;
        }

        match catalog.get(&choice) {
            Some(report) => {
                runner.run(report).await?;
                reports_run += 1;
            }
            None => writeln!(runner.out(), "Invalid option!")?,
        }

        write!(runner.out(), "\nPress ENTER to continue...")?;
        runner.out().flush()?;
        if read_line(input)?.is_none() {
            writeln!(runner.out())?;
            break;
        }
    }

    Ok(reports_run)
}

/// Reads one trimmed line; `None` at end of input.
fn read_line(input: &mut impl BufRead) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
