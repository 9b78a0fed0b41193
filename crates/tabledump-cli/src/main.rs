//! tabledump CLI - print the cells of a spreadsheet table

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tabledump_core::TableRange;
use tabledump_xlsx::{CellResolver, MissingCellPolicy, TableSelector, Worksheet, XlsxDocument};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tabledump")]
#[command(
    author,
    version,
    about = "Print every cell of a spreadsheet table, one per line"
)]
struct Cli {
    /// Log what is read and selected (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the cells of a table row by row, one cell per line
    Dump {
        /// Input workbook (xlsx)
        input: PathBuf,

        /// Only look for tables on this worksheet
        #[arg(short, long)]
        sheet: Option<String>,

        /// Table name or display name (default: first table found)
        #[arg(short, long, conflicts_with = "range")]
        table: Option<String>,

        /// Print this range instead of a table's (uses --sheet, or the first worksheet)
        #[arg(short, long)]
        range: Option<String>,

        /// Skip the table's header and totals rows
        #[arg(long, conflicts_with = "range")]
        data_only: bool,

        /// Fail on addresses that have no cell instead of printing an empty line
        #[arg(long)]
        strict: bool,
    },

    /// List all tables in a workbook
    Tables {
        /// Input workbook (xlsx)
        input: PathBuf,
    },

    /// List all worksheets in a workbook
    Sheets {
        /// Input workbook (xlsx)
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Dump {
            input,
            sheet,
            table,
            range,
            data_only,
            strict,
        } => dump(
            &input,
            TableSelector { sheet, table },
            range.as_deref(),
            data_only,
            strict,
        ),
        Commands::Tables { input } => list_tables(&input),
        Commands::Sheets { input } => list_sheets(&input),
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(io::stderr)
        .init();
}

fn open(input: &Path) -> Result<XlsxDocument> {
    XlsxDocument::open(input).with_context(|| format!("Failed to open '{}'", input.display()))
}

fn dump(
    input: &Path,
    selector: TableSelector,
    range: Option<&str>,
    data_only: bool,
    strict: bool,
) -> Result<()> {
    let document = open(input)?;

    let (sheet, range) = match range {
        Some(text) => {
            let sheet = range_sheet(&document, selector.sheet.as_deref())?;
            let range = TableRange::parse(text)
                .with_context(|| format!("Invalid range '{}'", text))?;
            (sheet, range)
        }
        None => {
            let (sheet, table) = document
                .select_table(&selector)
                .with_context(|| format!("No table to print in '{}'", input.display()))?;
            let mut range = table.range().with_context(|| {
                format!(
                    "Table '{}' on sheet '{}' has an invalid range",
                    table.display_name,
                    sheet.name()
                )
            })?;
            if data_only {
                range = range.body(table.header_row_count, table.totals_row_count);
            }
            (sheet, range)
        }
    };

    tracing::debug!(
        "Printing {} ({} cells) from sheet '{}'",
        range,
        range.cell_count(),
        sheet.name()
    );

    let policy = if strict {
        MissingCellPolicy::Error
    } else {
        MissingCellPolicy::Empty
    };
    let resolver = CellResolver::new(&document).with_missing_policy(policy);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    for address in range.cells() {
        let value = resolver
            .resolve_address(sheet, &address)
            .with_context(|| {
                format!(
                    "Failed to read cell {} on sheet '{}'",
                    address,
                    sheet.name()
                )
            })?;
        writeln!(out, "{}", value).context("Failed to write to stdout")?;
    }

    out.flush().context("Failed to write to stdout")?;
    Ok(())
}

/// Worksheet for an explicit `--range`
fn range_sheet<'a>(document: &'a XlsxDocument, sheet: Option<&str>) -> Result<&'a Worksheet> {
    match sheet {
        Some(name) => Ok(document.worksheet_by_name(name)?),
        None => document
            .worksheet(0)
            .context("Workbook has no worksheets"),
    }
}

fn list_tables(input: &Path) -> Result<()> {
    let document = open(input)?;

    for (sheet, table) in document.tables() {
        println!("{}\t{}\t{}", sheet.name(), table.display_name, table.reference);
    }

    Ok(())
}

fn list_sheets(input: &Path) -> Result<()> {
    let document = open(input)?;

    for (i, name) in document.sheet_names().enumerate() {
        println!("{}\t{}", i, name);
    }

    Ok(())
}
