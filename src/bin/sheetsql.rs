//! sheetsql — The sheet-to-SQL CLI
//!
//! Fetches each configured range and writes `<table>.sql`.
//!
//! # Usage
//!
//! ```bash
//! # Export every configured range
//! sheetsql
//!
//! # Print statements instead of writing files
//! sheetsql --dry-run
//!
//! # Format a saved values.get response offline
//! sheetsql format response.json --table t_shop
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sheetsql::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sheetsql")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Dump Google Sheets ranges as SQL INSERT statements", long_about = None)]
#[command(after_help = "EXAMPLES:
    sheetsql
    sheetsql --range '企業情報#t_shop!A1:D' --output-dir sql/
    sheetsql ranges
    sheetsql format response.json --table t_shop")]
struct Cli {
    /// Config file (defaults to ./sheetsql.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Spreadsheet to read
    #[arg(long, env = "SHEETSQL_SPREADSHEET_ID")]
    spreadsheet_id: Option<String>,

    /// Directory receiving the .sql files
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Range to export, `<label>#<table>!<cells>` (repeatable, replaces configured ranges)
    #[arg(short, long = "range")]
    ranges: Vec<String>,

    /// OAuth access token (skips the credential files)
    #[arg(long, env = "SHEETSQL_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Print statements instead of writing files
    #[arg(short, long)]
    dry_run: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every range and write the .sql files (default)
    Export,
    /// List the configured ranges
    Ranges,
    /// Format a saved ValueRange JSON document
    Format {
        /// Path to the JSON document
        file: PathBuf,
        /// Target table name
        #[arg(short, long)]
        table: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        None | Some(Commands::Export) => export(&cli).await,
        Some(Commands::Ranges) => show_ranges(&cli),
        Some(Commands::Format { file, table }) => format_file(file, table),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "sheetsql=debug" } else { "sheetsql=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Config file merged with command-line overrides.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;

    if let Some(id) = &cli.spreadsheet_id {
        config.spreadsheet_id = id.clone();
    }
    if let Some(dir) = &cli.output_dir {
        config.output_dir = dir.clone();
    }
    if !cli.ranges.is_empty() {
        config.ranges = cli.ranges.clone();
    }
    if let Some(token) = &cli.access_token {
        config.auth.access_token = Some(token.clone());
    }

    Ok(config)
}

async fn export(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let ranges = config.range_specs()?;

    let credentials = Credentials::resolve(&config.auth)?;
    let token = credentials
        .access_token(&reqwest::Client::new())
        .await
        .context("Authorization failed")?;

    let source = GoogleSheets::new(&config.spreadsheet_id, token)?;
    let exporter = Exporter::new(source, &config.output_dir).dry_run(cli.dry_run);

    if cli.verbose {
        println!("{} {}", "Spreadsheet:".dimmed(), config.spreadsheet_id.yellow());
        println!("{} {}", "Output:".dimmed(), exporter.output_dir().display());
    }

    let report = exporter.run(&ranges).await?;
    print_report(&report);

    Ok(())
}

fn print_report(report: &RunReport) {
    for (table, sql) in &report.statements {
        println!("{} {}", "--".dimmed(), table.cyan());
        println!("{}", sql);
    }

    for path in &report.written {
        println!("{} Complete : {}", "✓".green(), path.display().to_string().cyan());
    }
    for table in &report.skipped {
        println!("{} Skipped {} (no data rows)", "⚠".yellow(), table.yellow());
    }
    for (table, e) in &report.failed {
        println!("{} {} {}", "✗".red(), table.white(), e.to_string().red());
    }
}

fn show_ranges(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let ranges = config.range_specs()?;

    println!(
        "{:24} {:24} {:10} {}",
        "Table".white().bold(),
        "Label".white().bold(),
        "Cells".white().bold(),
        "File".white().bold()
    );
    println!("{}", "─".repeat(80).dimmed());

    for spec in &ranges {
        let file = config.output_dir.join(spec.file_name());
        println!(
            "{:24} {:24} {:10} {}",
            spec.table.cyan().bold(),
            spec.label.yellow(),
            spec.cells.white(),
            file.display().to_string().dimmed()
        );
    }

    Ok(())
}

fn format_file(file: &Path, table: &str) -> Result<()> {
    let values = ValueRange::from_file(file)
        .with_context(|| format!("Failed to read '{}'", file.display()))?;
    let sql = sheetsql::format_insert(table, &values.into_table())?;
    println!("{}", sql);
    Ok(())
}
