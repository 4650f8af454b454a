use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tax_cli::{Session, TaxConfig, logging};
use tax_core::{TaxService, UpdateCapRequest};
use tracing::{debug, info};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Progressive personal income tax calculator.
///
/// Reads tax requests as JSON and prints the tax owed or refunded, with a
/// breakdown per bracket.
#[derive(Debug, Parser)]
#[command(name = "taxcalc")]
#[command(version, about, long_about = None)]
struct Cli {
    /// TOML configuration file with initial allowance caps and logging
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log filter directive (overrides the config file; RUST_LOG wins over both)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Calculate tax for a single JSON request
    Compute {
        /// Request file, or `-` for stdin
        #[arg(short, long, default_value = "-")]
        input: PathBuf,

        /// Set the personal allowance cap before calculating (10,000 to 100,000)
        #[arg(long)]
        personal_cap: Option<Decimal>,

        /// Set the k-receipt allowance cap before calculating (0 to 100,000)
        #[arg(long)]
        k_receipt_cap: Option<Decimal>,

        /// Pretty-print the response
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },

    /// Replay a JSON-lines session of calculations and cap updates
    Replay {
        /// Session file, one operation per line
        #[arg(short, long)]
        script: PathBuf,
    },
}

// ─── commands ────────────────────────────────────────────────────────────────

fn read_input(path: &Path) -> Result<String> {
    let mut body = String::new();
    if path == Path::new("-") {
        io::stdin()
            .read_to_string(&mut body)
            .context("Failed to read request from stdin")?;
    } else {
        File::open(path)
            .and_then(|mut file| file.read_to_string(&mut body))
            .with_context(|| format!("Failed to read request: {}", path.display()))?;
    }
    Ok(body)
}

fn compute(
    service: &TaxService,
    input: &Path,
    personal_cap: Option<Decimal>,
    k_receipt_cap: Option<Decimal>,
    pretty: bool,
) -> Result<()> {
    if let Some(amount) = personal_cap {
        service
            .update_personal_deduction(&UpdateCapRequest { amount })
            .context("Failed to set personal allowance cap")?;
    }
    if let Some(amount) = k_receipt_cap {
        service
            .update_k_receipt_deduction(&UpdateCapRequest { amount })
            .context("Failed to set k-receipt allowance cap")?;
    }

    let body = read_input(input)?;
    let response = service
        .calculate_json(&body)
        .context("Tax request rejected")?;

    let output = if pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{output}");

    Ok(())
}

fn replay(
    service: TaxService,
    script: &Path,
) -> Result<()> {
    let file = File::open(script)
        .with_context(|| format!("Failed to open: {}", script.display()))?;

    let summary = Session::new(service)
        .run(BufReader::new(file), io::stdout().lock())
        .with_context(|| format!("Failed to replay: {}", script.display()))?;

    info!(
        applied = summary.applied,
        rejected = summary.rejected,
        "session complete"
    );
    Ok(())
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => TaxConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => TaxConfig::default(),
    };

    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    logging::init_logging(level, config.logging.file.as_deref())?;
    debug!(?config, "configuration loaded");

    let service = TaxService::new(Arc::new(config.registry()));

    match cli.command {
        Command::Compute {
            input,
            personal_cap,
            k_receipt_cap,
            pretty,
        } => compute(&service, &input, personal_cap, k_receipt_cap, pretty),
        Command::Replay { script } => replay(service, &script),
    }
}
