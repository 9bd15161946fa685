//! `employer-screen`: rank, resolve, enrich and export.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use employer::{EnrichedTable, ScreenConfig, Screener, Strategy, XlsxReportWriter, strategy};
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "Screen best-employer rankings for listed stocks", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Spreadsheet to write, overriding the configured path.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the top companies for each strategy.
    #[arg(long, default_value_t = false)]
    strategies: bool,
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{EnvFilter, fmt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("employer=info"));

    if std::env::var("EMPLOYER_LOG_JSON").is_ok() {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    } else {
        fmt().with_env_filter(env_filter).with_target(true).init();
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<ScreenConfig> {
    let mut config = match &cli.config {
        Some(path) => ScreenConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ScreenConfig::default(),
    };
    if let Some(output) = &cli.output {
        config.output_path = output.clone();
    }
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Renders the top companies of every strategy. A preview that cannot be
/// built is logged and left out.
fn strategy_previews(table: &EnrichedTable) -> String {
    let mut out = String::new();
    for s in Strategy::ALL {
        let frame = match strategy::preview(s, table) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(strategy = %s, error = %e, "Failed to build strategy preview");
                continue;
            }
        };
        out.push_str(&format!("\n{s} strategy (top {}):\n", strategy::PREVIEW_ROWS));
        if frame.height() == 0 {
            out.push_str("No companies matched.\n");
        } else {
            out.push_str(&format!("{frame}\n"));
        }
    }
    out
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = load_config(&cli)?;
    let screener =
        Screener::from_config(config.clone()).context("Failed to initialise providers")?;

    let run = screener.run().await?;

    let writer = XlsxReportWriter::new(&config.output_path);
    let code = match screener.export(&run, &writer) {
        Ok(()) => {
            info!(
                path = %config.output_path.display(),
                companies = run.table.len(),
                "Report saved"
            );
            ExitCode::SUCCESS
        }
        Err(_) => ExitCode::FAILURE,
    };

    if cli.strategies {
        print!("{}", strategy_previews(&run.table));
    }

    Ok(code)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!(error = format!("{e:#}"), "Screen failed");
            ExitCode::FAILURE
        }
    }
}
