use anyhow::Result;
use clap::Parser;
use p24rates::cli::rates::OutputFormat;
use p24rates::core::log::init_logging;
use std::path::Path;
use std::process::ExitCode;

#[derive(Parser)]
#[command(version, about, allow_negative_numbers = true)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long)]
    config_path: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Create default configuration and exit
    #[arg(long)]
    init_config: bool,

    /// Number of days to fetch, counting back from today (at most 10)
    days: Option<i64>,

    /// Currency codes to show, e.g. USD EUR PLN
    currencies: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    if cli.init_config {
        p24rates::cli::setup::setup()?;
        return Ok(ExitCode::SUCCESS);
    }

    let result = p24rates::run_command(
        &program_name(),
        cli.days,
        cli.currencies,
        cli.config_path.as_deref(),
        cli.format,
    )
    .await;

    match result {
        Ok(outcome) => Ok(outcome.exit_code()),
        Err(e) => {
            tracing::error!(error = %e, "Application failed");
            Err(e)
        }
    }
}

fn program_name() -> String {
    std::env::args_os()
        .next()
        .as_deref()
        .map(Path::new)
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string())
}
