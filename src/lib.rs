pub mod cli;
pub mod core;
pub mod providers;

use crate::cli::rates::OutputFormat;
use crate::cli::ui;
use crate::core::{
    ExchangeRateProvider, ExecutionLogger, RateAggregator, RatesRequest, RequestError, ResultSet,
    config::AppConfig,
};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Upper bound on the number of days that can be requested.
pub const MAX_DAYS: u32 = 10;

/// Result of a single invocation.
#[derive(Debug)]
pub enum Outcome {
    /// Rates were printed and the command was logged.
    Completed(ResultSet),
    /// Rates were printed but the command could not be logged.
    LogWriteFailed(ResultSet),
    /// Arguments were rejected; nothing was fetched or logged.
    InvalidRequest(RequestError),
}

impl Outcome {
    /// Process exit status: 2 for a missing day count, 3 for a day count out of range,
    /// 4 when the command could not be logged.
    pub fn exit_status(&self) -> u8 {
        match self {
            Outcome::Completed(_) => 0,
            Outcome::InvalidRequest(RequestError::MissingDays { .. }) => 2,
            Outcome::InvalidRequest(_) => 3,
            Outcome::LogWriteFailed(_) => 4,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }
}

/// Everything a run needs besides the command line arguments.
pub struct RunContext<'a> {
    pub program: &'a str,
    pub provider: &'a (dyn ExchangeRateProvider + Send + Sync),
    pub logger: &'a ExecutionLogger,
    pub config: &'a AppConfig,
    pub format: OutputFormat,
}

/// Loads the config and runs against the live PrivatBank API.
pub async fn run_command(
    program: &str,
    days: Option<i64>,
    currencies: Vec<String>,
    config_path: Option<&str>,
    format: OutputFormat,
) -> Result<Outcome> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let provider =
        providers::PrivatBankProvider::new(Duration::from_secs(config.request_timeout_secs));
    let logger = ExecutionLogger::to_file(&config.log_path);

    let ctx = RunContext {
        program,
        provider: &provider,
        logger: &logger,
        config: &config,
        format,
    };
    run_with(&ctx, days, currencies).await
}

/// Validates the arguments, prints the rates and logs the command.
pub async fn run_with(
    ctx: &RunContext<'_>,
    days: Option<i64>,
    currencies: Vec<String>,
) -> Result<Outcome> {
    let request = match RatesRequest::resolve(
        ctx.program,
        days,
        currencies,
        &ctx.config.default_currencies,
    ) {
        Ok(request) => request,
        Err(e) => {
            println!("{e}");
            return Ok(Outcome::InvalidRequest(e));
        }
    };

    let results = fetch_rates(ctx, &request, Local::now().date_naive()).await;
    println!("{}", cli::rates::render(&results, ctx.format)?);

    let command = request.command_line(ctx.program);
    match ctx.logger.log_command(&command).await {
        Ok(()) => {
            info!(%command, "Logged command");
            Ok(Outcome::Completed(results))
        }
        Err(e) => {
            warn!(error = %e, "Failed to log command");
            eprintln!(
                "{}",
                ui::style_text(
                    &format!("Failed to record command: {e:#}"),
                    ui::StyleType::Warning
                )
            );
            Ok(Outcome::LogWriteFailed(results))
        }
    }
}

async fn fetch_rates(ctx: &RunContext<'_>, request: &RatesRequest, today: NaiveDate) -> ResultSet {
    info!(days = request.days, currencies = ?request.currencies, "Fetching exchange rates");
    let aggregator = RateAggregator::new(ctx.provider)
        .with_max_concurrent_requests(ctx.config.max_concurrent_requests);

    if ctx.format != OutputFormat::Table {
        return aggregator
            .get_rates(today, request.days, &request.currencies, &|_, error| {
                if let Some(e) = error {
                    report_fetch_error(e);
                }
            })
            .await;
    }

    let pb = ui::new_progress_bar(u64::from(request.days));
    let results = aggregator
        .get_rates(today, request.days, &request.currencies, &|date, error| {
            if let Some(e) = error {
                pb.suspend(|| report_fetch_error(e));
            }
            pb.set_message(date.to_string());
            pb.inc(1);
        })
        .await;
    pb.finish_and_clear();
    results
}

fn report_fetch_error(error: &anyhow::Error) {
    eprintln!(
        "{}",
        ui::style_text(&format!("Error occurred: {error:#}"), ui::StyleType::Warning)
    );
}
