//! pricevar CLI: daily variation report for one ticker.
//!
//! Steps:
//! - fetch full daily history (Yahoo Finance, or `--import <csv>`) and save it as CSV
//! - compute the percentage daily variation and save it as XLSX
//! - show the variation histogram with its extremes marked
//! - show the density histogram with a fitted normal curve

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, LeaveAlternateScreen};
use pricevar_core::data::{CsvImportProvider, DataProvider, YahooProvider};
use pricevar_core::Ticker;
use pricevar_runner::{run_pipeline, AppConfig, DisplayMode};
use pricevar_tui::presenter_for;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const PROMPT: &str = "Enter the stock ticker symbol (e.g., PFE for Pfizer): ";

#[derive(Parser)]
#[command(
    name = "pricevar",
    about = "pricevar: percentage daily variation of a stock and its distribution"
)]
struct Cli {
    /// Ticker symbol (e.g., PFE). Prompted for when omitted.
    ticker: Option<String>,

    /// Path to a TOML config file. Defaults to the per-user config if present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for the CSV, XLSX, and chart snapshot files.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Where to show charts.
    #[arg(long, value_enum)]
    display: Option<DisplayArg>,

    /// Read history from a previously saved CSV instead of Yahoo Finance.
    #[arg(long)]
    import: Option<PathBuf>,

    /// Debug-level logging on stderr.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum DisplayArg {
    Auto,
    Terminal,
    File,
}

impl From<DisplayArg> for DisplayMode {
    fn from(arg: DisplayArg) -> Self {
        match arg {
            DisplayArg::Auto => DisplayMode::Auto,
            DisplayArg::Terminal => DisplayMode::Terminal,
            DisplayArg::File => DisplayMode::File,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Restore the terminal before printing a panic from inside a chart view.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let raw = match cli.ticker.clone() {
        Some(raw) => raw,
        None => match prompt_ticker() {
            Ok(raw) => raw,
            Err(e) => {
                println!("Error: {e:#}");
                return ExitCode::FAILURE;
            }
        },
    };

    match run(&cli, &raw) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let _ = report_failure(&e, &raw, &mut io::stdout());
            ExitCode::FAILURE
        }
    }
}

/// The single user-facing diagnostic, written next to the record echoes.
fn report_failure(err: &anyhow::Error, raw: &str, out: &mut dyn Write) -> io::Result<()> {
    writeln!(
        out,
        "An error occurred while fetching data for '{}': {err:#}",
        raw.trim().to_uppercase()
    )?;
    out.flush()
}

/// Logs go to stderr; stdout carries the record echoes and the final diagnostic.
fn init_logging(verbose: bool) {
    let default = if verbose { "pricevar=debug" } else { "pricevar=info" };
    let stderr_is_tty = io::stderr().is_terminal();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(stderr_is_tty),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .init();
}

fn prompt_ticker() -> Result<String> {
    let mut stdout = io::stdout();
    write!(stdout, "{PROMPT}")?;
    stdout.flush()?;

    let mut line = String::new();
    let read = io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read ticker from stdin")?;
    if read == 0 {
        bail!("no ticker symbol given");
    }
    Ok(line)
}

/// Defaults, then config file, then flags.
fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(dir) = &cli.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(display) = cli.display {
        config.display = display.into();
    }
    config.validate()?;
    Ok(config)
}

fn run(cli: &Cli, raw: &str) -> Result<()> {
    let ticker = Ticker::parse(raw)?;
    let config = resolve_config(cli)?;

    let provider: Box<dyn DataProvider> = match &cli.import {
        Some(path) => Box::new(CsvImportProvider::new(path)),
        None => Box::new(YahooProvider::new(config.yahoo_config())?),
    };

    let interactive = io::stdout().is_terminal();
    let mut presenter = presenter_for(
        config.display,
        interactive,
        &config.output_dir,
        &ticker,
        config.chart,
    );

    let report = run_pipeline(
        provider.as_ref(),
        &ticker,
        &config.output_dir,
        presenter.as_mut(),
        &mut io::stdout(),
    )?;

    tracing::info!(
        ticker = %report.ticker,
        source = ?report.source,
        fetched = report.rows_fetched,
        retained = report.rows_retained,
        "done"
    );
    Ok(())
}
