//! Over/under expected value analyzer entry point.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use prop_ev::analysis::{analyze, AnalysisOptions, ResultFilter};
use prop_ev::config::Config;
use prop_ev::error::AnalysisError;
use prop_ev::metrics;
use prop_ev::model::{default_max_count, distribution, expected_value, poisson_split};
use prop_ev::output::{self, format_number, OutputMode};
use prop_ev::record::Side;
use prop_ev::sheet::{self, OddsLimits};
use prop_ev::validation::{validate_with, ValidationRules};

const RULE: &str = "======================================================================";
const THIN_RULE: &str = "----------------------------------------------------------------------";

/// Poisson expected value analysis for over/under count lines.
#[derive(Parser, Debug)]
#[command(name = "prop-ev")]
#[command(about = "Rank over/under lines by expected value under a Poisson model")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate, score and rank a batch.
    Analyze {
        /// Input sheet (subject, rate, lineOver, oddsOver, lineUnder, oddsUnder).
        input: PathBuf,

        /// Print JSON instead of tables.
        #[arg(long)]
        json: bool,

        /// Only show positive-EV results.
        #[arg(long)]
        only_profitable: bool,

        /// Only show results with best EV at least this value.
        #[arg(long, allow_hyphen_values = true)]
        min_ev: Option<f64>,

        /// Only show one recommended side (over or under).
        #[arg(long)]
        side: Option<Side>,

        /// Show at most this many results.
        #[arg(long)]
        top: Option<usize>,

        /// Write every ranked result to this file at full precision.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run the validation gate only.
    Validate {
        /// Input sheet.
        input: PathBuf,
    },

    /// Join a rate sheet with an odds sheet into an input sheet.
    Join {
        /// Sheet with subject and rate columns.
        rates: PathBuf,

        /// Sheet with match, subject, line, odds_over and odds_under columns.
        odds: PathBuf,

        /// Where to write the joined input sheet.
        #[arg(short, long, default_value = "input.csv")]
        output: PathBuf,
    },

    /// Show the Poisson distribution of a count against a line.
    Distribution {
        /// Historical mean count.
        #[arg(long)]
        rate: f64,

        /// Over/under line.
        #[arg(long)]
        line: f64,

        /// Highest count to show.
        #[arg(long)]
        max_k: Option<u64>,

        /// Decimal odds for the over side, to price it.
        #[arg(long)]
        odds_over: Option<f64>,

        /// Decimal odds for the under side, to price it.
        #[arg(long)]
        odds_under: Option<f64>,

        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Write the demonstration batch.
    Sample {
        /// Where to write it.
        #[arg(short, long, default_value = "sample.csv")]
        output: PathBuf,
    },

    /// Check configuration validity.
    CheckConfig,
}

fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("prop_ev=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Initialize metrics
    metrics::init_metrics();

    match args.command {
        Command::Analyze {
            input,
            json,
            only_profitable,
            min_ev,
            side,
            top,
            output,
        } => {
            let filter = ResultFilter {
                only_profitable,
                min_ev,
                side,
                limit: top,
            };
            cmd_analyze(&input, json, &filter, output.as_deref())
        }
        Command::Validate { input } => cmd_validate(&input),
        Command::Join { rates, odds, output } => cmd_join(&rates, &odds, &output),
        Command::Distribution {
            rate,
            line,
            max_k,
            odds_over,
            odds_under,
            json,
        } => cmd_distribution(rate, line, max_k, odds_over.zip(odds_under), json),
        Command::Sample { output } => cmd_sample(&output),
        Command::CheckConfig => cmd_check_config(),
    }
}

/// Load and validate configuration.
fn load_config() -> anyhow::Result<Config> {
    let config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    Ok(config)
}

/// Print every diagnostic of a rejected batch.
fn print_rejection(err: &AnalysisError) {
    println!("{}", RULE);
    println!("BATCH REJECTED");
    println!("{}", RULE);
    match err {
        AnalysisError::Rejected { diagnostics } => {
            for (i, diagnostic) in diagnostics.iter().enumerate() {
                println!("  {}. {}", i + 1, diagnostic);
            }
        }
        AnalysisError::NoSurvivors { skipped } => {
            println!("  No records could be scored ({} skipped)", skipped);
        }
    }
    println!("{}", RULE);
}

/// Validate, score, rank and print a batch.
fn cmd_analyze(
    input: &Path,
    json: bool,
    filter: &ResultFilter,
    output_path: Option<&Path>,
) -> anyhow::Result<()> {
    let config = load_config()?;
    let table = sheet::read_table(input).with_context(|| format!("reading {}", input.display()))?;

    let report = match analyze(&table, &AnalysisOptions::from(&config)) {
        Ok(report) => report,
        Err(err) => {
            print_rejection(&err);
            return Err(err.into());
        }
    };

    for warning in &report.warnings {
        warn!("{}", warning);
    }

    if let Some(path) = output_path {
        sheet::write_results(path, &report.results)?;
    }

    let mode = OutputMode::from_json_flag(json);
    let shown = filter.apply(&report.results);
    if mode == OutputMode::Table {
        println!("{}", RULE);
        println!("EXPECTED VALUE RANKING - {}", input.display());
        println!("{}", RULE);
    }
    println!(
        "{}",
        output::render_report(&report, &shown, mode, config.display_precision)?
    );
    if mode == OutputMode::Table {
        println!("{}", THIN_RULE);
        println!(
            "Showing {} of {} scored subjects",
            shown.len(),
            report.results.len()
        );
        if let Some(path) = output_path {
            println!("Full results written to {}", path.display());
        }
        println!("{}", RULE);
    }

    Ok(())
}

/// Run the validation gate and print its outcome.
fn cmd_validate(input: &Path) -> anyhow::Result<()> {
    let config = load_config()?;
    let table = sheet::read_table(input).with_context(|| format!("reading {}", input.display()))?;

    let outcome = validate_with(&table, &ValidationRules::from(&config));

    println!("{}", RULE);
    println!("VALIDATION - {}", input.display());
    println!("{}", RULE);
    println!("Rows: {}", table.len());
    for warning in &outcome.warnings {
        println!("  WARNING: {}", warning);
    }

    if outcome.valid {
        println!("{}", RULE);
        println!("BATCH VALID");
        println!("{}", RULE);
        return Ok(());
    }

    for (i, diagnostic) in outcome.diagnostics.iter().enumerate() {
        println!("  {}. [{:?}] {}", i + 1, diagnostic.kind, diagnostic.message);
    }
    println!("{}", RULE);
    println!("BATCH REJECTED ({} problem(s))", outcome.diagnostics.len());
    println!("{}", RULE);

    Err(anyhow::anyhow!(
        "validation failed with {} problem(s)",
        outcome.diagnostics.len()
    ))
}

/// Join a rate sheet with an odds sheet.
fn cmd_join(rates_path: &Path, odds_path: &Path, output_path: &Path) -> anyhow::Result<()> {
    let config = load_config()?;

    let rates_table =
        sheet::read_table(rates_path).with_context(|| format!("reading {}", rates_path.display()))?;
    let odds_table =
        sheet::read_table(odds_path).with_context(|| format!("reading {}", odds_path.display()))?;

    let rates = sheet::load_rate_sheet(&rates_table)?;
    let odds = sheet::load_odds_sheet(&odds_table, &OddsLimits::from(&config))?;
    let joined = sheet::join(&rates, &odds);

    println!("{}", RULE);
    println!("JOIN RATES + ODDS");
    println!("{}", RULE);
    println!("  Rates: {} subjects", rates.len());
    println!("  Odds:  {} lines", odds.len());
    println!("  Joined: {} rows", joined.table.len());
    for (label, subjects) in &joined.matches {
        println!("    - {} ({} subjects)", label, subjects);
    }
    for warning in joined.warnings() {
        println!("  WARNING: {}", warning);
    }

    if joined.table.is_empty() {
        println!("{}", RULE);
        return Err(anyhow::anyhow!("no subject appears on both sheets"));
    }

    sheet::write_table(output_path, &joined.table)?;
    println!("  Written to {}", output_path.display());
    println!("{}", RULE);

    Ok(())
}

/// Show the distribution of a count against a line.
fn cmd_distribution(
    rate: f64,
    line: f64,
    max_k: Option<u64>,
    odds: Option<(f64, f64)>,
    json: bool,
) -> anyhow::Result<()> {
    if !rate.is_finite() || rate <= 0.0 {
        anyhow::bail!("rate must be greater than 0, got {}", rate);
    }
    if !line.is_finite() || line < 0.0 {
        anyhow::bail!("line must be non-negative, got {}", line);
    }
    if let Some((over, under)) = odds {
        if over <= 1.0 || under <= 1.0 {
            anyhow::bail!("odds must be greater than 1.0, got {} / {}", over, under);
        }
    }

    let config = load_config()?;
    let precision = config.display_precision;
    let max_k = max_k.unwrap_or_else(|| default_max_count(rate));
    let points = distribution(rate, line, max_k);
    let mode = OutputMode::from_json_flag(json);

    if mode == OutputMode::Json {
        println!("{}", output::render_distribution(&points, mode, precision)?);
        return Ok(());
    }

    let split = poisson_split(rate, line);
    println!("{}", RULE);
    println!("POISSON DISTRIBUTION - rate {} vs line {}", rate, line);
    println!("{}", RULE);
    println!("{}", output::render_distribution(&points, mode, precision)?);
    println!("{}", THIN_RULE);
    println!("  P(Over):  {}", format_number(split.prob_above, precision));
    println!("  P(Under): {}", format_number(split.prob_at_or_below, precision));
    if let Some((over, under)) = odds {
        let ev_over = expected_value(split.prob_above, over);
        let ev_under = expected_value(split.prob_at_or_below, under);
        println!("  EV Over:  {}", format_number(ev_over, precision));
        println!("  EV Under: {}", format_number(ev_under, precision));
    }
    println!("{}", RULE);

    info!(rate, line, max_k, "Distribution rendered");
    Ok(())
}

/// Write the demonstration batch.
fn cmd_sample(output_path: &Path) -> anyhow::Result<()> {
    let table = sheet::sample_table();
    sheet::write_table(output_path, &table)?;

    println!("Wrote {} sample rows to {}", table.len(), output_path.display());
    println!("Try: prop-ev analyze {}", output_path.display());
    Ok(())
}

/// Check configuration validity.
fn cmd_check_config() -> anyhow::Result<()> {
    println!("{}", RULE);
    println!("PROP EV - CONFIGURATION CHECK");
    println!("{}", RULE);

    // Load configuration
    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    // Validate configuration
    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    // Show configuration summary
    println!("{}", THIN_RULE);
    println!("Configuration Summary:");
    println!("  Line Tolerance: {}", config.line_tolerance);
    println!("  Max Rate: {}", config.max_rate);
    println!(
        "  Parallel Threshold: {}",
        if config.parallel_threshold == 0 {
            "disabled".to_string()
        } else {
            format!("{} rows", config.parallel_threshold)
        }
    );
    println!("  Max Odds Line: {}", config.max_odds_line);
    println!("  Max Odds Price: {}", config.max_odds_price);
    println!("  Display Precision: {} decimals", config.display_precision);
    println!("  Log Level: {}", config.rust_log);
    println!("{}", RULE);
    println!("CONFIGURATION CHECK PASSED");
    println!("{}", RULE);

    Ok(())
}
