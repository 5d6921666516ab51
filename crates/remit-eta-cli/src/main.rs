//! remit-eta - delivery-time probe for currency-transfer quotes
//!
//! ## Commands
//!
//! - `run`: validate credentials, quote the battery, print and persist reports
//! - `validate`: credential check only
//! - `baseline`: print the baseline delivery-time table
//! - `analyze`: re-analyze a saved full report
//! - `battery`: print the fixture battery and its digest

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use remit_eta_client::{ProbeEnvironment, QuoteClient, QuoteConfig};
use remit_eta_core::obs::emit_report_write_error;
use remit_eta_core::reporting::source_label;
use remit_eta_core::{
    analyze, load_full_report, render_console_report, simplify, write_full_report,
    write_simplified_report, BaselineTable, ExperimentOutcome, RunReport, RunSpan,
};
use remit_eta_runner::{Battery, BatterySpec, ExperimentRunner, RunConfig};
use std::path::{Path, PathBuf};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "remit-eta")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Probe currency-transfer quotes for delivery-time estimates", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Quote every case and method, then print and save the reports
    Run {
        #[command(flatten)]
        connection: ConnectionArgs,

        #[command(flatten)]
        fixtures: FixtureArgs,

        /// Baseline table JSON (default: built-in reference table)
        #[arg(long)]
        baseline: Option<PathBuf>,

        /// Directory for the full and simplified report files
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Print the reports without writing any files
        #[arg(long)]
        no_write: bool,

        /// Also list every outcome
        #[arg(long)]
        details: bool,
    },

    /// Check that the configured credentials are accepted
    Validate {
        #[command(flatten)]
        connection: ConnectionArgs,
    },

    /// Print the baseline delivery-time table
    Baseline {
        /// Baseline table JSON (default: built-in reference table)
        #[arg(long)]
        baseline: Option<PathBuf>,
    },

    /// Re-analyze and print a saved full report
    Analyze {
        /// Path to a `delivery-times-<stamp>.json` file
        report: PathBuf,

        /// Compare against this baseline instead of the one saved in the report
        #[arg(long)]
        baseline: Option<PathBuf>,
    },

    /// Print the fixture battery and its digest
    Battery {
        #[command(flatten)]
        fixtures: FixtureArgs,
    },
}

#[derive(Args, Clone)]
struct ConnectionArgs {
    /// Quote service deployment
    #[arg(long, env = "REMIT_ETA_ENV", default_value = "sandbox")]
    env: ProbeEnvironment,

    /// Override the deployment's base URL
    #[arg(long, env = "REMIT_ETA_BASE_URL")]
    base_url: Option<String>,

    /// HTTP Basic client id
    #[arg(long, env = "REMIT_ETA_CLIENT_ID", default_value = "")]
    client_id: String,

    /// HTTP Basic client secret
    #[arg(
        long,
        env = "REMIT_ETA_CLIENT_SECRET",
        default_value = "",
        hide_env_values = true
    )]
    client_secret: String,

    /// Per-request timeout in seconds
    #[arg(
        long,
        env = "REMIT_ETA_TIMEOUT_SECS",
        default_value_t = remit_eta_client::config::DEFAULT_TIMEOUT_SECS
    )]
    timeout_secs: u64,

    /// Rate type requested with each quote
    #[arg(long, default_value = remit_eta_client::config::DEFAULT_RATE_TYPE)]
    rate_type: String,
}

impl ConnectionArgs {
    fn quote_config(&self) -> QuoteConfig {
        let config = match &self.base_url {
            Some(url) => QuoteConfig::new(url),
            None => QuoteConfig::for_environment(self.env),
        };
        config
            .with_credentials(&self.client_id, &self.client_secret)
            .with_timeout_secs(self.timeout_secs)
            .with_rate_type(&self.rate_type)
    }
}

#[derive(Args, Debug, Clone, Default)]
struct FixtureArgs {
    /// Test cases JSON array (default: built-in battery)
    #[arg(long)]
    cases: Option<PathBuf>,

    /// Payment methods JSON array (default: built-in methods)
    #[arg(long)]
    methods: Option<PathBuf>,
}

impl FixtureArgs {
    fn battery(&self) -> Result<Battery> {
        let mut battery = Battery::default();
        if let Some(path) = &self.cases {
            battery = battery
                .with_cases_file(path)
                .with_context(|| format!("Failed to load test cases from {:?}", path))?;
        }
        if let Some(path) = &self.methods {
            battery = battery
                .with_methods_file(path)
                .with_context(|| format!("Failed to load payment methods from {:?}", path))?;
        }
        battery.validate().context("Invalid fixture battery")?;
        Ok(battery)
    }
}

fn load_baseline(path: Option<&Path>) -> Result<BaselineTable> {
    match path {
        Some(path) => BaselineTable::from_json_file(path)
            .with_context(|| format!("Failed to load baseline table from {:?}", path)),
        None => Ok(BaselineTable::reference()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    remit_eta_core::init_tracing(cli.json, level);

    match cli.command {
        Commands::Run {
            connection,
            fixtures,
            baseline,
            out_dir,
            no_write,
            details,
        } => {
            let options = RunOptions {
                baseline,
                out_dir,
                no_write,
                details,
            };
            cmd_run(&connection, &fixtures, &options).await
        }
        Commands::Validate { connection } => cmd_validate(&connection).await,
        Commands::Baseline { baseline } => cmd_baseline(baseline.as_deref()),
        Commands::Analyze { report, baseline } => cmd_analyze(&report, baseline.as_deref()),
        Commands::Battery { fixtures } => cmd_battery(&fixtures),
    }
}

/// Output and baseline choices for `run`.
struct RunOptions {
    baseline: Option<PathBuf>,
    out_dir: PathBuf,
    no_write: bool,
    details: bool,
}

async fn cmd_run(
    connection: &ConnectionArgs,
    fixtures: &FixtureArgs,
    options: &RunOptions,
) -> Result<()> {
    let battery = fixtures.battery()?;
    let baseline = load_baseline(options.baseline.as_deref())?;
    let quote_config = connection.quote_config();
    let client =
        QuoteClient::new(quote_config.clone()).context("Failed to build quote client")?;

    ExperimentRunner::validate(&client)
        .await
        .context("Refusing to start the run")?;

    let spec = BatterySpec::new(&battery);
    info!(
        base_url = %quote_config.base_url,
        battery = %spec.short(),
        combinations = battery.combinations(),
        "Starting run"
    );

    let run_config = RunConfig::from_quote_config(&quote_config, baseline.clone());
    let run =
        ExperimentRunner::run(&client, &run_config, &battery.cases, &battery.methods).await;
    let report = run.into_report(&baseline);

    print!("{}", render_console_report(&report.analysis));
    if options.details {
        println!();
        print!("{}", render_outcomes(&report.outcomes));
    }
    println!();
    println!(
        "Run {}: {}/{} quotes succeeded in {}ms",
        report.run_id,
        report.total_outcomes - report.failed_outcomes,
        report.total_outcomes,
        report.duration_ms
    );

    if !options.no_write {
        persist_reports(&options.out_dir, &report, &baseline);
    }
    Ok(())
}

/// Write both report files; failures are logged, never fatal.
fn persist_reports(out_dir: &Path, report: &RunReport, baseline: &BaselineTable) {
    let _span = RunSpan::enter(&report.run_id.to_string());

    match write_full_report(out_dir, report, Utc::now()) {
        Ok(path) => println!("Full report: {}", path.display()),
        Err(e) => emit_report_write_error("full", &e),
    }

    let simplified = simplify(&report.outcomes, baseline);
    match write_simplified_report(out_dir, &simplified) {
        Ok(path) => println!("Simplified report: {}", path.display()),
        Err(e) => emit_report_write_error("simplified", &e),
    }
}

fn render_outcomes(outcomes: &[ExperimentOutcome]) -> String {
    let mut out = String::from("## Outcomes\n");
    for outcome in outcomes {
        let detail = match (&outcome.delivery_estimate, &outcome.error) {
            (_, Some(error)) => format!("FAILED: {}", error),
            (Some(estimate), None) => format!(
                "{} / {} [{}]",
                estimate.display_text,
                estimate.arrival_date,
                source_label(estimate.source_kind)
            ),
            (None, None) => "no estimate".to_string(),
        };
        out.push_str(&format!(
            "- {} {:.2} {}: {}\n",
            outcome.case.pair_key(),
            outcome.case.amount,
            outcome.method,
            detail
        ));
    }
    out
}

async fn cmd_validate(connection: &ConnectionArgs) -> Result<()> {
    let quote_config = connection.quote_config();
    let client =
        QuoteClient::new(quote_config.clone()).context("Failed to build quote client")?;

    ExperimentRunner::validate(&client)
        .await
        .context("Credential validation failed")?;

    println!("✓ Credentials accepted by {}", quote_config.base_url);
    Ok(())
}

fn cmd_baseline(path: Option<&Path>) -> Result<()> {
    let baseline = load_baseline(path)?;
    print!("{}", render_baseline(&baseline));
    Ok(())
}

fn render_baseline(baseline: &BaselineTable) -> String {
    let mut out = format!(
        "{:<12} {:>6}  {:<28} {}\n",
        "Pair", "Hours", "Description", "Sample arrival"
    );
    for (pair, entry) in baseline.iter() {
        out.push_str(&format!(
            "{:<12} {:>6}  {:<28} {}\n",
            pair, entry.hours, entry.description, entry.sample_arrival_date
        ));
    }
    out
}

fn cmd_analyze(path: &Path, baseline: Option<&Path>) -> Result<()> {
    let report = load_full_report(path)
        .with_context(|| format!("Failed to load report from {:?}", path))?;

    let analysis = match baseline {
        Some(p) => analyze(&report.outcomes, &load_baseline(Some(p))?),
        None => analyze(&report.outcomes, &report.analysis.baseline),
    };

    println!(
        "Run {} ({} outcomes, {} failed, battery {})",
        report.run_id,
        report.total_outcomes,
        report.failed_outcomes,
        short_digest(&report.battery_digest)
    );
    println!();
    print!("{}", render_console_report(&analysis));
    Ok(())
}

fn short_digest(digest: &str) -> &str {
    digest.get(..12).unwrap_or(digest)
}

fn cmd_battery(fixtures: &FixtureArgs) -> Result<()> {
    let battery = fixtures.battery()?;
    let spec = BatterySpec::new(&battery);

    println!("Battery digest: {}", spec.digest);
    println!();
    println!("Cases ({}):", battery.cases.len());
    for case in &battery.cases {
        println!("  {} {:.2}", case.pair_key(), case.amount);
    }
    println!();
    println!("Methods ({}):", battery.methods.len());
    for method in &battery.methods {
        println!(
            "  {} (pay-in: {}, pay-out: {})",
            method.label,
            method.pay_in.as_deref().unwrap_or("any"),
            method.pay_out.as_deref().unwrap_or("any")
        );
    }
    println!();
    println!("Combinations: {}", battery.combinations());
    Ok(())
}
