use analytics::{CriticalRegion, ProportionZTest, ZTestReport};
use anyhow::Context;
use chart::ChartSpec;
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Table};
use configuration::{ChartSettings, Config};
use core_types::{TailMode, ZTestInput};
use std::path::{Path, PathBuf};

/// The main entry point for the Z-test calculator.
#[tokio::main]
async fn main() {
    // Load ZTEST__* overrides from a .env file, if there is one.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// One-sample Z-test for a proportion, with a chart of the critical region.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (defaults to ./ztest.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the test and print the Z value, the p-value and the verdict.
    // Negative values must reach the range checks rather than being read as flags.
    #[command(allow_negative_numbers = true)]
    Test(TestArgs),
    /// Print the critical value(s) for a significance level.
    #[command(allow_negative_numbers = true)]
    Critical(CriticalArgs),
    /// Serve the interactive calculator form over HTTP.
    Serve(ServeArgs),
}

#[derive(Parser)]
struct TestArgs {
    /// The proportion observed in the sample (p̂), between 0 and 1.
    #[arg(long)]
    observed: Option<f64>,

    /// The proportion expected under the null hypothesis (p₀), between 0 and 1.
    #[arg(long)]
    expected: Option<f64>,

    /// The number of observations in the sample (n).
    #[arg(long)]
    sample_size: Option<u64>,

    /// The significance level (α), e.g. 0.05 for 5%.
    #[arg(long)]
    alpha: Option<f64>,

    /// The alternative hypothesis.
    #[arg(long, value_enum)]
    tail: Option<TailMode>,

    /// Write the chart of the critical region to this SVG file.
    #[arg(long)]
    chart: Option<PathBuf>,

    /// Print the full report as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct CriticalArgs {
    /// The significance level (α).
    #[arg(long)]
    alpha: Option<f64>,

    /// The alternative hypothesis.
    #[arg(long, value_enum)]
    tail: Option<TailMode>,
}

#[derive(Parser)]
struct ServeArgs {
    /// The address to bind (overrides `server.host`).
    #[arg(long)]
    host: Option<String>,

    /// The port to listen on (overrides `server.port`).
    #[arg(long)]
    port: Option<u16>,
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = configuration::load_config(cli.config.as_deref())
        .context("Failed to load configuration")?;
    let _guard = configuration::init_tracing(&config.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Test(args) => handle_test(args, &config),
        Commands::Critical(args) => handle_critical(args, &config),
        Commands::Serve(args) => handle_serve(args, config).await,
    }
}

// ==============================================================================
// Test Command Logic
// ==============================================================================

/// Runs one calculation and prints it; the chart, if requested, is written last so a
/// rendering failure never hides the numeric result.
fn handle_test(args: TestArgs, config: &Config) -> anyhow::Result<()> {
    let defaults = &config.defaults;
    let input = ZTestInput::new(
        args.observed.unwrap_or(defaults.observed_proportion),
        args.expected.unwrap_or(defaults.expected_proportion),
        args.sample_size.unwrap_or(defaults.sample_size),
        args.alpha.unwrap_or(defaults.significance_level),
        args.tail.unwrap_or(defaults.tail_mode),
    );

    let report = ProportionZTest::new().report(&input)?;
    tracing::info!(
        z_value = report.result.z_value,
        p_value = report.result.p_value,
        is_significant = report.result.is_significant,
        "Z-test complete."
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if let Some(path) = args.chart {
        write_chart(&report, &config.chart, &path)
            .with_context(|| format!("Failed to write chart to {}", path.display()))?;
        if !args.json {
            println!("\nChart written to {}", path.display());
        }
    }

    Ok(())
}

fn print_report(report: &ZTestReport) {
    let result = &report.result;
    let input = &report.input;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Metric", "Value"]);
    table.add_row(vec!["Z value".to_string(), format!("{:.6}", result.z_value)]);
    table.add_row(vec!["P-value".to_string(), format!("{:.6}", result.p_value)]);
    table.add_row(vec!["α level".to_string(), input.significance_level.to_string()]);
    table.add_row(vec!["Test type".to_string(), input.tail_mode.to_string()]);
    table.add_row(vec![
        "Standard error".to_string(),
        format!("{:.6}", result.standard_error),
    ]);
    table.add_row(vec![
        "Critical value".to_string(),
        critical_label(&report.critical_region),
    ]);
    table.add_row(vec!["Result".to_string(), report.verdict().to_string()]);

    println!("{table}");
    println!("\nConclusion: {}", report.conclusion);
    println!("\nInterpretation:");
    for line in &report.interpretation {
        println!("  - {line}");
    }
}

fn write_chart(report: &ZTestReport, settings: &ChartSettings, path: &Path) -> anyhow::Result<()> {
    let spec = ChartSpec::new(report.result.z_value, report.critical_region)
        .with_size(settings.width, settings.height)
        .with_samples(settings.samples)
        .with_x_range(settings.x_min, settings.x_max);
    let svg = chart::render_svg(&spec)?;
    std::fs::write(path, svg)?;
    tracing::debug!(path = %path.display(), "Chart written.");
    Ok(())
}

// ==============================================================================
// Critical / Serve Command Logic
// ==============================================================================

fn handle_critical(args: CriticalArgs, config: &Config) -> anyhow::Result<()> {
    let alpha = args.alpha.unwrap_or(config.defaults.significance_level);
    let tail = args.tail.unwrap_or(config.defaults.tail_mode);

    let region = ProportionZTest::new().critical_region(alpha, tail)?;
    println!("z critical ({tail}, α = {alpha}): {}", critical_label(&region));
    Ok(())
}

async fn handle_serve(args: ServeArgs, mut config: Config) -> anyhow::Result<()> {
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    web_server::run_server(config).await
}

fn critical_label(region: &CriticalRegion) -> String {
    match *region {
        CriticalRegion::TwoSided { upper, .. } => format!("±{upper:.6}"),
        CriticalRegion::Upper { boundary } | CriticalRegion::Lower { boundary } => {
            format!("{boundary:.6}")
        }
    }
}
