use anyhow::Context;
use api_client::YahooClient;
use charts::ChartArtifacts;
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Table};
use configuration::{Config, LogLevel};
use core_types::{DatedSeries, Instrument};
use engine::{ChartSet, DrawdownPipeline};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// The main entry point for the drawdown chart application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; it only carries overrides.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => configuration::load_config_from(path),
        None => configuration::load_config(),
    }
    .context("Failed to load configuration")?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    let _guard = configuration::init_tracing(&config.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Chart(args) => handle_chart(args, &config).await,
        Commands::Instruments => {
            print_instruments();
            Ok(())
        }
        Commands::Serve(args) => {
            if let Some(host) = args.host {
                config.server.host = host;
            }
            if let Some(port) = args.port {
                config.server.port = port;
            }
            web_server::run_server(&config).await
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Price and drawdown charts for a fixed set of stock indices and ETFs.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Read settings from this TOML file instead of ./config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log verbosity when RUST_LOG is not set.
    #[arg(long, value_enum, global = true)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch an instrument and write its price and drawdown charts.
    Chart(ChartArgs),
    /// List the supported instruments.
    Instruments,
    /// Run the web server.
    Serve(ServeArgs),
}

#[derive(Parser)]
struct ChartArgs {
    /// The instrument key (see `instruments`).
    #[arg(long, default_value = "sp500")]
    instrument: String,

    /// The first date to fetch (format: YYYY-MM-DD).
    #[arg(long, default_value = "2024-01-01")]
    start_date: String,

    /// Where to write the PNG files; defaults to the configured output directory.
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

#[derive(Parser)]
struct ServeArgs {
    #[arg(long)]
    host: Option<String>,

    #[arg(long)]
    port: Option<u16>,
}

// ==============================================================================
// Chart Command Logic
// ==============================================================================

/// Handles the orchestration of a single chart run.
async fn handle_chart(args: ChartArgs, config: &Config) -> anyhow::Result<()> {
    let source = YahooClient::new(&config.provider)?;
    let pipeline = DrawdownPipeline::new(Arc::new(source));

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!("Fetching {} from {}...", args.instrument, args.start_date));

    let result = pipeline.run_request(&args.instrument, &args.start_date).await;
    spinner.finish_and_clear();
    let chart_set = result?;

    if chart_set.is_empty() {
        println!(
            "No data available for {} from {}; no charts were written.",
            chart_set.instrument.display_name(),
            chart_set.start_date
        );
        return Ok(());
    }

    let out_dir = args.out_dir.unwrap_or_else(|| config.charts.output_dir.clone());
    let artifacts = ChartArtifacts::new(out_dir, (config.charts.width, config.charts.height));
    for figure in chart_set.figures() {
        let file_name = ChartArtifacts::plain_name(chart_set.instrument, figure.kind);
        let path = artifacts
            .write(figure, &file_name)
            .with_context(|| format!("Failed to write {}", file_name))?;
        println!("Wrote {}", path.display());
    }

    println!("{}", summary_table(&chart_set));
    Ok(())
}

fn summary_table(chart_set: &ChartSet) -> Table {
    let prices = &chart_set.prices;
    let drawdown = &chart_set.drawdown;
    let percent = |value: Option<f64>| {
        value
            .map(|v| format!("{:.2}%", v * 100.0))
            .unwrap_or_default()
    };

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Metric", "Value"]);

    table.add_row(vec![
        "Instrument".to_string(),
        format!(
            "{} ({})",
            chart_set.instrument.display_name(),
            chart_set.instrument.ticker()
        ),
    ]);
    table.add_row(vec!["Trading days".to_string(), prices.len().to_string()]);
    if let Some((first, last)) = prices.date_range() {
        table.add_row(vec!["Period".to_string(), format!("{} to {}", first, last)]);
    }
    if let Some(close) = prices.last() {
        table.add_row(vec!["Last close".to_string(), format!("{:.2}", close.value)]);
    }
    if let Some(high) = prices.max_point() {
        table.add_row(vec![
            "Highest close".to_string(),
            format!("{:.2} on {}", high.value, high.date),
        ]);
    }
    table.add_row(vec![
        "Current drawdown".to_string(),
        percent(drawdown.current().map(|p| p.value)),
    ]);
    if let Some(trough) = drawdown.trough() {
        table.add_row(vec![
            "Maximum drawdown".to_string(),
            format!("{} on {}", percent(Some(trough.value)), trough.date),
        ]);
    }
    table
}

fn print_instruments() {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Key", "Ticker", "Name"]);
    for instrument in Instrument::ALL {
        table.add_row(vec![
            instrument.key(),
            instrument.ticker(),
            instrument.display_name(),
        ]);
    }
    println!("{}", table);
}
