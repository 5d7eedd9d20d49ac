//! Cadiz CLI binary.
//!
//! Runs the factor backtest pipeline on deterministic synthetic data so
//! the whole flow can be exercised without a data vendor.

mod data;

use std::collections::HashMap;
use std::process;

use anyhow::Result;
use clap::{Parser, Subcommand};

use cadiz::pipeline::{run, RunConfig};
use cadiz_eval::QuantileConfig;
use cadiz_signals::registry::{available_signals, SignalCategory};

use crate::data::SyntheticProvider;

#[derive(Parser)]
#[command(name = "cadiz")]
#[command(about = "Cross-sectional equity factor backtesting", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available factor signals
    Signals {
        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,

        /// Show detailed information
        #[arg(short, long)]
        verbose: bool,
    },

    /// Run the factor backtest pipeline
    Backtest {
        /// Ticker symbols (defaults to a built-in demo universe)
        #[arg(short, long, value_delimiter = ',')]
        symbols: Vec<String>,

        /// Start date (YYYY-MM-DD)
        #[arg(long, default_value = "2018-01-01")]
        start: String,

        /// End date (YYYY-MM-DD)
        #[arg(long, default_value = "2023-12-31")]
        end: String,

        /// Combination method (equal_weight, rank_sum, custom)
        #[arg(short, long, default_value = "equal_weight")]
        method: String,

        /// Factor weights for the custom method, e.g. momentum=0.6,earnings_yield=0.4
        #[arg(short, long)]
        weights: Option<String>,

        /// Fraction of the cross-section held long
        #[arg(long, default_value = "0.2")]
        long_pct: f64,

        /// Fraction of the cross-section held short
        #[arg(long, default_value = "0.0")]
        short_pct: f64,

        /// Minimum scored assets per rebalance
        #[arg(long, default_value = "20")]
        min_breadth: usize,

        /// Benchmark symbol
        #[arg(short, long, default_value = "SPY")]
        benchmark: String,

        /// Seed for the synthetic universe
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

fn main() {
    if let Err(e) = dispatch() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn dispatch() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Signals { category, verbose } => list_signals(category.as_deref(), verbose),
        Commands::Backtest {
            symbols,
            start,
            end,
            method,
            weights,
            long_pct,
            short_pct,
            min_breadth,
            benchmark,
            seed,
            format,
        } => run_backtest(&BacktestArgs {
            symbols,
            start,
            end,
            method,
            weights,
            long_pct,
            short_pct,
            min_breadth,
            benchmark,
            seed,
            format,
        }),
    }
}

struct BacktestArgs {
    symbols: Vec<String>,
    start: String,
    end: String,
    method: String,
    weights: Option<String>,
    long_pct: f64,
    short_pct: f64,
    min_breadth: usize,
    benchmark: String,
    seed: u64,
    format: String,
}

fn list_signals(category: Option<&str>, verbose: bool) -> Result<()> {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                    Available Signals                         ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    let categories = [
        (SignalCategory::Momentum, "Momentum"),
        (SignalCategory::Volatility, "Volatility"),
        (SignalCategory::Value, "Value"),
        (SignalCategory::Quality, "Quality"),
    ];

    for (cat, cat_name) in categories {
        if let Some(filter) = category
            && !cat_name.to_lowercase().contains(&filter.to_lowercase())
        {
            continue;
        }

        println!("{cat_name}:");
        println!("{}", "-".repeat(60));
        for info in available_signals().iter().filter(|i| i.category == cat) {
            if verbose {
                let fundamentals = if info.requires_fundamentals {
                    " (needs fundamentals)"
                } else {
                    ""
                };
                println!("  {:22} - {}{}", info.name, info.description, fundamentals);
            } else {
                println!("  {}", info.name);
            }
        }
        println!();
    }

    if !verbose {
        println!("Use --verbose for signal descriptions.\n");
    }

    Ok(())
}

/// The built-in demo universe.
fn default_universe() -> Vec<String> {
    [
        "AAPL", "MSFT", "GOOGL", "AMZN", "META", "NVDA", "TSLA", "UNH", "JPM", "V", "XOM",
        "JNJ", "WMT", "PG", "MA", "HD", "CVX", "ABBV", "PFE", "KO", "PEP", "COST", "MRK",
        "BAC", "ADBE",
    ]
    .iter()
    .map(|s| (*s).to_string())
    .collect()
}

fn parse_weights(spec: &str) -> Result<HashMap<String, f64>> {
    let mut weights = HashMap::new();
    for pair in spec.split(',') {
        let (name, value) = pair
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("invalid weight '{pair}', expected name=value"))?;
        let value: f64 = value
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid weight value in '{pair}': {e}"))?;
        weights.insert(name.trim().to_string(), value);
    }
    Ok(weights)
}

fn run_backtest(args: &BacktestArgs) -> Result<()> {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                    Factor Backtest                           ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    let symbols = if args.symbols.is_empty() {
        default_universe()
    } else {
        args.symbols.clone()
    };

    println!("Universe:  {} symbols", symbols.len());
    println!("Period:    {} to {}", args.start, args.end);
    println!("Method:    {}", args.method);
    println!("Quantile:  long {:.0}%, short {:.0}%", args.long_pct * 100.0, args.short_pct * 100.0);
    println!("Benchmark: {}", args.benchmark);
    println!("Seed:      {}", args.seed);
    println!();

    let start = data::parse_date(&args.start)?;
    let end = data::parse_date(&args.end)?;

    let mut config = RunConfig::new(symbols, start, end);
    config.quantile = QuantileConfig {
        long_pct: args.long_pct,
        short_pct: args.short_pct,
        min_breadth: args.min_breadth,
    };
    config.combine_method = args.method.clone();
    config.combine_weights = args
        .weights
        .as_deref()
        .map(parse_weights)
        .transpose()?;
    config.benchmark_symbol = args.benchmark.clone();

    println!("Generating synthetic universe and running pipeline...");
    let provider = SyntheticProvider::new(args.seed);
    let results = run(&config, &provider, &provider)?;
    println!();

    if args.format == "json" {
        let payload = serde_json::json!({
            "summary": results.summary,
            "dropped_symbols": results.dropped_symbols,
            "notes": results.notes,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    if !results.notes.is_empty() {
        println!("Diagnostics:");
        for note in &results.notes {
            println!("  - {note}");
        }
        println!();
    }

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("PERFORMANCE SUMMARY");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    println!("{}", results.summary.to_ascii_table());

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("RETURN CORRELATIONS");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    println!("{}", results.correlations.to_ascii_table());

    Ok(())
}
