//! QuantLab CLI — run, batch, and demo commands.
//!
//! Commands:
//! - `run` — execute one backtest from a TOML config over a CSV data directory
//! - `batch` — execute every TOML config in a directory on a worker pool
//! - `demo` — run a named strategy over deterministic synthetic data

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use quantlab_core::config::{MaKind, StrategyConfig};
use quantlab_core::data::{CsvProvider, MemorySentimentFeed, SentimentItem, SyntheticProvider};
use quantlab_core::sim::FillPolicy;
use quantlab_runner::{run_batch, save_artifacts, BacktestResult, Backtester, RunConfig};

#[derive(Parser)]
#[command(name = "quantlab", about = "QuantLab CLI — strategy backtesting engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a backtest from a TOML config file.
    Run {
        /// Path to a TOML run config.
        #[arg(long)]
        config: PathBuf,

        /// Directory of {SYMBOL}.csv price files.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Optional JSON file of sentiment items, keyed by symbol.
        /// Required by the sentiment_analysis strategy.
        #[arg(long)]
        sentiment: Option<PathBuf>,

        /// Output directory for the result JSON.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,
    },
    /// Execute every TOML config in a directory on a worker pool.
    Batch {
        /// Directory of TOML run configs.
        #[arg(long)]
        config_dir: PathBuf,

        /// Directory of {SYMBOL}.csv price files.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Worker threads. Defaults to the rayon global pool size.
        #[arg(long)]
        threads: Option<usize>,

        /// Output directory for result JSON files.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,
    },
    /// Run a named strategy over deterministic synthetic data.
    Demo {
        /// Strategy: ma_crossover, bollinger, momentum, mean_reversion, breakout.
        #[arg(long, default_value = "ma_crossover")]
        strategy: String,

        /// Symbols to simulate.
        #[arg(long, default_values_t = vec!["SPY".to_string()])]
        symbols: Vec<String>,

        /// Start date (YYYY-MM-DD).
        #[arg(long, default_value = "2023-01-02")]
        start: String,

        /// End date (YYYY-MM-DD).
        #[arg(long, default_value = "2024-12-31")]
        end: String,

        /// Seed for the synthetic random walk.
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

fn main() -> Result<()> {
    init_tracing()?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            data_dir,
            sentiment,
            output_dir,
        } => run_cmd(&config, &data_dir, sentiment.as_deref(), &output_dir),
        Commands::Batch {
            config_dir,
            data_dir,
            threads,
            output_dir,
        } => batch_cmd(&config_dir, &data_dir, threads, &output_dir),
        Commands::Demo {
            strategy,
            symbols,
            start,
            end,
            seed,
        } => demo_cmd(&strategy, symbols, &start, &end, seed),
    }
}

fn init_tracing() -> Result<()> {
    let filter = std::env::var("QUANTLAB_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(&filter)
        .with_context(|| format!("invalid QUANTLAB_LOG filter '{filter}'"))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}

fn run_cmd(
    config_path: &Path,
    data_dir: &Path,
    sentiment_path: Option<&Path>,
    output_dir: &Path,
) -> Result<()> {
    let config = load_config(config_path)?;
    let provider = CsvProvider::new(data_dir);

    let result = match sentiment_path {
        Some(path) => {
            let feed = load_sentiment(path)?;
            Backtester::new(&provider)
                .with_sentiment(&feed)
                .run(&config)?
        }
        None => Backtester::new(&provider).run(&config)?,
    };

    print_summary(&result);
    let run_dir = save_artifacts(&result, output_dir)?;
    println!("Artifacts saved to: {}", run_dir.display());
    Ok(())
}

fn batch_cmd(
    config_dir: &Path,
    data_dir: &Path,
    threads: Option<usize>,
    output_dir: &Path,
) -> Result<()> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(config_dir)
        .with_context(|| format!("reading config dir {}", config_dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    paths.sort();
    if paths.is_empty() {
        bail!("no .toml configs in {}", config_dir.display());
    }

    let mut configs = Vec::with_capacity(paths.len());
    for path in &paths {
        configs.push(load_config(path)?);
    }

    let provider = CsvProvider::new(data_dir);
    let results = run_batch(&provider, None::<&MemorySentimentFeed>, &configs, threads);

    let mut failures = 0usize;
    for (path, result) in paths.iter().zip(results) {
        match result {
            Ok(result) => {
                let run_dir = save_artifacts(&result, output_dir)?;
                println!(
                    "{}: return {:+.2}%, {} trades -> {}",
                    path.display(),
                    result.total_return * 100.0,
                    result.total_trades,
                    run_dir.display()
                );
            }
            Err(err) => {
                failures += 1;
                eprintln!("{}: {err}", path.display());
            }
        }
    }
    if failures > 0 {
        bail!("{failures} of {} runs failed", paths.len());
    }
    Ok(())
}

fn demo_cmd(strategy: &str, symbols: Vec<String>, start: &str, end: &str, seed: u64) -> Result<()> {
    let config = RunConfig {
        symbols,
        start: parse_date(start)?,
        end: parse_date(end)?,
        strategy: demo_strategy(strategy)?,
        initial_capital: 100_000.0,
        shares_per_trade: 100,
        fill_policy: FillPolicy::Close,
    };

    let provider = SyntheticProvider::new(seed);
    let result = Backtester::new(&provider).run(&config)?;
    print_summary(&result);
    Ok(())
}

fn demo_strategy(name: &str) -> Result<StrategyConfig> {
    // The sentiment strategy is omitted: it needs an external feed, which
    // the synthetic provider does not supply.
    let config = match name {
        "ma_crossover" => StrategyConfig::MovingAverageCrossover {
            fast_window: 10,
            slow_window: 50,
            ma_kind: MaKind::Sma,
        },
        "bollinger" => StrategyConfig::BollingerBands {
            window: 20,
            multiplier: 2.0,
        },
        "momentum" => StrategyConfig::Momentum {
            rsi_window: 14,
            momentum_window: 10,
            oversold: 30.0,
            overbought: 70.0,
            threshold: 0.02,
        },
        "mean_reversion" => StrategyConfig::MeanReversion {
            window: 20,
            threshold: 0.05,
        },
        "breakout" => StrategyConfig::Breakout {
            lookback_window: 20,
            breakout_threshold: 0.01,
            min_volume_ratio: 1.5,
            confirmation_period: 2,
        },
        _ => bail!(
            "unknown strategy '{name}'. Valid: ma_crossover, bollinger, momentum, mean_reversion, breakout"
        ),
    };
    Ok(config)
}

fn load_config(path: &Path) -> Result<RunConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: RunConfig =
        toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))?;
    Ok(config)
}

fn load_sentiment(path: &Path) -> Result<MemorySentimentFeed> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading sentiment file {}", path.display()))?;
    let by_symbol: HashMap<String, Vec<SentimentItem>> =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
    let mut feed = MemorySentimentFeed::new();
    for (symbol, items) in by_symbol {
        feed.insert(symbol, items);
    }
    Ok(feed)
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{s}' (expected YYYY-MM-DD)"))
}

fn print_summary(result: &BacktestResult) {
    println!();
    println!("=== Backtest Result ===");
    println!("Run ID:         {}", &result.run_id[..16]);
    println!("Strategy:       {}", result.config.strategy.strategy_type());
    println!("Symbols:        {}", result.config.symbols.join(", "));
    println!(
        "Period:         {} to {}",
        result.config.start, result.config.end
    );
    println!("Trades:         {}", result.total_trades);
    println!();
    println!("--- Performance ---");
    println!("Total Return:   {:.2}%", result.total_return * 100.0);
    println!("CAGR:           {:.2}%", result.cagr * 100.0);
    println!("Sharpe:         {:.3}", result.sharpe_ratio);
    println!("Max Drawdown:   {:.2}%", result.max_drawdown * 100.0);
    println!("Win Rate:       {:.1}%", result.win_rate * 100.0);
    println!("Profit Factor:  {:.2}", result.profit_factor);
    println!("Final Value:    {:.2}", result.final_portfolio_value);
    println!();
}
