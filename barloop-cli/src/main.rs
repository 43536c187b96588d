//! barloop CLI — run a backtest over a directory of per-symbol CSV files.
//!
//! Commands:
//! - `run` — execute a backtest and print summary statistics, optionally
//!   writing the equity report to CSV and the summary to JSON.

use anyhow::{bail, Result};
use barloop_core::execution::CommissionModel;
use barloop_runner::report::write_summary_json;
use barloop_runner::runner::DAILY_PERIODS;
use barloop_runner::{run_backtest, BacktestRun, RunConfig, StrategyKind};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "barloop", about = "Event-driven backtesting engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    BuyAndHold,
    MaCross,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a backtest over `{data_dir}/{SYMBOL}.csv` files.
    Run {
        /// Directory containing one CSV file per symbol.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Symbols to trade (e.g., AAPL MSFT).
        #[arg(required = true)]
        symbols: Vec<String>,

        /// Initial capital.
        #[arg(long, default_value_t = 100_000.0)]
        capital: f64,

        /// Strategy to run.
        #[arg(long, value_enum, default_value_t = StrategyArg::BuyAndHold)]
        strategy: StrategyArg,

        /// Short moving-average window (ma-cross only).
        #[arg(long, default_value_t = 100)]
        short_window: usize,

        /// Long moving-average window (ma-cross only).
        #[arg(long, default_value_t = 400)]
        long_window: usize,

        /// Flat commission per order; omit for the per-share broker schedule.
        #[arg(long)]
        flat_commission: Option<f64>,

        /// Sleep between bars, in milliseconds.
        #[arg(long, default_value_t = 0)]
        heartbeat_ms: u64,

        /// Write the equity report CSV here.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write summary statistics JSON here.
        #[arg(long)]
        summary: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            data_dir,
            symbols,
            capital,
            strategy,
            short_window,
            long_window,
            flat_commission,
            heartbeat_ms,
            output,
            summary,
        } => {
            if capital <= 0.0 {
                bail!("--capital must be positive");
            }
            let config = RunConfig {
                data_dir,
                symbols,
                initial_capital: capital,
                strategy: match strategy {
                    StrategyArg::BuyAndHold => StrategyKind::BuyAndHold,
                    StrategyArg::MaCross => StrategyKind::MaCross {
                        short: short_window,
                        long: long_window,
                    },
                },
                commission: match flat_commission {
                    Some(fee) => CommissionModel::Flat(fee),
                    None => CommissionModel::default(),
                },
                heartbeat: Duration::from_millis(heartbeat_ms),
                periods: DAILY_PERIODS,
            };

            let run = run_backtest(&config)?;
            print_summary(&run);

            if let Some(path) = output {
                run.report.write_csv(&path)?;
                println!("equity report written to {}", path.display());
            }
            if let Some(path) = summary {
                write_summary_json(&path, &run.summary)?;
                println!("summary written to {}", path.display());
            }
            Ok(())
        }
    }
}

fn print_summary(run: &BacktestRun) {
    println!("Final equity:      {:.2}", run.final_total);
    println!("Total return:      {:.2}%", run.summary.total_return_pct);
    println!("Sharpe ratio:      {:.2}", run.summary.sharpe);
    println!("Max drawdown:      {:.2}%", run.summary.max_drawdown_pct);
    println!(
        "Drawdown duration: {} bars",
        run.summary.max_drawdown_duration
    );
    println!(
        "Bars: {}  Signals: {}  Orders: {}  Fills: {}",
        run.counters.bars, run.counters.signals, run.counters.orders, run.counters.fills
    );
}
