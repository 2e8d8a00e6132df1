//! QuantLab Runner — backtest orchestration, metrics, batch runs.
//!
//! The runner wires the core engine together: it fetches bar series from a
//! provider, replays them chronologically through per-symbol strategies and
//! a shared portfolio, and reduces the outcome to a [`BacktestResult`] via
//! pure metric functions. Batch mode executes many independent runs on a
//! rayon pool.

pub mod batch;
pub mod config;
pub mod export;
pub mod metrics;
pub mod orchestrator;
pub mod result;

pub use batch::run_batch;
pub use config::RunConfig;
pub use export::save_artifacts;
pub use orchestrator::{Backtester, CancelToken};
pub use result::BacktestResult;
