//! Result export — JSON, CSV trade tape, and CSV equity curve.
//!
//! All artifacts derive from a finished [`BacktestResult`]; nothing here
//! mutates run state. The JSON form round-trips; the CSV forms are for
//! external analysis tools.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use quantlab_core::domain::{EquityPoint, Trade};

use crate::result::BacktestResult;

/// Serialize a result to pretty JSON.
pub fn export_json(result: &BacktestResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize BacktestResult to JSON")
}

/// Deserialize a result previously written by [`export_json`].
pub fn import_json(json: &str) -> Result<BacktestResult> {
    serde_json::from_str(json).context("failed to deserialize BacktestResult from JSON")
}

/// Export the trade tape as CSV.
///
/// Columns: symbol, action, date, price, quantity, realized_pnl (empty for
/// buys).
pub fn export_trades_csv(trades: &[Trade]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["symbol", "action", "date", "price", "quantity", "realized_pnl"])?;
    for trade in trades {
        wtr.write_record([
            trade.symbol.as_str(),
            &format!("{:?}", trade.action),
            &trade.date.to_string(),
            &format!("{:.4}", trade.price),
            &trade.quantity.to_string(),
            &trade
                .realized_pnl
                .map(|pnl| format!("{pnl:.4}"))
                .unwrap_or_default(),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export the equity curve as CSV with date and value columns.
pub fn export_equity_csv(equity_curve: &[EquityPoint]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "value"])?;
    for point in equity_curve {
        wtr.write_record([&point.date.to_string(), &format!("{:.2}", point.value)])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Save the full artifact set for one run.
///
/// Creates `{output_dir}/{run_id}/` containing `result.json`, `trades.csv`,
/// and `equity.csv`, and returns that directory. An existing directory for
/// the same run ID is overwritten — the ID is content-addressed, so its
/// artifacts are identical.
pub fn save_artifacts(result: &BacktestResult, output_dir: &Path) -> Result<PathBuf> {
    let run_dir = output_dir.join(&result.run_id);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create {}", run_dir.display()))?;

    std::fs::write(run_dir.join("result.json"), export_json(result)?)
        .context("failed to write result.json")?;
    std::fs::write(run_dir.join("trades.csv"), export_trades_csv(&result.trades)?)
        .context("failed to write trades.csv")?;
    std::fs::write(
        run_dir.join("equity.csv"),
        export_equity_csv(&result.equity_curve)?,
    )
    .context("failed to write equity.csv")?;

    Ok(run_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use quantlab_core::domain::Action;

    fn sample_trades() -> Vec<Trade> {
        vec![
            Trade {
                symbol: "SPY".into(),
                action: Action::Buy,
                date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
                price: 103.0,
                quantity: 10,
                realized_pnl: None,
            },
            Trade {
                symbol: "SPY".into(),
                action: Action::Sell,
                date: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
                price: 102.0,
                quantity: 10,
                realized_pnl: Some(-10.0),
            },
        ]
    }

    #[test]
    fn trades_csv_has_header_and_rows() {
        let csv = export_trades_csv(&sample_trades()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "symbol,action,date,price,quantity,realized_pnl"
        );
        assert_eq!(lines[1], "SPY,Buy,2024-01-05,103.0000,10,");
        assert_eq!(lines[2], "SPY,Sell,2024-01-08,102.0000,10,-10.0000");
    }

    #[test]
    fn equity_csv_one_row_per_point() {
        let curve = vec![
            EquityPoint {
                date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
                value: 10_000.0,
            },
            EquityPoint {
                date: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
                value: 9_990.0,
            },
        ];
        let csv = export_equity_csv(&curve).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "2024-01-05,10000.00");
        assert_eq!(lines[2], "2024-01-08,9990.00");
    }

    #[test]
    fn artifacts_written_under_run_id_dir() {
        use quantlab_core::config::{MaKind, StrategyConfig};
        use quantlab_core::sim::FillPolicy;

        let config = crate::config::RunConfig {
            symbols: vec!["SPY".into()],
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
            strategy: StrategyConfig::MovingAverageCrossover {
                fast_window: 2,
                slow_window: 4,
                ma_kind: MaKind::Sma,
            },
            initial_capital: 10_000.0,
            shares_per_trade: 10,
            fill_policy: FillPolicy::Close,
        };
        let result = BacktestResult::new(
            &config,
            crate::metrics::PerformanceMetrics::compute(10_000.0, &[], &[]),
            sample_trades(),
            vec![],
        );

        let dir = tempfile::tempdir().unwrap();
        let run_dir = save_artifacts(&result, dir.path()).unwrap();
        assert!(run_dir.join("result.json").exists());
        assert!(run_dir.join("trades.csv").exists());
        assert!(run_dir.join("equity.csv").exists());

        let reloaded =
            import_json(&std::fs::read_to_string(run_dir.join("result.json")).unwrap()).unwrap();
        assert_eq!(reloaded, result);
    }
}
