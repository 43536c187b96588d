//! Equity report built from the portfolio's holdings history.
//!
//! One row per snapshot, enriched with period returns, a growth-of-one-unit
//! equity curve, and the drawdown series. The report is derived data only; it
//! never feeds back into a simulation.

use crate::metrics::{cumulative_curve, drawdowns, pct_returns, sharpe_ratio};
use anyhow::{Context, Result};
use barloop_core::portfolio::HoldingsSnapshot;
use chrono::NaiveDate;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
pub struct EquityRow {
    pub datetime: NaiveDate,
    pub cash: f64,
    pub commission: f64,
    pub total: f64,
    /// Period return of `total`.
    pub returns: f64,
    /// Growth of one unit of starting capital.
    pub equity_curve: f64,
    /// Drop below the running equity-curve high-water mark, in
    /// growth-of-one units.
    pub drawdown: f64,
}

/// Headline statistics for one run.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryStats {
    pub total_return_pct: f64,
    pub sharpe: f64,
    /// Deepest drawdown as a percentage of starting capital (the equity
    /// curve starts at one).
    pub max_drawdown_pct: f64,
    /// Longest stretch of periods spent below a prior equity peak.
    pub max_drawdown_duration: usize,
}

#[derive(Debug, Clone)]
pub struct EquityReport {
    pub rows: Vec<EquityRow>,
}

impl EquityReport {
    /// Derive returns, equity curve, and drawdowns from holdings snapshots.
    /// The first snapshot (initial capital) pins returns at zero.
    pub fn from_holdings(holdings: &[HoldingsSnapshot]) -> Self {
        let totals: Vec<f64> = holdings.iter().map(|h| h.total).collect();
        let returns = pct_returns(&totals);
        let curve = cumulative_curve(&returns);
        let profile = drawdowns(&curve);

        let rows = holdings
            .iter()
            .enumerate()
            .map(|(i, snapshot)| EquityRow {
                datetime: snapshot.datetime,
                cash: snapshot.cash,
                commission: snapshot.commission,
                total: snapshot.total,
                returns: returns[i],
                equity_curve: curve[i],
                drawdown: profile.series[i],
            })
            .collect();

        Self { rows }
    }

    /// `periods` is return observations per year, 252 for daily bars.
    pub fn summary(&self, periods: f64) -> SummaryStats {
        let returns: Vec<f64> = self.rows.iter().map(|r| r.returns).collect();
        let curve: Vec<f64> = self.rows.iter().map(|r| r.equity_curve).collect();
        let profile = drawdowns(&curve);
        let final_equity = curve.last().copied().unwrap_or(1.0);

        SummaryStats {
            total_return_pct: (final_equity - 1.0) * 100.0,
            sharpe: sharpe_ratio(&returns, periods),
            max_drawdown_pct: profile.max_drawdown * 100.0,
            max_drawdown_duration: profile.max_duration,
        }
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut file = File::create(path)
            .with_context(|| format!("failed to create equity CSV {}", path.display()))?;
        writeln!(
            file,
            "datetime,cash,commission,total,returns,equity_curve,drawdown"
        )?;
        for row in &self.rows {
            writeln!(
                file,
                "{},{:.4},{:.4},{:.4},{:.8},{:.8},{:.8}",
                row.datetime,
                row.cash,
                row.commission,
                row.total,
                row.returns,
                row.equity_curve,
                row.drawdown
            )?;
        }
        Ok(())
    }
}

pub fn write_summary_json(path: &Path, summary: &SummaryStats) -> Result<()> {
    let json = serde_json::to_string_pretty(summary).context("failed to serialize summary")?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write summary JSON {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn snapshot(day: u32, total: f64) -> HoldingsSnapshot {
        HoldingsSnapshot {
            datetime: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            market_values: HashMap::new(),
            cash: total,
            commission: 0.0,
            total,
        }
    }

    #[test]
    fn rows_mirror_snapshots() {
        let report = EquityReport::from_holdings(&[
            snapshot(1, 100_000.0),
            snapshot(2, 110_000.0),
            snapshot(3, 99_000.0),
        ]);

        assert_eq!(report.rows.len(), 3);
        assert_eq!(report.rows[0].returns, 0.0);
        assert!((report.rows[1].returns - 0.10).abs() < 1e-12);
        assert!((report.rows[1].equity_curve - 1.10).abs() < 1e-12);
        assert!(report.rows[2].drawdown > 0.0);
    }

    #[test]
    fn summary_total_return_matches_curve() {
        let report =
            EquityReport::from_holdings(&[snapshot(1, 100_000.0), snapshot(2, 120_000.0)]);
        let summary = report.summary(252.0);
        assert!((summary.total_return_pct - 20.0).abs() < 1e-9);
        assert_eq!(summary.max_drawdown_pct, 0.0);
        assert_eq!(summary.max_drawdown_duration, 0);
    }

    #[test]
    fn derivation_is_idempotent() {
        let snapshots = [
            snapshot(1, 100_000.0),
            snapshot(2, 105_000.0),
            snapshot(3, 103_000.0),
        ];
        let a = EquityReport::from_holdings(&snapshots);
        let b = EquityReport::from_holdings(&snapshots);
        for (x, y) in a.rows.iter().zip(&b.rows) {
            assert_eq!(x.total, y.total);
            assert_eq!(x.equity_curve, y.equity_curve);
            assert_eq!(x.drawdown, y.drawdown);
        }
    }

    #[test]
    fn csv_round_trips_row_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("equity.csv");
        let report =
            EquityReport::from_holdings(&[snapshot(1, 100_000.0), snapshot(2, 101_000.0)]);

        report.write_csv(&path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 3); // header + two rows
        assert!(contents.starts_with("datetime,cash,commission,total"));
    }

    #[test]
    fn summary_json_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        let report =
            EquityReport::from_holdings(&[snapshot(1, 100_000.0), snapshot(2, 101_000.0)]);

        write_summary_json(&path, &report.summary(252.0)).unwrap();
        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(parsed["total_return_pct"].is_number());
    }
}
