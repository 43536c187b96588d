//! Performance metrics — pure functions that compute strategy statistics.
//!
//! Every metric is a pure function: return series or equity curve in, scalars
//! out. No dependency on the engine or the reporting layer.

/// Period returns of a value series: `v[i] / v[i-1] - 1`, one entry per
/// input point with the first pinned at 0.0.
pub fn pct_returns(values: &[f64]) -> Vec<f64> {
    let mut returns = Vec::with_capacity(values.len());
    for (i, &value) in values.iter().enumerate() {
        if i == 0 || values[i - 1] == 0.0 {
            returns.push(0.0);
        } else {
            returns.push(value / values[i - 1] - 1.0);
        }
    }
    returns
}

/// Growth-of-one-unit curve: cumulative product of `1 + r`.
pub fn cumulative_curve(returns: &[f64]) -> Vec<f64> {
    let mut curve = Vec::with_capacity(returns.len());
    let mut acc = 1.0;
    for &r in returns {
        acc *= 1.0 + r;
        curve.push(acc);
    }
    curve
}

/// Annualized Sharpe ratio over excess returns, with the risk-free rate
/// taken as zero.
///
/// Sharpe = mean(returns) / std(returns) * sqrt(periods). `periods` is the
/// number of return observations per year (252 for daily bars, 252*6.5*60
/// for minutely). Returns 0.0 for a flat or too-short series.
pub fn sharpe_ratio(returns: &[f64], periods: f64) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }
    let mean = mean(returns);
    let std = std_dev(returns);
    if std < 1e-15 {
        return 0.0;
    }
    (mean / std) * periods.sqrt()
}

/// Drawdown series plus its worst depth and longest duration.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawdownProfile {
    /// Per-point drop below the running high-water mark, in the curve's
    /// own units (a fraction of starting capital for a growth-of-one
    /// curve).
    pub series: Vec<f64>,
    /// Deepest drawdown observed.
    pub max_drawdown: f64,
    /// Longest run of consecutive periods spent below a prior peak.
    pub max_duration: usize,
}

/// Walk the equity curve with a running high-water mark. Drawdown at each
/// point is `hwm - equity`, not normalized by the peak.
pub fn drawdowns(equity_curve: &[f64]) -> DrawdownProfile {
    let mut series = Vec::with_capacity(equity_curve.len());
    let mut hwm = f64::MIN;
    let mut max_drawdown = 0.0_f64;
    let mut duration = 0usize;
    let mut max_duration = 0usize;

    for &equity in equity_curve {
        if equity > hwm {
            hwm = equity;
        }
        let dd = hwm - equity;
        series.push(dd);

        if dd > 0.0 {
            duration += 1;
        } else {
            duration = 0;
        }
        max_drawdown = max_drawdown.max(dd);
        max_duration = max_duration.max(duration);
    }

    DrawdownProfile {
        series,
        max_drawdown,
        max_duration,
    }
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (n denominator).
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}
