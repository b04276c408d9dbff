// In crates/analytics/src/trend.rs

use core_types::{Error, Result, Trend, TrendResult};

/// Dead zone around a zero slope, in price units per sample.
///
/// The threshold is absolute, so a $5 stock and a $500 stock are judged
/// with the same sensitivity.
pub const TREND_EPSILON: f64 = 0.01;

const MIN_POINTS: usize = 2;

/// Ordinary least squares slope of `values` against their index.
///
/// Fails with `InsufficientData` for fewer than two points and with
/// `Validation` if any value is NaN or infinite.
pub fn linear_slope(values: &[f64]) -> Result<f64> {
    if values.len() < MIN_POINTS {
        return Err(Error::InsufficientData {
            required: MIN_POINTS,
            actual: values.len(),
        });
    }
    if let Some(i) = values.iter().position(|v| !v.is_finite()) {
        return Err(Error::validation(format!(
            "series value at index {} is not a finite number",
            i
        )));
    }

    let n = values.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = values.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut variance = 0.0;
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        covariance += dx * (y - y_mean);
        variance += dx * dx;
    }

    // variance > 0 whenever n >= 2
    Ok(covariance / variance)
}

/// Fits a line through a moving-average series (oldest first) and labels it.
pub fn classify_trend(values: &[f64]) -> Result<TrendResult> {
    let slope = linear_slope(values)?;

    let trend = if slope < -TREND_EPSILON {
        Trend::Declining
    } else if slope > TREND_EPSILON {
        Trend::Incline
    } else {
        Trend::Parallel
    };

    Ok(TrendResult {
        trend,
        slope,
        values: values.to_vec(),
    })
}
