//! Error measures between an observed vector and a prediction, rounded to 5 decimals.

use crate::error::AnalyticsError;
use crate::report::ErrorMetrics;
use crate::stats::{mean, median, round_to};

const METRIC_DECIMALS: i32 = 5;

fn absolute_errors(actual: &[f64], predicted: &[f64]) -> Result<Vec<f64>, AnalyticsError> {
    if actual.len() != predicted.len() {
        return Err(AnalyticsError::ShapeMismatch {
            actual: actual.len(),
            predicted: predicted.len(),
        });
    }
    if actual.is_empty() {
        return Err(AnalyticsError::NotEnoughData(
            "error metrics need at least one observation".to_string(),
        ));
    }
    Ok(actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .collect())
}

pub fn max_absolute_error(actual: &[f64], predicted: &[f64]) -> Result<f64, AnalyticsError> {
    let errors = absolute_errors(actual, predicted)?;
    let max = errors.iter().copied().fold(0.0, f64::max);
    Ok(round_to(max, METRIC_DECIMALS))
}

pub fn median_absolute_error(actual: &[f64], predicted: &[f64]) -> Result<f64, AnalyticsError> {
    let errors = absolute_errors(actual, predicted)?;
    let median = median(&errors).unwrap_or_default();
    Ok(round_to(median, METRIC_DECIMALS))
}

pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> Result<f64, AnalyticsError> {
    let errors = absolute_errors(actual, predicted)?;
    let mean = mean(&errors).unwrap_or_default();
    Ok(round_to(mean, METRIC_DECIMALS))
}

pub fn root_mean_squared_error(actual: &[f64], predicted: &[f64]) -> Result<f64, AnalyticsError> {
    let squared: Vec<f64> = absolute_errors(actual, predicted)?
        .into_iter()
        .map(|e| e * e)
        .collect();
    let mean_squared = mean(&squared).unwrap_or_default();
    Ok(round_to(mean_squared.sqrt(), METRIC_DECIMALS))
}

/// All four metrics at once.
pub fn error_metrics(actual: &[f64], predicted: &[f64]) -> Result<ErrorMetrics, AnalyticsError> {
    Ok(ErrorMetrics {
        max_absolute: max_absolute_error(actual, predicted)?,
        median_absolute: median_absolute_error(actual, predicted)?,
        mean_absolute: mean_absolute_error(actual, predicted)?,
        root_mean_squared: root_mean_squared_error(actual, predicted)?,
    })
}
