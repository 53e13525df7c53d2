//! Yearly return tables: sign counts, spread around the mean, and the ±2 sigma tails.
//!
//! Every function takes returns already in percent form.

use crate::error::AnalyticsError;
use crate::report::{BandSummary, MeanRelativeRow, SignCounts, TailRow};
use crate::stats::{mean, percent_of, sample_std_dev};

/// Width of the tails in standard deviations.
pub const TAIL_SIGMAS: f64 = 2.0;

pub fn count_signed(returns: &[f64]) -> SignCounts {
    returns.iter().fold(SignCounts::default(), |mut counts, r| {
        if *r > 0.0 {
            counts.positive += 1;
        } else if *r < 0.0 {
            counts.negative += 1;
        } else {
            counts.zero += 1;
        }
        counts
    })
}

pub fn mean_relative(year: i32, returns: &[f64]) -> Result<MeanRelativeRow, AnalyticsError> {
    let mu = mean(returns).ok_or(AnalyticsError::EmptyPartition { year })?;
    let trading_days = returns.len();
    let below = returns.iter().filter(|r| **r < mu).count();
    let above = returns.iter().filter(|r| **r > mu).count();

    Ok(MeanRelativeRow {
        year,
        trading_days,
        mu,
        pct_below_mu: percent_of(below, trading_days),
        pct_above_mu: percent_of(above, trading_days),
    })
}

pub fn tail(year: i32, returns: &[f64]) -> Result<TailRow, AnalyticsError> {
    let mu = mean(returns).ok_or(AnalyticsError::EmptyPartition { year })?;
    let trading_days = returns.len();
    let (sigma, degenerate_variance) = match sample_std_dev(returns) {
        Some(sigma) => (sigma, false),
        None => (0.0, true),
    };

    let lower_threshold = mu - TAIL_SIGMAS * sigma;
    let upper_threshold = mu + TAIL_SIGMAS * sigma;
    // Values sitting exactly on a threshold belong to neither tail.
    let below = returns.iter().filter(|r| **r < lower_threshold).count();
    let above = returns.iter().filter(|r| **r > upper_threshold).count();

    Ok(TailRow {
        year,
        trading_days,
        mu,
        sigma,
        lower_threshold,
        upper_threshold,
        pct_below_lower: percent_of(below, trading_days),
        pct_above_upper: percent_of(above, trading_days),
        degenerate_variance,
    })
}

/// Describes the returns strictly between `low` and `high`.
pub fn band(year: i32, returns: &[f64], low: f64, high: f64) -> Result<BandSummary, AnalyticsError> {
    let inside: Vec<f64> = returns
        .iter()
        .copied()
        .filter(|r| *r > low && *r < high)
        .collect();
    let mu = mean(&inside).ok_or(AnalyticsError::EmptyPartition { year })?;
    let signs = count_signed(&inside);

    Ok(BandSummary {
        year,
        low,
        high,
        observations: inside.len(),
        positive_days: signs.positive,
        negative_days: signs.negative,
        mu,
        sigma: sample_std_dev(&inside).unwrap_or(0.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn mean_relative_splits_around_mu() {
        let row = mean_relative(2018, &[1.0, -2.0, 0.0, 3.0, -1.0]).unwrap();
        assert_eq!(row.trading_days, 5);
        assert!((row.mu - 0.2).abs() < 1e-12);
        assert_eq!(row.pct_below_mu, 60.0);
        assert_eq!(row.pct_above_mu, 40.0);
    }

    #[test]
    fn values_equal_to_mu_are_in_neither_side() {
        let row = mean_relative(2016, &[0.0, 0.0, -1.0, 1.0]).unwrap();
        assert_eq!(row.mu, 0.0);
        assert_eq!(row.pct_below_mu, 25.0);
        assert_eq!(row.pct_above_mu, 25.0);
    }

    #[test]
    fn empty_year_is_an_explicit_error() {
        assert_eq!(
            mean_relative(2014, &[]).unwrap_err(),
            AnalyticsError::EmptyPartition { year: 2014 }
        );
        assert_eq!(
            tail(2014, &[]).unwrap_err(),
            AnalyticsError::EmptyPartition { year: 2014 }
        );
    }

    #[test]
    fn sign_counts_skip_flat_days() {
        let counts = count_signed(&[1.0, -2.0, 0.0, 3.0, -1.0]);
        assert_eq!(counts, SignCounts { positive: 2, negative: 2, zero: 1 });
        assert_eq!(count_signed(&[]), SignCounts::default());
    }

    #[test]
    fn single_day_has_degenerate_variance() {
        let row = tail(2018, &[0.7]).unwrap();
        assert!(row.degenerate_variance);
        assert_eq!(row.sigma, 0.0);
        assert_eq!(row.lower_threshold, row.upper_threshold);
        assert_eq!(row.pct_below_lower, 0.0);
        assert_eq!(row.pct_above_upper, 0.0);
    }

    #[test]
    fn tail_counts_outliers_on_both_sides() {
        // Twenty quiet days and one crash: only the crash leaves the band.
        let mut returns = vec![0.1, -0.1].repeat(10);
        returns.push(-10.0);
        let row = tail(2015, &returns).unwrap();
        assert!(!row.degenerate_variance);
        assert_eq!(row.trading_days, 21);
        assert_eq!(row.pct_below_lower, 4.76);
        assert_eq!(row.pct_above_upper, 0.0);
    }

    #[test]
    fn band_excludes_its_bounds() {
        let summary = band(2018, &[-5.0, -1.0, 0.0, 2.0, 5.0, 7.5], -5.0, 5.0).unwrap();
        assert_eq!(summary.observations, 3);
        assert_eq!(summary.positive_days, 1);
        assert_eq!(summary.negative_days, 1);
        assert!((summary.mu - 1.0 / 3.0).abs() < 1e-12);
        assert!(band(2018, &[9.0], -5.0, 5.0).is_err());
    }

    proptest! {
        #[test]
        fn sign_counts_cover_every_day(returns in proptest::collection::vec(-10.0f64..10.0, 0..300)) {
            prop_assert_eq!(count_signed(&returns).total(), returns.len());
        }

        #[test]
        fn sides_of_mu_never_exceed_whole(returns in proptest::collection::vec(-10.0f64..10.0, 1..300)) {
            let row = mean_relative(2017, &returns).unwrap();
            prop_assert!(row.pct_below_mu + row.pct_above_mu <= 100.0 + 1e-9);
        }

        #[test]
        fn thresholds_bracket_mu(returns in proptest::collection::vec(-10.0f64..10.0, 1..300)) {
            let row = tail(2017, &returns).unwrap();
            prop_assert!(row.sigma >= 0.0);
            prop_assert!(row.lower_threshold <= row.mu);
            prop_assert!(row.mu <= row.upper_threshold);
        }
    }
}
