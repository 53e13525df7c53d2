use crate::error::AnalyticsError;
use core_types::DailyRecord;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DIGITS: usize = 10;

/// The hundredths digit of `price` after rounding it to cents (half to even).
pub fn cent_digit(price: Decimal) -> u8 {
    let cents = (price.round_dp(2) * Decimal::ONE_HUNDRED).trunc();
    let digit = (cents % Decimal::TEN).abs();
    digit.to_u8().unwrap_or_default()
}

/// Uniform prior over the ten cent digits.
pub fn uniform_prior() -> [f64; DIGITS] {
    [1.0 / DIGITS as f64; DIGITS]
}

/// How often each cent digit occurs among opening prices.
///
/// The map is sparse: digits that never occur have no entry. Use
/// [`DigitFrequency::dense_proportions`] when a full ten-bucket vector is needed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigitFrequency {
    counts: BTreeMap<u8, usize>,
}

impl DigitFrequency {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a DailyRecord>,
    {
        Self::from_prices(records.into_iter().map(|r| r.open))
    }

    pub fn from_prices<I>(prices: I) -> Self
    where
        I: IntoIterator<Item = Decimal>,
    {
        let mut counts = BTreeMap::new();
        for price in prices {
            *counts.entry(cent_digit(price)).or_insert(0) += 1;
        }
        Self { counts }
    }

    /// Count for `digit`, `None` when it never occurred.
    pub fn get(&self, digit: u8) -> Option<usize> {
        self.counts.get(&digit).copied()
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Number of distinct digits observed.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// (digit, count) pairs in ascending digit order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, usize)> + '_ {
        self.counts.iter().map(|(digit, count)| (*digit, *count))
    }

    /// The digit with the highest count; ties go to the smaller digit.
    pub fn most_frequent(&self) -> Option<(u8, usize)> {
        self.iter().fold(None, |best, (digit, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((digit, count)),
        })
    }

    /// The observed digit with the lowest count; ties go to the smaller digit.
    pub fn least_frequent(&self) -> Option<(u8, usize)> {
        self.iter().fold(None, |best, (digit, count)| match best {
            Some((_, best_count)) if best_count <= count => best,
            _ => Some((digit, count)),
        })
    }

    /// Counts for all ten digits, absent digits as zero.
    pub fn dense_counts(&self) -> [usize; DIGITS] {
        let mut dense = [0; DIGITS];
        for (digit, count) in self.iter() {
            dense[digit as usize] = count;
        }
        dense
    }

    /// Share of observations per digit, absent digits as zero.
    pub fn dense_proportions(&self) -> Result<[f64; DIGITS], AnalyticsError> {
        let total = self.total();
        if total == 0 {
            return Err(AnalyticsError::NotEnoughData(
                "digit frequency has no observations".to_string(),
            ));
        }
        Ok(self.dense_counts().map(|count| count as f64 / total as f64))
    }
}
