use core_types::DailyRecord;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Fractional change between consecutive prices. The first entry has no prior day and is 0,
/// as is any change measured from a zero price.
pub fn pct_change(prices: &[Decimal]) -> Vec<f64> {
    let mut changes = Vec::with_capacity(prices.len());
    if prices.is_empty() {
        return changes;
    }
    changes.push(0.0);
    for pair in prices.windows(2) {
        let change = pair[1]
            .checked_div(pair[0])
            .and_then(|ratio| (ratio - Decimal::ONE).to_f64())
            .unwrap_or(0.0);
        changes.push(change);
    }
    changes
}

/// Copies `records`, recomputing every daily return from the adjusted close.
pub fn derive_returns(records: &[DailyRecord]) -> Vec<DailyRecord> {
    let prices: Vec<Decimal> = records.iter().map(|r| r.adj_close).collect();
    records
        .iter()
        .zip(pct_change(&prices))
        .map(|(record, change)| record.with_return(change))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn first_change_is_zero() {
        let changes = pct_change(&[dec!(100), dec!(110), dec!(99)]);
        assert_eq!(changes.len(), 3);
        assert_eq!(changes[0], 0.0);
        assert!((changes[1] - 0.1).abs() < 1e-12);
        assert!((changes[2] + 0.1).abs() < 1e-12);
        assert!(pct_change(&[]).is_empty());
    }

    #[test]
    fn zero_price_does_not_blow_up() {
        let changes = pct_change(&[dec!(0), dec!(5)]);
        assert_eq!(changes, vec![0.0, 0.0]);
    }

    #[test]
    fn derived_records_keep_everything_but_the_return() {
        let day = |d: u32, adj| {
            DailyRecord::new(NaiveDate::from_ymd_opt(2018, 1, d).unwrap(), dec!(50.01), adj, adj, 10, 0.9)
        };
        let records = vec![day(2, dec!(50)), day(3, dec!(51))];
        let derived = derive_returns(&records);
        assert_eq!(derived[0].daily_return, 0.0);
        assert!((derived[1].daily_return - 0.02).abs() < 1e-12);
        assert_eq!(derived[1].date, records[1].date);
        assert_eq!(records[1].daily_return, 0.9);
    }
}
