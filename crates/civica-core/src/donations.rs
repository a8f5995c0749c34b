use chrono::{DateTime, Datelike, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use civica_data::Donation;

/// Aggregated donation figures for a dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Totals {
    pub total: Decimal,
    pub current_year: Decimal,
    pub current_month: Decimal,
    pub count: usize,
    pub average: Decimal,
}

/// Sum completed donations: all-time, the year of `as_of`, and the
/// month of `as_of`. Pending, failed and refunded payments are
/// invisible to every figure here, the count and average included.
pub fn aggregate(donations: &[Donation], as_of: DateTime<Utc>) -> Totals {
    let completed: Vec<&Donation> =
        donations.iter().filter(|d| d.is_completed()).collect();

    let total: Decimal = completed.iter().map(|d| d.amount).sum();
    let current_year = completed
        .iter()
        .filter(|d| d.occurred_at.year() == as_of.year())
        .map(|d| d.amount)
        .sum();
    let current_month = completed
        .iter()
        .filter(|d| {
            d.occurred_at.year() == as_of.year() && d.occurred_at.month() == as_of.month()
        })
        .map(|d| d.amount)
        .sum();

    let count = completed.len();
    let average = if count > 0 {
        total / Decimal::from(count as u64)
    } else {
        Decimal::ZERO
    };

    Totals {
        total,
        current_year,
        current_month,
        count,
        average,
    }
}

/// Completed-donation sum for one calendar month.
pub fn month_total(donations: &[Donation], year: i32, month: u32) -> Decimal {
    donations
        .iter()
        .filter(|d| {
            d.is_completed()
                && d.occurred_at.year() == year
                && d.occurred_at.month() == month
        })
        .map(|d| d.amount)
        .sum()
}

/// Growth in whole percent. The zero cases follow the dashboard rule
/// as found in production: no history and no donations is 0%, while
/// donations appearing out of nothing count as 100%.
pub fn growth_percent(current: Decimal, previous: Decimal) -> i64 {
    if previous > Decimal::ZERO {
        ((current - previous) / previous * Decimal::from(100))
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .unwrap_or(0)
    } else if current > Decimal::ZERO {
        100
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;

    use civica_data::PaymentStatus;

    fn donation(amount: &str, status: PaymentStatus, y: i32, m: u32, d: u32) -> Donation {
        Donation {
            amount: amount.parse().unwrap(),
            payment_status: status,
            occurred_at: Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap(),
            ..Default::default()
        }
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_aggregate_excludes_incomplete_payments() {
        let donations = vec![
            donation("100", PaymentStatus::Completed, 2024, 1, 15),
            donation("50", PaymentStatus::Pending, 2024, 1, 16),
            donation("200", PaymentStatus::Completed, 2024, 6, 1),
        ];
        let as_of = Utc.with_ymd_and_hms(2024, 6, 30, 0, 0, 0).unwrap();

        let totals = aggregate(&donations, as_of);
        assert_eq!(totals.total, dec("300"));
        assert_eq!(totals.current_year, dec("300"));
        assert_eq!(totals.current_month, dec("200"));
        assert_eq!(totals.count, 2);
        assert_eq!(totals.average, dec("150"));
    }

    #[test]
    fn test_aggregate_year_and_month_windows() {
        let donations = vec![
            donation("10", PaymentStatus::Completed, 2023, 6, 15),
            donation("20", PaymentStatus::Completed, 2024, 5, 31),
            donation("40", PaymentStatus::Completed, 2024, 6, 1),
            donation("80", PaymentStatus::Refunded, 2024, 6, 2),
            donation("160", PaymentStatus::Failed, 2024, 6, 3),
        ];
        let as_of = Utc.with_ymd_and_hms(2024, 6, 30, 0, 0, 0).unwrap();

        let totals = aggregate(&donations, as_of);
        assert_eq!(totals.total, dec("70"));
        assert_eq!(totals.current_year, dec("60"));
        assert_eq!(totals.current_month, dec("40"));
    }

    #[test]
    fn test_aggregate_empty_input() {
        let as_of = Utc.with_ymd_and_hms(2024, 6, 30, 0, 0, 0).unwrap();
        let totals = aggregate(&[], as_of);
        assert_eq!(totals, Totals::default());
    }

    #[test]
    fn test_aggregate_sums_exact_decimals() {
        // 0.1 + 0.2 is where float money falls over
        let donations = vec![
            donation("0.10", PaymentStatus::Completed, 2024, 6, 1),
            donation("0.20", PaymentStatus::Completed, 2024, 6, 2),
        ];
        let as_of = Utc.with_ymd_and_hms(2024, 6, 30, 0, 0, 0).unwrap();
        assert_eq!(aggregate(&donations, as_of).total, dec("0.30"));
    }

    #[test]
    fn test_month_total() {
        let donations = vec![
            donation("100", PaymentStatus::Completed, 2024, 5, 15),
            donation("25", PaymentStatus::Completed, 2024, 6, 1),
            donation("999", PaymentStatus::Pending, 2024, 5, 20),
        ];
        assert_eq!(month_total(&donations, 2024, 5), dec("100"));
        assert_eq!(month_total(&donations, 2024, 6), dec("25"));
        assert_eq!(month_total(&donations, 2024, 7), Decimal::ZERO);
    }

    #[test]
    fn test_growth_percent_edge_cases() {
        assert_eq!(growth_percent(dec("0"), dec("0")), 0);
        assert_eq!(growth_percent(dec("150"), dec("0")), 100);
        assert_eq!(growth_percent(dec("50"), dec("100")), -50);
        assert_eq!(growth_percent(dec("150"), dec("100")), 50);
        assert_eq!(growth_percent(dec("100"), dec("100")), 0);
    }

    #[test]
    fn test_growth_percent_rounds_half_away_from_zero() {
        // 12.5% rounds to 13, not banker's 12
        assert_eq!(growth_percent(dec("112.50"), dec("100")), 13);
        assert_eq!(growth_percent(dec("87.50"), dec("100")), -13);
    }
}
