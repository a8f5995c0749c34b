use chrono::{Datelike, Months, NaiveDate};
use thiserror::Error as ThisError;

#[derive(ThisError, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("billing day {0} is not in 1..=28")]
    InvalidAnchorDay(u8),
}

/// Day of month a subscription is charged on. Capped at 28 so the
/// anchor exists in every month, February included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillingDay(u8);

impl BillingDay {
    pub fn new(day: u8) -> Result<Self, Error> {
        if (1..=28).contains(&day) {
            Ok(Self(day))
        } else {
            Err(Error::InvalidAnchorDay(day))
        }
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for BillingDay {
    type Error = Error;
    fn try_from(day: u8) -> Result<Self, Self::Error> {
        Self::new(day)
    }
}

/// The next date carrying the anchor day that is not behind `as_of`:
/// this month if the day is still ahead (today included), otherwise
/// the same day next month.
pub fn next_billing_date(day: BillingDay, as_of: NaiveDate) -> NaiveDate {
    // Safe: the anchor day exists in every month.
    let candidate = as_of.with_day(day.get() as u32).unwrap();
    if candidate >= as_of {
        candidate
    } else {
        candidate.checked_add_months(Months::new(1)).unwrap()
    }
}

/// Re-anchor a charge date that has already passed. Future dates come
/// back unchanged.
pub fn roll_forward(next_charge: NaiveDate, as_of: NaiveDate) -> NaiveDate {
    if next_charge >= as_of {
        return next_charge;
    }
    // The stored charge date carries the anchor day (1..=28 invariant).
    let day = BillingDay(next_charge.day() as u8);
    next_billing_date(day, as_of)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_billing_day_bounds() {
        assert!(BillingDay::new(1).is_ok());
        assert!(BillingDay::new(28).is_ok());
        assert_eq!(BillingDay::new(0).unwrap_err(), Error::InvalidAnchorDay(0));
        assert_eq!(
            BillingDay::new(29).unwrap_err(),
            Error::InvalidAnchorDay(29)
        );
        assert_eq!(
            BillingDay::new(31).unwrap_err(),
            Error::InvalidAnchorDay(31)
        );
    }

    #[test]
    fn test_next_billing_date_rollover() {
        let day = BillingDay::new(15).unwrap();
        // day already passed this month
        assert_eq!(
            next_billing_date(day, date(2024, 6, 20)),
            date(2024, 7, 15)
        );
        // day still ahead
        assert_eq!(
            next_billing_date(day, date(2024, 6, 10)),
            date(2024, 6, 15)
        );
        // the anchor day itself stays in the month
        assert_eq!(
            next_billing_date(day, date(2024, 6, 15)),
            date(2024, 6, 15)
        );
    }

    #[test]
    fn test_next_billing_date_across_year_boundary() {
        let day = BillingDay::new(10).unwrap();
        assert_eq!(
            next_billing_date(day, date(2024, 12, 20)),
            date(2025, 1, 10)
        );
    }

    #[test]
    fn test_next_billing_date_survives_february() {
        let day = BillingDay::new(28).unwrap();
        assert_eq!(
            next_billing_date(day, date(2024, 2, 1)),
            date(2024, 2, 28)
        );
        assert_eq!(
            next_billing_date(day, date(2023, 2, 28)),
            date(2023, 2, 28)
        );
    }

    #[test]
    fn test_roll_forward() {
        // already ahead: unchanged
        assert_eq!(
            roll_forward(date(2024, 7, 15), date(2024, 6, 20)),
            date(2024, 7, 15)
        );
        // one month behind
        assert_eq!(
            roll_forward(date(2024, 5, 15), date(2024, 6, 20)),
            date(2024, 7, 15)
        );
        // several months behind still lands on the next anchor
        assert_eq!(
            roll_forward(date(2024, 1, 15), date(2024, 6, 10)),
            date(2024, 6, 15)
        );
    }
}
