use chrono::{Datelike, Months, NaiveDate};

/// Today as a local calendar date. Only the outermost caller (the
/// CLI) should use this; everything below takes the reference date
/// as a parameter.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Align a date to the first of the month.
pub trait AlignStart {
    fn align_start(&self) -> Self;
}

impl AlignStart for NaiveDate {
    fn align_start(&self) -> Self {
        self.with_day(1).unwrap()
    }
}

/// First day of the month after a date.
pub fn next_month(date: NaiveDate) -> NaiveDate {
    // Safe: aligned to the first of the month.
    date.align_start()
        .checked_add_months(Months::new(1))
        .unwrap()
}

/// First day of the month before a date.
pub fn prev_month(date: NaiveDate) -> NaiveDate {
    date.align_start()
        .checked_sub_months(Months::new(1))
        .unwrap()
}
