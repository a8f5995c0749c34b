use std::collections::HashSet;

use chrono::{Datelike, Days, NaiveDate};

use civica_data::Event;

/// Member calendar statistics for one displayed month.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthSummary {
    pub events_in_month: usize,
    pub registered_in_month: usize,
    pub next_three_days: usize,
}

/// Count the month's events, the member's own registrations among
/// them, and everything scheduled within the next three days. The
/// three-day window is inclusive on both ends and independent of the
/// displayed month.
pub fn month_summary(
    events: &[Event],
    registered: &HashSet<u32>,
    year: i32,
    month: u32,
    today: NaiveDate,
) -> MonthSummary {
    let in_month: Vec<&Event> = events
        .iter()
        .filter(|e| e.scheduled_date.year() == year && e.scheduled_date.month() == month)
        .collect();
    let registered_in_month = in_month
        .iter()
        .filter(|e| registered.contains(&e.id))
        .count();

    let horizon = today.checked_add_days(Days::new(3)).unwrap();
    let next_three_days = events
        .iter()
        .filter(|e| e.scheduled_date >= today && e.scheduled_date <= horizon)
        .count();

    MonthSummary {
        events_in_month: in_month.len(),
        registered_in_month,
        next_three_days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: u32, y: i32, m: u32, d: u32) -> Event {
        Event {
            id,
            scheduled_date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            ..Default::default()
        }
    }

    #[test]
    fn test_month_summary_counts() {
        let events = vec![
            event(1, 2024, 6, 5),
            event(2, 2024, 6, 21),
            event(3, 2024, 7, 1),
        ];
        let registered = HashSet::from([2, 3]);
        let today = NaiveDate::from_ymd_opt(2024, 6, 20).unwrap();

        let summary = month_summary(&events, &registered, 2024, 6, today);
        assert_eq!(summary.events_in_month, 2);
        // event 3 is registered but outside the displayed month
        assert_eq!(summary.registered_in_month, 1);
        // event 2 falls inside [jun 20, jun 23]
        assert_eq!(summary.next_three_days, 1);
    }

    #[test]
    fn test_three_day_window_is_inclusive() {
        let events = vec![
            event(1, 2024, 6, 20),
            event(2, 2024, 6, 23),
            event(3, 2024, 6, 24),
            event(4, 2024, 6, 19),
        ];
        let today = NaiveDate::from_ymd_opt(2024, 6, 20).unwrap();

        let summary = month_summary(&events, &HashSet::new(), 2024, 6, today);
        assert_eq!(summary.next_three_days, 2);
    }

    #[test]
    fn test_window_crosses_the_displayed_month() {
        // events early next month still count toward the window
        let events = vec![event(1, 2024, 7, 1)];
        let today = NaiveDate::from_ymd_opt(2024, 6, 29).unwrap();

        let summary = month_summary(&events, &HashSet::new(), 2024, 6, today);
        assert_eq!(summary.events_in_month, 0);
        assert_eq!(summary.next_three_days, 1);
    }
}
