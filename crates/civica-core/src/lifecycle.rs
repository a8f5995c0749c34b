use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use civica_data::{Event, EventStatus, Update};

/// Derive the lifecycle state of an event from its scheduled date.
/// Comparison is on plain calendar dates; the caller fixes what
/// "today" means for the whole reconciliation pass, so two events on
/// the same date can never disagree.
pub fn resolve(today: NaiveDate, scheduled: NaiveDate) -> EventStatus {
    if scheduled < today {
        EventStatus::Completed
    } else if scheduled == today {
        EventStatus::Active
    } else {
        EventStatus::Upcoming
    }
}

/// A stored event status that no longer matches the resolved one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub event_id: u32,
    pub from: EventStatus,
    pub to: EventStatus,
}

/// List the events whose stored status differs from the resolved
/// status. Once the changes are applied, a second pass with the same
/// `today` returns nothing.
pub fn pending_changes(events: &[Event], today: NaiveDate) -> Vec<StatusChange> {
    events
        .iter()
        .filter_map(|event| {
            let resolved = resolve(today, event.scheduled_date);
            if event.status != resolved {
                Some(StatusChange {
                    event_id: event.id,
                    from: event.status,
                    to: resolved,
                })
            } else {
                None
            }
        })
        .collect()
}

#[async_trait]
pub trait SyncLifecycle {
    /// Write resolved statuses back to the store and return what
    /// changed. Events already in their resolved state are not
    /// touched.
    async fn sync_lifecycle<DB>(self, db: &DB, today: NaiveDate) -> Result<Vec<StatusChange>>
    where
        DB: Update<Event> + Send + Sync;
}

#[async_trait]
impl SyncLifecycle for Vec<Event> {
    async fn sync_lifecycle<DB>(self, db: &DB, today: NaiveDate) -> Result<Vec<StatusChange>>
    where
        DB: Update<Event> + Send + Sync,
    {
        let changes = pending_changes(&self, today);
        for event in self {
            let resolved = resolve(today, event.scheduled_date);
            if event.status != resolved {
                db.update(Event {
                    status: resolved,
                    ..event
                })
                .await?;
            }
        }
        Ok(changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use civica_db::Connection;

    use civica_data::{EventFilter, Insert, Query};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_resolve_status_boundary() {
        let today = date(2024, 3, 10);
        assert_eq!(resolve(today, date(2024, 3, 9)), EventStatus::Completed);
        assert_eq!(resolve(today, date(2024, 3, 10)), EventStatus::Active);
        assert_eq!(resolve(today, date(2024, 3, 11)), EventStatus::Upcoming);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let today = date(2024, 3, 10);
        let scheduled = date(2024, 5, 1);
        assert_eq!(resolve(today, scheduled), resolve(today, scheduled));
    }

    #[test]
    fn test_pending_changes_lists_only_stale_statuses() {
        let today = date(2024, 6, 20);
        let events = vec![
            Event {
                id: 1,
                scheduled_date: date(2024, 6, 1),
                status: EventStatus::Upcoming,
                ..Default::default()
            },
            Event {
                id: 2,
                scheduled_date: date(2024, 6, 20),
                status: EventStatus::Active,
                ..Default::default()
            },
            Event {
                id: 3,
                scheduled_date: date(2024, 7, 1),
                status: EventStatus::Upcoming,
                ..Default::default()
            },
        ];

        let changes = pending_changes(&events, today);
        assert_eq!(changes.len(), 1);
        assert_eq!(
            changes[0],
            StatusChange {
                event_id: 1,
                from: EventStatus::Upcoming,
                to: EventStatus::Completed,
            }
        );
    }

    #[tokio::test]
    async fn test_sync_lifecycle_second_pass_writes_nothing() {
        let db = Connection::open_test().await;
        let today = date(2024, 6, 20);

        for (title, scheduled) in [
            ("past", date(2024, 6, 1)),
            ("today", date(2024, 6, 20)),
            ("future", date(2024, 7, 1)),
        ] {
            db.insert(Event {
                title: title.to_string(),
                scheduled_date: scheduled,
                ..Default::default()
            })
            .await
            .unwrap();
        }

        let events: Vec<Event> = db.query(&EventFilter::default()).await.unwrap();
        let changes = events.sync_lifecycle(&db, today).await.unwrap();
        // "future" already carries the default upcoming status
        assert_eq!(changes.len(), 2);

        let events: Vec<Event> = db.query(&EventFilter::default()).await.unwrap();
        let changes = events.sync_lifecycle(&db, today).await.unwrap();
        assert!(changes.is_empty());
    }
}
