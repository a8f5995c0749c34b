use anyhow::Result;
use chrono::{DateTime, Utc};
use thiserror::Error as ThisError;

use civica_data::{AttendanceRecord, Delete, Event, Insert, Member, Update};

#[derive(ThisError, Debug)]
pub enum Error {
    #[error("event \"{0}\" is full ({1} seats)")]
    EventFull(String, u32),

    #[error(transparent)]
    Error(#[from] anyhow::Error),
}

/// Register a member for an event: a confirmed attendance record is
/// created and the event's confirmed counter moves with it.
pub async fn register<DB>(
    db: &DB,
    event: Event,
    member: &Member,
    now: DateTime<Utc>,
) -> Result<(Event, AttendanceRecord), Error>
where
    DB: Insert<AttendanceRecord> + Update<Event> + Send + Sync,
{
    if event.is_full() {
        return Err(Error::EventFull(event.title.clone(), event.capacity));
    }

    let record = db
        .insert(AttendanceRecord {
            event_id: event.id,
            member_id: member.id,
            registered_at: now,
            ..Default::default()
        })
        .await?;

    let event = db
        .update(Event {
            confirmed_count: event.confirmed_count + 1,
            ..event
        })
        .await?;

    Ok((event, record))
}

/// Withdraw a registration again; the confirmed counter follows.
pub async fn withdraw<DB>(
    db: &DB,
    event: Event,
    record: AttendanceRecord,
) -> Result<Event, Error>
where
    DB: Delete<AttendanceRecord> + Update<Event> + Send + Sync,
{
    db.delete(record).await?;
    let event = db
        .update(Event {
            confirmed_count: event.confirmed_count.saturating_sub(1),
            ..event
        })
        .await?;
    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{NaiveDate, TimeZone};

    use civica_db::Connection;

    use civica_data::AttendanceState;

    async fn seed(db: &Connection, capacity: u32) -> (Event, Member) {
        let event = db
            .insert(Event {
                title: "Taller".to_string(),
                scheduled_date: NaiveDate::from_ymd_opt(2024, 6, 20).unwrap(),
                capacity,
                ..Default::default()
            })
            .await
            .unwrap();
        let member = db
            .insert(Member {
                name: "Socio".to_string(),
                email: "socio@civica.test".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        (event, member)
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_register_creates_confirmed_record_and_bumps_counter() {
        let db = Connection::open_test().await;
        let (event, member) = seed(&db, 2).await;

        let (event, record) = register(&db, event, &member, now()).await.unwrap();
        assert_eq!(event.confirmed_count, 1);
        assert_eq!(record.state, AttendanceState::Confirmed);
        assert_eq!(record.event_id, event.id);
        assert_eq!(record.member_id, member.id);
    }

    #[tokio::test]
    async fn test_register_rejects_full_event() {
        let db = Connection::open_test().await;
        let (event, member) = seed(&db, 0).await;

        let err = register(&db, event, &member, now()).await.unwrap_err();
        assert!(matches!(err, Error::EventFull(_, 0)));
    }

    #[tokio::test]
    async fn test_withdraw_restores_the_counter() {
        let db = Connection::open_test().await;
        let (event, member) = seed(&db, 5).await;

        let (event, record) = register(&db, event, &member, now()).await.unwrap();
        let event = withdraw(&db, event, record).await.unwrap();
        assert_eq!(event.confirmed_count, 0);
    }
}
