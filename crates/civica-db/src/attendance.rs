use anyhow::Result;
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite};

use civica_data::{
    AttendanceFilter, AttendanceRecord, Delete, Insert, Query, Retrieve, Update,
};

use crate::{
    results::{Id, QueryError},
    Connection,
};

#[async_trait]
impl Query<AttendanceRecord> for Connection {
    type Filter = AttendanceFilter;
    async fn query(&self, filter: &Self::Filter) -> Result<Vec<AttendanceRecord>> {
        let mut conn = self.lock().await;
        let mut qry = QueryBuilder::new(
            r#"
            SELECT
                id,
                event_id,
                member_id,
                state,
                registered_at
            FROM attendance
            WHERE 1
            "#,
        );

        if let Some(id) = filter.id {
            qry.push(" AND id = ").push_bind(id);
        }
        if let Some(event_id) = filter.event_id {
            qry.push(" AND event_id = ").push_bind(event_id);
        }
        if let Some(member_id) = filter.member_id {
            qry.push(" AND member_id = ").push_bind(member_id);
        }
        if let Some(state) = filter.state {
            qry.push(" AND state = ").push_bind(state);
        }
        qry.push(" ORDER BY registered_at ");

        let records: Vec<AttendanceRecord> =
            qry.build_query_as().fetch_all(&mut *conn).await?;
        Ok(records)
    }
}

#[async_trait]
impl Retrieve<AttendanceRecord> for Connection {
    type Key = u32;
    async fn retrieve(&self, record_id: Self::Key) -> Result<AttendanceRecord> {
        let filter = AttendanceFilter {
            id: Some(record_id),
            ..Default::default()
        };
        let record = self
            .query(&filter)
            .await?
            .pop()
            .ok_or(QueryError::NotFound)?;
        Ok(record)
    }
}

#[async_trait]
impl Insert<AttendanceRecord> for Connection {
    async fn insert(&self, record: AttendanceRecord) -> Result<AttendanceRecord> {
        let insert: Id = {
            let mut conn = self.lock().await;
            let mut qry = QueryBuilder::<Sqlite>::new(
                r#"INSERT INTO attendance (
                    event_id,
                    member_id,
                    state,
                    registered_at
                ) VALUES (
                "#,
            );
            qry.separated(", ")
                .push_bind(record.event_id)
                .push_bind(record.member_id)
                .push_bind(record.state)
                .push_bind(record.registered_at);

            qry.push(") RETURNING id ")
                .build_query_as()
                .fetch_one(&mut *conn)
                .await?
        };
        self.retrieve(insert.id).await
    }
}

#[async_trait]
impl Update<AttendanceRecord> for Connection {
    /// Update attendance record
    async fn update(&self, record: AttendanceRecord) -> Result<AttendanceRecord> {
        {
            let mut conn = self.lock().await;
            QueryBuilder::<Sqlite>::new("UPDATE attendance SET")
                .push(" event_id = ")
                .push_bind(record.event_id)
                .push(", member_id = ")
                .push_bind(record.member_id)
                .push(", state = ")
                .push_bind(record.state)
                .push(", registered_at = ")
                .push_bind(record.registered_at)
                .push(" WHERE id = ")
                .push_bind(record.id)
                .build()
                .execute(&mut *conn)
                .await?;
        }
        self.retrieve(record.id).await
    }
}

#[async_trait]
impl Delete<AttendanceRecord> for Connection {
    /// Delete attendance record
    async fn delete(&self, record: AttendanceRecord) -> Result<()> {
        let mut conn = self.lock().await;
        QueryBuilder::<Sqlite>::new("DELETE FROM attendance WHERE id = ")
            .push_bind(record.id)
            .build()
            .execute(&mut *conn)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    use civica_data::{AttendanceState, Event, Member};

    async fn seed(db: &Connection) -> (Event, Member) {
        let event = db
            .insert(Event {
                title: "Reforestación".to_string(),
                scheduled_date: NaiveDate::from_ymd_opt(2024, 6, 20).unwrap(),
                capacity: 10,
                ..Event::default()
            })
            .await
            .unwrap();
        let member = db
            .insert(Member {
                name: "Socio de prueba".to_string(),
                email: "socio@civica.test".to_string(),
                ..Member::default()
            })
            .await
            .unwrap();
        (event, member)
    }

    #[tokio::test]
    async fn test_attendance_insert_defaults_to_confirmed() {
        let db = Connection::open_test().await;
        let (event, member) = seed(&db).await;

        let record = db
            .insert(AttendanceRecord {
                event_id: event.id,
                member_id: member.id,
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(record.event_id, event.id);
        assert_eq!(record.member_id, member.id);
        assert_eq!(record.state, AttendanceState::Confirmed);
    }

    #[tokio::test]
    async fn test_attendance_query_by_event_and_state() {
        let db = Connection::open_test().await;
        let (event, member) = seed(&db).await;
        let other = db
            .insert(Member {
                name: "Otro socio".to_string(),
                email: "otro@civica.test".to_string(),
                ..Member::default()
            })
            .await
            .unwrap();

        db.insert(AttendanceRecord {
            event_id: event.id,
            member_id: member.id,
            ..Default::default()
        })
        .await
        .unwrap();
        db.insert(AttendanceRecord {
            event_id: event.id,
            member_id: other.id,
            state: AttendanceState::Attended,
            ..Default::default()
        })
        .await
        .unwrap();

        let roster: Vec<AttendanceRecord> = db
            .query(&AttendanceFilter {
                event_id: Some(event.id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(roster.len(), 2);

        let attended: Vec<AttendanceRecord> = db
            .query(&AttendanceFilter {
                event_id: Some(event.id),
                state: Some(AttendanceState::Attended),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(attended.len(), 1);
        assert_eq!(attended[0].member_id, other.id);
    }

    #[tokio::test]
    async fn test_attendance_state_update() {
        let db = Connection::open_test().await;
        let (event, member) = seed(&db).await;

        let record = db
            .insert(AttendanceRecord {
                event_id: event.id,
                member_id: member.id,
                ..Default::default()
            })
            .await
            .unwrap();

        let record = db
            .update(AttendanceRecord {
                state: AttendanceState::NoShow,
                ..record
            })
            .await
            .unwrap();
        assert_eq!(record.state, AttendanceState::NoShow);
    }

    #[tokio::test]
    async fn test_attendance_delete() {
        let db = Connection::open_test().await;
        let (event, member) = seed(&db).await;

        let record = db
            .insert(AttendanceRecord {
                event_id: event.id,
                member_id: member.id,
                ..Default::default()
            })
            .await
            .unwrap();
        db.delete(record).await.unwrap();

        let roster: Vec<AttendanceRecord> = db
            .query(&AttendanceFilter::default())
            .await
            .unwrap();
        assert!(roster.is_empty());
    }
}
