use anyhow::Result;
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite};

use civica_data::{Delete, Event, EventFilter, Insert, Query, Retrieve, Update};

use crate::{
    results::{Id, QueryError},
    Connection,
};

#[async_trait]
impl Query<Event> for Connection {
    type Filter = EventFilter;
    async fn query(&self, filter: &Self::Filter) -> Result<Vec<Event>> {
        let mut conn = self.lock().await;
        let mut qry = QueryBuilder::new(
            r#"
            SELECT
                id,
                title,
                description,
                category,
                location,
                scheduled_date,
                scheduled_time,
                capacity,
                confirmed_count,
                status
            FROM events
            WHERE 1
            "#,
        );

        if let Some(id) = filter.id {
            qry.push(" AND id = ").push_bind(id);
        }
        if let Some(status) = filter.status {
            qry.push(" AND status = ").push_bind(status);
        }
        if let Some(category) = filter.category.clone() {
            qry.push(" AND category = ").push_bind(category);
        }
        if let Some(date) = filter.date {
            qry.push(" AND scheduled_date = ").push_bind(date);
        }
        if let Some(date_before) = filter.date_before {
            qry.push(" AND scheduled_date <= ").push_bind(date_before);
        }
        if let Some(date_after) = filter.date_after {
            qry.push(" AND scheduled_date >= ").push_bind(date_after);
        }
        qry.push(" ORDER BY scheduled_date, scheduled_time ");

        let events: Vec<Event> = qry.build_query_as().fetch_all(&mut *conn).await?;
        Ok(events)
    }
}

#[async_trait]
impl Retrieve<Event> for Connection {
    type Key = u32;
    async fn retrieve(&self, event_id: Self::Key) -> Result<Event> {
        let filter = EventFilter {
            id: Some(event_id),
            ..Default::default()
        };
        let event = self
            .query(&filter)
            .await?
            .pop()
            .ok_or(QueryError::NotFound)?;
        Ok(event)
    }
}

#[async_trait]
impl Insert<Event> for Connection {
    async fn insert(&self, event: Event) -> Result<Event> {
        let insert: Id = {
            let mut conn = self.lock().await;
            let mut qry = QueryBuilder::<Sqlite>::new(
                r#"INSERT INTO events (
                    title,
                    description,
                    category,
                    location,
                    scheduled_date,
                    scheduled_time,
                    capacity,
                    confirmed_count,
                    status
                ) VALUES (
                "#,
            );
            qry.separated(", ")
                .push_bind(&event.title)
                .push_bind(&event.description)
                .push_bind(&event.category)
                .push_bind(&event.location)
                .push_bind(event.scheduled_date)
                .push_bind(event.scheduled_time)
                .push_bind(event.capacity)
                .push_bind(event.confirmed_count)
                .push_bind(event.status);

            qry.push(") RETURNING id ")
                .build_query_as()
                .fetch_one(&mut *conn)
                .await?
        };
        self.retrieve(insert.id).await
    }
}

#[async_trait]
impl Update<Event> for Connection {
    /// Update event
    async fn update(&self, event: Event) -> Result<Event> {
        {
            let mut conn = self.lock().await;
            QueryBuilder::<Sqlite>::new("UPDATE events SET")
                .push(" title = ")
                .push_bind(&event.title)
                .push(", description = ")
                .push_bind(&event.description)
                .push(", category = ")
                .push_bind(&event.category)
                .push(", location = ")
                .push_bind(&event.location)
                .push(", scheduled_date = ")
                .push_bind(event.scheduled_date)
                .push(", scheduled_time = ")
                .push_bind(event.scheduled_time)
                .push(", capacity = ")
                .push_bind(event.capacity)
                .push(", confirmed_count = ")
                .push_bind(event.confirmed_count)
                .push(", status = ")
                .push_bind(event.status)
                .push(" WHERE id = ")
                .push_bind(event.id)
                .build()
                .execute(&mut *conn)
                .await?;
        }
        self.retrieve(event.id).await
    }
}

#[async_trait]
impl Delete<Event> for Connection {
    /// Delete event and, via cascade, its attendance records
    async fn delete(&self, event: Event) -> Result<()> {
        let mut conn = self.lock().await;
        QueryBuilder::<Sqlite>::new("DELETE FROM events WHERE id = ")
            .push_bind(event.id)
            .build()
            .execute(&mut *conn)
            .await?;
        Ok(())
    }
}
