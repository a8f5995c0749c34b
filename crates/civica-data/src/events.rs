use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::{AttendanceFilter, AttendanceRecord, Query};

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct EventFilter {
    pub id: Option<u32>,
    pub status: Option<EventStatus>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub date_before: Option<NaiveDate>,
    pub date_after: Option<NaiveDate>,
}

/// Lifecycle state of an event. Derived from the scheduled date,
/// never set by hand; see civica-core.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, sqlx::Type, Serialize, Deserialize,
)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    #[default]
    Upcoming,
    Active,
    Completed,
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EventStatus::Upcoming => write!(f, "upcoming"),
            EventStatus::Active => write!(f, "active"),
            EventStatus::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for EventStatus {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "upcoming" => Ok(EventStatus::Upcoming),
            "active" => Ok(EventStatus::Active),
            "completed" => Ok(EventStatus::Completed),
            other => Err(anyhow!("unknown event status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Default, FromRow, Serialize, Deserialize)]
pub struct Event {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: NaiveTime,
    pub capacity: u32,
    pub confirmed_count: u32,
    pub status: EventStatus,
}

impl Event {
    /// Get the attendance roster of an event
    pub async fn get_attendance<DB>(&self, db: &DB) -> Result<Vec<AttendanceRecord>>
    where
        DB: Query<AttendanceRecord, Filter = AttendanceFilter>,
    {
        let records = db
            .query(&AttendanceFilter {
                event_id: Some(self.id),
                ..Default::default()
            })
            .await?;
        Ok(records)
    }

    /// An event is full when the confirmed count has reached capacity.
    pub fn is_full(&self) -> bool {
        self.confirmed_count >= self.capacity
    }

    pub fn seats_left(&self) -> u32 {
        self.capacity.saturating_sub(self.confirmed_count)
    }
}
