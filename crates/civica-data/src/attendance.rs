use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AttendanceFilter {
    pub id: Option<u32>,
    pub event_id: Option<u32>,
    pub member_id: Option<u32>,
    pub state: Option<AttendanceState>,
}

/// Attendance record state. New registrations start out as
/// `Confirmed` (intent to attend); whether the member showed up is
/// recorded after the event through the transitions in civica-core.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, sqlx::Type, Serialize, Deserialize,
)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AttendanceState {
    #[default]
    Confirmed,
    Attended,
    NoShow,
}

impl fmt::Display for AttendanceState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AttendanceState::Confirmed => write!(f, "confirmed"),
            AttendanceState::Attended => write!(f, "attended"),
            AttendanceState::NoShow => write!(f, "no_show"),
        }
    }
}

/// A single member's registration for a single event.
#[derive(Debug, Clone, Default, FromRow, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: u32,
    pub event_id: u32,
    pub member_id: u32,
    pub state: AttendanceState,
    pub registered_at: DateTime<Utc>,
}
