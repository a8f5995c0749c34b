use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::{
    AttendanceFilter,
    AttendanceRecord,
    Donation,
    DonationFilter,
    Query,
    Subscription,
    SubscriptionFilter,
};

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct MemberFilter {
    pub id: Option<u32>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub status: Option<MemberStatus>,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, sqlx::Type, Serialize, Deserialize,
)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    #[default]
    Active,
    Inactive,
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MemberStatus::Active => write!(f, "active"),
            MemberStatus::Inactive => write!(f, "inactive"),
        }
    }
}

impl FromStr for MemberStatus {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "active" => Ok(MemberStatus::Active),
            "inactive" => Ok(MemberStatus::Inactive),
            other => Err(anyhow!("unknown member status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Default, FromRow, Serialize, Deserialize)]
pub struct Member {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub notes: String,
    pub joined_at: NaiveDate,
    pub status: MemberStatus,
}

impl Member {
    /// Get the attendance records of a member
    pub async fn get_attendance<DB>(&self, db: &DB) -> Result<Vec<AttendanceRecord>>
    where
        DB: Query<AttendanceRecord, Filter = AttendanceFilter>,
    {
        let records = db
            .query(&AttendanceFilter {
                member_id: Some(self.id),
                ..Default::default()
            })
            .await?;
        Ok(records)
    }

    /// Get the donations attributed to a member
    pub async fn get_donations<DB>(&self, db: &DB) -> Result<Vec<Donation>>
    where
        DB: Query<Donation, Filter = DonationFilter>,
    {
        let donations = db
            .query(&DonationFilter {
                member_id: Some(self.id),
                ..Default::default()
            })
            .await?;
        Ok(donations)
    }

    /// Get the subscriptions of a member
    pub async fn get_subscriptions<DB>(&self, db: &DB) -> Result<Vec<Subscription>>
    where
        DB: Query<Subscription, Filter = SubscriptionFilter>,
    {
        let subscriptions = db
            .query(&SubscriptionFilter {
                member_id: Some(self.id),
                ..Default::default()
            })
            .await?;
        Ok(subscriptions)
    }

    pub fn is_active(&self) -> bool {
        self.status == MemberStatus::Active
    }
}
