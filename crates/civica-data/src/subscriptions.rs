use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct SubscriptionFilter {
    pub id: Option<u32>,
    pub member_id: Option<u32>,
    pub state: Option<SubscriptionState>,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, sqlx::Type, Serialize, Deserialize,
)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionState {
    #[default]
    Active,
    Cancelled,
}

impl fmt::Display for SubscriptionState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SubscriptionState::Active => write!(f, "active"),
            SubscriptionState::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A recurring monthly donation. `billing_day` is the day-of-month
/// anchor (1..=28, enforced in civica-core) and `next_charge_date`
/// always falls on that day.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Subscription {
    pub id: u32,
    pub member_id: u32,
    pub amount: Decimal,
    pub billing_day: u8,
    pub next_charge_date: NaiveDate,
    pub state: SubscriptionState,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub card_last_digits: String,
}

impl<'r> FromRow<'r, SqliteRow> for Subscription {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let amount: String = row.try_get("amount")?;
        let amount = amount
            .parse::<Decimal>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "amount".to_string(),
                source: Box::new(e),
            })?;
        Ok(Self {
            id: row.try_get("id")?,
            member_id: row.try_get("member_id")?,
            amount,
            billing_day: row.try_get("billing_day")?,
            next_charge_date: row.try_get("next_charge_date")?,
            state: row.try_get("state")?,
            cancelled_at: row.try_get("cancelled_at")?,
            card_last_digits: row.try_get("card_last_digits")?,
        })
    }
}

impl Subscription {
    pub fn is_active(&self) -> bool {
        self.state == SubscriptionState::Active
    }
}
