use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct DonationFilter {
    pub id: Option<u32>,
    pub member_id: Option<u32>,
    pub kind: Option<DonationKind>,
    pub payment_status: Option<PaymentStatus>,
    pub occurred_before: Option<DateTime<Utc>>,
    pub occurred_after: Option<DateTime<Utc>>,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, sqlx::Type, Serialize, Deserialize,
)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DonationKind {
    #[default]
    OneTime,
    Monthly,
}

impl fmt::Display for DonationKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DonationKind::OneTime => write!(f, "one_time"),
            DonationKind::Monthly => write!(f, "monthly"),
        }
    }
}

impl FromStr for DonationKind {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "one_time" => Ok(DonationKind::OneTime),
            "monthly" => Ok(DonationKind::Monthly),
            other => Err(anyhow!("unknown donation kind: {}", other)),
        }
    }
}

/// Payment state of a donation. Status transitions are performed by
/// the external payment flow; only `Completed` donations count
/// toward any aggregate.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, sqlx::Type, Serialize, Deserialize,
)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Completed,
    #[default]
    Pending,
    Failed,
    Refunded,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PaymentStatus::Completed => write!(f, "completed"),
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Failed => write!(f, "failed"),
            PaymentStatus::Refunded => write!(f, "refunded"),
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "completed" => Ok(PaymentStatus::Completed),
            "pending" => Ok(PaymentStatus::Pending),
            "failed" => Ok(PaymentStatus::Failed),
            "refunded" => Ok(PaymentStatus::Refunded),
            other => Err(anyhow!("unknown payment status: {}", other)),
        }
    }
}

/// A donation. Donors do not have to be members, so the member link
/// is optional and the donor contact lives on the record itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Donation {
    pub id: u32,
    pub member_id: Option<u32>,
    pub donor_name: String,
    pub donor_email: String,
    pub amount: Decimal,
    pub currency: String,
    pub kind: DonationKind,
    pub payment_status: PaymentStatus,
    pub occurred_at: DateTime<Utc>,
    pub description: String,
}

// Amounts are stored as TEXT to keep them exact; sqlx cannot derive
// that conversion, so the row mapping is written out.
impl<'r> FromRow<'r, SqliteRow> for Donation {
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
            donor_name: row.try_get("donor_name")?,
            donor_email: row.try_get("donor_email")?,
            amount,
            currency: row.try_get("currency")?,
            kind: row.try_get("kind")?,
            payment_status: row.try_get("payment_status")?,
            occurred_at: row.try_get("occurred_at")?,
            description: row.try_get("description")?,
        })
    }
}

impl Donation {
    pub fn is_completed(&self) -> bool {
        self.payment_status == PaymentStatus::Completed
    }
}
