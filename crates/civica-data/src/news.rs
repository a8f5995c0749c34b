use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct NewsFilter {
    pub id: Option<u32>,
    pub status: Option<NewsStatus>,
    pub category: Option<String>,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, sqlx::Type, Serialize, Deserialize,
)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NewsStatus {
    #[default]
    Draft,
    Published,
}

impl fmt::Display for NewsStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NewsStatus::Draft => write!(f, "draft"),
            NewsStatus::Published => write!(f, "published"),
        }
    }
}

impl FromStr for NewsStatus {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "draft" => Ok(NewsStatus::Draft),
            "published" => Ok(NewsStatus::Published),
            other => Err(anyhow!("unknown news status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Default, FromRow, Serialize, Deserialize)]
pub struct NewsPost {
    pub id: u32,
    pub title: String,
    pub body: String,
    pub category: String,
    pub image_url: String,
    pub status: NewsStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub views: u32,
}
