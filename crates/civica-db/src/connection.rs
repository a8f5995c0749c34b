use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteConnection},
    Connection as SqlConnection,
};
use tokio::sync::{Mutex, MutexGuard};

use crate::schema;

/// A thread safe connection to the database
#[derive(Clone)]
pub struct Connection(Arc<Mutex<SqliteConnection>>);

impl Connection {
    /// Open a connection to the database
    pub async fn open(filename: &str) -> Result<Self> {
        let opts = SqliteConnectOptions::from_str(filename)?
            .create_if_missing(true)
            .foreign_keys(true);
        let conn = SqliteConnection::connect_with(&opts).await?;
        Ok(Self(Arc::new(Mutex::new(conn))))
    }

    /// Open a fresh in-memory database with the schema installed.
    pub async fn open_test() -> Self {
        let conn = Self::open("sqlite::memory:").await.unwrap();
        schema::install(&conn).await.unwrap();
        conn
    }

    pub(crate) async fn lock(&self) -> MutexGuard<'_, SqliteConnection> {
        self.0.lock().await
    }
}
