use sqlx::FromRow;
use thiserror::Error as ThisError;

/// Store errors
#[derive(Debug, Clone, ThisError)]
pub enum QueryError {
    #[error("not found")]
    NotFound,
    #[error("ambiguous results ({0}) for query")]
    Ambiguous(usize),
}

/// Row shape for INSERT .. RETURNING id
#[derive(Debug, Clone, FromRow)]
pub struct Id {
    pub id: u32,
}
