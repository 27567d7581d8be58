/**
 * Responsibility
 * - The meaning a store failure carries upward (conflict / bad reference / everything else)
 */
use thiserror::Error;

use crate::services::object_id::ObjectIdError;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error")]
    Db(#[source] sqlx::Error),
    #[error("unique constraint violated")]
    Conflict,
    #[error("foreign key points to a missing record")]
    InvalidReference,
    #[error("stored record is corrupt: {0}")]
    Corrupt(String),
    #[error("failed to allocate id")]
    IdAllocation(#[source] ObjectIdError),
}

pub type RepoResult<T> = Result<T, RepoError>;

impl RepoError {
    pub fn from_sqlx(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(dbe) = &e {
            match dbe.code().as_deref() {
                Some("23505") => return RepoError::Conflict,
                Some("23503") => return RepoError::InvalidReference,
                _ => {}
            }
        }
        RepoError::Db(e)
    }
}

impl From<sqlx::Error> for RepoError {
    fn from(e: sqlx::Error) -> Self {
        Self::from_sqlx(e)
    }
}
