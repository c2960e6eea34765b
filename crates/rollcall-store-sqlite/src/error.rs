//! Error type for `rollcall-store-sqlite`.

use rollcall_core::PersonId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("person {0} already exists")]
  DuplicateKey(PersonId),

  #[error("person not found: {0}")]
  NotFound(PersonId),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<Error> for rollcall_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::DuplicateKey(id) => Self::DuplicateKey(id),
      Error::NotFound(id) => Self::NotFound(id),
      // An unreadable row is as unusable as an unreadable file.
      other @ (Error::Database(_) | Error::DateParse(_)) => Self::storage(other),
    }
  }
}
