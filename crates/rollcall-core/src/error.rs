//! Error types for `rollcall-core`.
//!
//! Every failure surfaced to a caller is one of four kinds. [`ErrorKind`] is
//! the stable signal a presentation layer should branch on; the message text
//! is for humans and may change.

use thiserror::Error;

use crate::person::PersonId;

#[derive(Debug, Error)]
pub enum Error {
  /// Rejected before touching storage (empty name, malformed id).
  #[error("invalid input: {0}")]
  InvalidInput(String),

  #[error("person {0} already exists")]
  DuplicateKey(PersonId),

  #[error("person not found: {0}")]
  NotFound(PersonId),

  /// The storage medium could not be opened, read, or written.
  #[error("storage unavailable: {0}")]
  StorageUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::InvalidInput(_) => ErrorKind::InvalidInput,
      Self::DuplicateKey(_) => ErrorKind::DuplicateKey,
      Self::NotFound(_) => ErrorKind::NotFound,
      Self::StorageUnavailable(_) => ErrorKind::StorageUnavailable,
    }
  }

  /// Wrap any backend failure as [`Error::StorageUnavailable`].
  pub fn storage(
    source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
  ) -> Self {
    Self::StorageUnavailable(source.into())
  }
}

/// Discriminant of [`Error`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
  InvalidInput,
  DuplicateKey,
  NotFound,
  StorageUnavailable,
}

impl ErrorKind {
  /// Machine-readable code; never changes between releases.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::InvalidInput => "invalid_input",
      Self::DuplicateKey => "duplicate_key",
      Self::NotFound => "not_found",
      Self::StorageUnavailable => "storage_unavailable",
    }
  }
}

impl std::fmt::Display for ErrorKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
