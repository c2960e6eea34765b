//! Person — the sole entity of the attendance store.
//!
//! A person is created once, never renamed, and never deleted. Only the two
//! attendance timestamps change after creation, and only through
//! [`crate::attendance`].

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── PersonId ────────────────────────────────────────────────────────────────

/// The integer key of a person; immutable and never reused.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PersonId(pub i64);

impl PersonId {
  /// Largest id a caller may supply: 2^53 - 1, the largest integer that
  /// survives a round trip through a JavaScript number. Everything above it
  /// stays reserved for store-assigned ids.
  pub const MAX: Self = Self(9_007_199_254_740_991);

  /// Caller-supplied ids must lie in `1..=PersonId::MAX`.
  pub fn validate(self) -> Result<Self> {
    if (1..=Self::MAX.0).contains(&self.0) {
      Ok(self)
    } else {
      Err(Error::InvalidInput(format!(
        "id must be between 1 and {}, got {}",
        Self::MAX,
        self.0
      )))
    }
  }
}

impl fmt::Display for PersonId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

impl FromStr for PersonId {
  type Err = Error;

  /// Parse operator input such as `" 42 "`. Surrounding whitespace is ignored.
  fn from_str(s: &str) -> Result<Self> {
    let trimmed = s.trim();
    trimmed
      .parse::<i64>()
      .map_err(|_| Error::InvalidInput(format!("malformed id: {trimmed:?}")))
      .map(PersonId)?
      .validate()
  }
}

impl From<i64> for PersonId {
  fn from(value: i64) -> Self { Self(value) }
}

// ─── Person ──────────────────────────────────────────────────────────────────

/// The durable attendance record for one individual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  pub id:          PersonId,
  pub name:        String,
  /// Set by the engine clock at creation; never changes.
  pub created_at:  DateTime<Utc>,
  pub last_login:  Option<DateTime<Utc>>,
  /// `None` while online or before the first logout.
  pub last_logout: Option<DateTime<Utc>>,
}

impl Person {
  /// Online iff a login has been recorded and no logout followed it.
  ///
  /// Login clears `last_logout`, so a present `last_logout` always means the
  /// most recent event was a logout.
  pub fn is_online(&self) -> bool {
    self.last_login.is_some() && self.last_logout.is_none()
  }
}

// ─── NewPerson ───────────────────────────────────────────────────────────────

/// Validated input to [`crate::store::RecordStore::insert`].
///
/// Construct with [`NewPerson::new`]; a value of this type always carries a
/// non-empty trimmed name and, if present, a positive id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPerson {
  id:   Option<PersonId>,
  name: String,
}

impl NewPerson {
  pub fn new(id: Option<PersonId>, name: &str) -> Result<Self> {
    let id = id.map(PersonId::validate).transpose()?;
    let name = name.trim();
    if name.is_empty() {
      return Err(Error::InvalidInput("name must not be empty".into()));
    }
    Ok(Self { id, name: name.to_owned() })
  }

  pub fn id(&self) -> Option<PersonId> { self.id }

  pub fn name(&self) -> &str { &self.name }
}
