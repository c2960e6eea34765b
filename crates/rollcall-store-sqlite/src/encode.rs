//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as ISO 8601 strings with millisecond precision and a
//! `Z` suffix, e.g. `2024-05-01T09:30:00.123Z`.

use chrono::{DateTime, SecondsFormat, Utc};
use rollcall_core::{Person, PersonId};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── LIKE patterns ───────────────────────────────────────────────────────────

/// Build a `LIKE ... ESCAPE '\'` pattern matching `fragment` anywhere.
pub fn contains_pattern(fragment: &str) -> String {
  let mut pattern = String::with_capacity(fragment.len() + 2);
  pattern.push('%');
  for c in fragment.chars() {
    if matches!(c, '%' | '_' | '\\') {
      pattern.push('\\');
    }
    pattern.push(c);
  }
  pattern.push('%');
  pattern
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawPerson::from_row`].
pub const PERSON_COLUMNS: &str = "id, name, created_at, last_login, last_logout";

/// Raw values read directly from a `person` row.
pub struct RawPerson {
  pub id:          i64,
  pub name:        String,
  pub created_at:  String,
  pub last_login:  Option<String>,
  pub last_logout: Option<String>,
}

impl RawPerson {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      name:        row.get(1)?,
      created_at:  row.get(2)?,
      last_login:  row.get(3)?,
      last_logout: row.get(4)?,
    })
  }

  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      id:          PersonId(self.id),
      name:        self.name,
      created_at:  decode_dt(&self.created_at)?,
      last_login:  self.last_login.as_deref().map(decode_dt).transpose()?,
      last_logout: self.last_logout.as_deref().map(decode_dt).transpose()?,
    })
  }
}
