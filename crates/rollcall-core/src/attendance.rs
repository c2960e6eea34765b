//! The attendance state machine.
//!
//! Each person is either [`Presence::Offline`] (initial) or
//! [`Presence::Online`]. Login stamps `last_login` and clears `last_logout`;
//! logout stamps `last_logout` and leaves `last_login` alone. Re-login and
//! repeated logout are allowed and only refresh the timestamp.

use chrono::{DateTime, Utc};

use crate::{
  ErrorKind, Result,
  clock::Clock,
  person::{Person, PersonId},
  roster::Roster,
  store::{RecordStore, into_core},
};

// ─── State ───────────────────────────────────────────────────────────────────

/// Derived attendance state of a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
  Offline,
  Online,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
  Login,
  Logout,
}

/// A login or logout at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttendanceEvent {
  pub kind: EventKind,
  pub at:   DateTime<Utc>,
}

impl AttendanceEvent {
  pub fn login(at: DateTime<Utc>) -> Self { Self { kind: EventKind::Login, at } }

  pub fn logout(at: DateTime<Utc>) -> Self { Self { kind: EventKind::Logout, at } }
}

// ─── Transition ──────────────────────────────────────────────────────────────

impl Person {
  pub fn presence(&self) -> Presence {
    if self.is_online() { Presence::Online } else { Presence::Offline }
  }

  /// Apply `event` to this record. A pure function of (record, event).
  ///
  /// Timestamps never move backwards. An event older than the opposite
  /// timestamp already on record is stale: a login that predates the recorded
  /// logout does not bring the person back online, and a logout that
  /// predates the current login does not take them offline. Equal instants
  /// apply in arrival order.
  #[must_use]
  pub fn apply(mut self, event: AttendanceEvent) -> Self {
    match event.kind {
      EventKind::Login => {
        self.last_login = latest(self.last_login, event.at);
        if self.last_logout.is_none_or(|out| out <= event.at) {
          self.last_logout = None;
        }
      }
      EventKind::Logout => {
        let superseded = self.is_online()
          && self.last_login.is_some_and(|login| login > event.at);
        if !superseded {
          self.last_logout = latest(self.last_logout, event.at);
        }
      }
    }
    self
  }
}

fn latest(
  current: Option<DateTime<Utc>>,
  at: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
  Some(current.map_or(at, |prev| prev.max(at)))
}

// ─── Engine ──────────────────────────────────────────────────────────────────

impl<S: RecordStore, C: Clock> Roster<S, C> {
  /// Record a login for `id` at the current clock time.
  ///
  /// Fails with [`crate::Error::NotFound`] if the person does not exist; no
  /// record is created in that case.
  pub async fn login(&self, id: PersonId) -> Result<Person> {
    self.transition(id, AttendanceEvent::login(self.clock.now())).await
  }

  /// Record a logout for `id` at the current clock time.
  pub async fn logout(&self, id: PersonId) -> Result<Person> {
    self.transition(id, AttendanceEvent::logout(self.clock.now())).await
  }

  async fn transition(
    &self,
    id: PersonId,
    event: AttendanceEvent,
  ) -> Result<Person> {
    match self.store.record_event(id, event).await.map_err(into_core) {
      Ok(person) => {
        tracing::info!(
          person_id = %id,
          event = ?event.kind,
          at = %event.at,
          "attendance recorded"
        );
        Ok(person)
      }
      Err(e) => {
        if e.kind() == ErrorKind::NotFound {
          tracing::warn!(person_id = %id, event = ?event.kind, "unknown person");
        }
        Err(e)
      }
    }
  }
}
