//! Wall-clock sources for attendance timestamps.
//!
//! Timestamps are stored with millisecond precision, so every clock here
//! yields values already truncated to the millisecond. A value handed back to
//! a caller is therefore identical to the one later read from the store.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, SubsecRound, Utc};

/// A source of "now" for the attendance engine.
pub trait Clock: Send + Sync {
  fn now(&self) -> DateTime<Utc>;
}

/// Lets a test keep a handle on a clock it has given to a roster.
impl<C: Clock + ?Sized> Clock for Arc<C> {
  fn now(&self) -> DateTime<Utc> { (**self).now() }
}

// ─── SystemClock ─────────────────────────────────────────────────────────────

/// The process wall clock, made monotonically non-decreasing.
///
/// If the system clock steps backwards, the last issued instant is repeated
/// until real time catches up.
#[derive(Debug, Default)]
pub struct SystemClock {
  last: Mutex<Option<DateTime<Utc>>>,
}

impl SystemClock {
  pub fn new() -> Self { Self::default() }

  fn issue(&self, observed: DateTime<Utc>) -> DateTime<Utc> {
    let observed = observed.trunc_subsecs(3);
    let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
    let issued = match *last {
      Some(prev) if prev > observed => prev,
      _ => observed,
    };
    *last = Some(issued);
    issued
  }
}

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Utc> { self.issue(Utc::now()) }
}

// ─── ManualClock ─────────────────────────────────────────────────────────────

/// A clock that only moves when told to. Intended for tests.
#[derive(Debug)]
pub struct ManualClock {
  current: Mutex<DateTime<Utc>>,
}

impl ManualClock {
  pub fn new(start: DateTime<Utc>) -> Self {
    Self { current: Mutex::new(start.trunc_subsecs(3)) }
  }

  /// Move the clock forward by `by`.
  pub fn advance(&self, by: Duration) {
    let mut current =
      self.current.lock().unwrap_or_else(PoisonError::into_inner);
    *current = (*current + by).trunc_subsecs(3);
  }
}

impl Clock for ManualClock {
  fn now(&self) -> DateTime<Utc> {
    *self.current.lock().unwrap_or_else(PoisonError::into_inner)
  }
}
