//! [`Roster`] — the call-level facade over a [`RecordStore`].
//!
//! The operations are split by concern across [`crate::identity`],
//! [`crate::attendance`] and [`crate::query`]; this module only owns the
//! handle itself.

use std::sync::Arc;

use crate::{
  clock::{Clock, SystemClock},
  store::RecordStore,
};

/// Entry point for creating, logging in, logging out, and looking up people.
///
/// Open the store once at process start, wrap it in a `Roster`, and clone the
/// roster wherever it is needed. Cloning is cheap; the store and clock are
/// reference-counted.
pub struct Roster<S, C = SystemClock> {
  pub(crate) store: Arc<S>,
  pub(crate) clock: Arc<C>,
}

impl<S: RecordStore> Roster<S> {
  /// A roster stamped by the process wall clock.
  pub fn new(store: S) -> Self { Self::with_clock(store, SystemClock::new()) }
}

impl<S: RecordStore, C: Clock> Roster<S, C> {
  pub fn with_clock(store: S, clock: C) -> Self {
    Self { store: Arc::new(store), clock: Arc::new(clock) }
  }
}

impl<S, C> Clone for Roster<S, C> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), clock: Arc::clone(&self.clock) }
  }
}
