//! The `RecordStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `rollcall-store-sqlite`).
//! [`crate::Roster`] depends on this abstraction, not on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::{
  attendance::AttendanceEvent,
  person::{NewPerson, Person, PersonId},
};

/// Durable storage for [`Person`] records.
///
/// Every method is atomic: it either fully applies or has no visible effect.
/// Implementations must serialise mutations of the same id so that no update
/// is lost.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes.
pub trait RecordStore: Send + Sync {
  /// Backend error; must map onto the core taxonomy.
  type Error: std::error::Error + Send + Sync + Into<crate::Error> + 'static;

  /// Insert a new person if its id is free.
  ///
  /// When `person.id()` is `None` the store assigns the next id from a
  /// monotonic counter that never reuses values. Fails with a duplicate-key
  /// error if the supplied id is taken; the existing row is left untouched.
  fn insert(
    &self,
    person: NewPerson,
    created_at: DateTime<Utc>,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Retrieve a person by id. Returns `None` if not found.
  fn get(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// Case-insensitive substring match on `name`, ordered by id.
  ///
  /// `fragment` is matched literally; wildcard characters carry no special
  /// meaning.
  fn find_by_name<'a>(
    &'a self,
    fragment: &'a str,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + 'a;

  /// Name matches as in [`RecordStore::find_by_name`], plus the row whose id
  /// equals `id` when given, read in one query. Ordered by id, no duplicates.
  fn find_by_name_or_id<'a>(
    &'a self,
    fragment: &'a str,
    id: Option<PersonId>,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + 'a;

  /// Read the row for `id`, apply `event` with [`Person::apply`], and write
  /// the result back, all in one transaction. Fails with a not-found error if
  /// the id does not exist.
  fn record_event(
    &self,
    id: PersonId,
    event: AttendanceEvent,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// All persons for which [`Person::is_online`] holds, ordered by id.
  fn list_online(
    &self,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;
}

/// Lower a backend error into the core taxonomy.
pub(crate) fn into_core<E: Into<crate::Error>>(e: E) -> crate::Error { e.into() }
