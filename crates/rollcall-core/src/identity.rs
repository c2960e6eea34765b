//! Identity resolution: creating people with caller-supplied or
//! store-assigned ids.

use crate::{
  ErrorKind, Result,
  clock::Clock,
  person::{NewPerson, Person, PersonId},
  roster::Roster,
  store::{RecordStore, into_core},
};

impl<S: RecordStore, C: Clock> Roster<S, C> {
  /// Create and persist a new person with both attendance timestamps absent.
  ///
  /// With `id = None` the store assigns the next id. With `Some(id)` the
  /// existence check and insert run in one transaction, and a taken id fails
  /// with [`crate::Error::DuplicateKey`] without touching the existing record.
  ///
  /// Validation (`name` non-empty after trimming, `id` positive) happens
  /// before storage is touched.
  pub async fn create_person(
    &self,
    id: Option<PersonId>,
    name: &str,
  ) -> Result<Person> {
    let input = NewPerson::new(id, name)?;
    let created_at = self.clock.now();

    match self.store.insert(input, created_at).await.map_err(into_core) {
      Ok(person) => {
        tracing::info!(person_id = %person.id, name = %person.name, "person created");
        Ok(person)
      }
      Err(e) => {
        if e.kind() == ErrorKind::DuplicateKey {
          tracing::warn!(error = %e, "create rejected");
        }
        Err(e)
      }
    }
  }
}
