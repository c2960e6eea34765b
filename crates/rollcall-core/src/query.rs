//! Read-side operations. Every call goes to the store; nothing is cached.

use crate::{
  Result,
  clock::Clock,
  person::{Person, PersonId},
  roster::Roster,
  store::{RecordStore, into_core},
};

impl<S: RecordStore, C: Clock> Roster<S, C> {
  /// Case-insensitive (ASCII) substring search on `name`, ordered by id.
  ///
  /// The fragment is trimmed first. Blank input returns an empty list rather
  /// than every record.
  pub async fn find_by_name_fragment(&self, text: &str) -> Result<Vec<Person>> {
    let fragment = text.trim();
    if fragment.is_empty() {
      return Ok(Vec::new());
    }
    let people = self.store.find_by_name(fragment).await.map_err(into_core)?;
    tracing::debug!(fragment, matches = people.len(), "name search");
    Ok(people)
  }

  /// Name-fragment matches, plus the person whose id is `text` when `text`
  /// parses as an id. One read, ordered by id, without duplicates. Blank
  /// input returns an empty list.
  pub async fn search(&self, text: &str) -> Result<Vec<Person>> {
    let fragment = text.trim();
    if fragment.is_empty() {
      return Ok(Vec::new());
    }
    let id = fragment.parse::<PersonId>().ok();
    let people = self
      .store
      .find_by_name_or_id(fragment, id)
      .await
      .map_err(into_core)?;
    tracing::debug!(fragment, matches = people.len(), "search");
    Ok(people)
  }

  pub async fn find_by_id(&self, id: PersonId) -> Result<Option<Person>> {
    let person = self.store.get(id).await.map_err(into_core)?;
    tracing::debug!(person_id = %id, found = person.is_some(), "lookup");
    Ok(person)
  }

  /// Everyone currently online, ordered by id.
  pub async fn list_online(&self) -> Result<Vec<Person>> {
    let people = self.store.list_online().await.map_err(into_core)?;
    tracing::debug!(online = people.len(), "online listing");
    Ok(people)
  }
}
