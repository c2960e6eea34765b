//! [`SqliteStore`] — the SQLite implementation of [`RecordStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension as _, TransactionBehavior, types::Value};

use rollcall_core::{
  NewPerson, Person, PersonId, attendance::AttendanceEvent, store::RecordStore,
};

use crate::{
  Error, Result,
  encode::{PERSON_COLUMNS, RawPerson, contains_pattern, encode_dt},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Rollcall record store backed by a single SQLite file.
///
/// All statements run on the one background thread owned by the connection,
/// and every mutating call runs inside an `IMMEDIATE` transaction, so writes
/// to the same id are serialised and none is lost.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref().to_path_buf();
    tracing::debug!(path = %path.display(), "opening sqlite store");
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Flush and close the connection. Other clones of this store fail with a
  /// database error afterwards.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a read-only query returning any number of `person` rows.
  async fn query_people(
    &self,
    sql: String,
    params: Vec<Value>,
  ) -> Result<Vec<Person>> {
    let raws: Vec<RawPerson> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), RawPerson::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = Error;

  async fn insert(
    &self,
    person: NewPerson,
    created_at: DateTime<Utc>,
  ) -> Result<Person> {
    let requested = person.id();
    let name      = person.name().to_owned();
    let name_col  = name.clone();
    let at_str    = encode_dt(created_at);

    // `Err` carries the requested id when it was already taken.
    let assigned: Result<i64, PersonId> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let id = match requested {
          Some(PersonId(id)) => {
            let taken = tx
              .query_row("SELECT 1 FROM person WHERE id = ?1", [id], |_| Ok(()))
              .optional()?
              .is_some();
            if taken {
              return Ok(Err(PersonId(id)));
            }
            tx.execute(
              "INSERT INTO person (id, name, created_at) VALUES (?1, ?2, ?3)",
              rusqlite::params![id, name_col, at_str],
            )?;
            id
          }
          None => {
            tx.execute(
              "INSERT INTO person (name, created_at) VALUES (?1, ?2)",
              rusqlite::params![name_col, at_str],
            )?;
            tx.last_insert_rowid()
          }
        };

        tx.commit()?;
        Ok(Ok(id))
      })
      .await?;

    let id = assigned.map_err(Error::DuplicateKey)?;
    Ok(Person {
      id: PersonId(id),
      name,
      created_at,
      last_login: None,
      last_logout: None,
    })
  }

  async fn get(&self, id: PersonId) -> Result<Option<Person>> {
    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PERSON_COLUMNS} FROM person WHERE id = ?1"),
              [id.0],
              RawPerson::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn find_by_name(&self, fragment: &str) -> Result<Vec<Person>> {
    // SQLite's LIKE folds ASCII case only.
    self
      .query_people(
        format!(
          "SELECT {PERSON_COLUMNS} FROM person
           WHERE name LIKE ?1 ESCAPE '\\'
           ORDER BY id"
        ),
        vec![Value::Text(contains_pattern(fragment))],
      )
      .await
  }

  async fn find_by_name_or_id(
    &self,
    fragment: &str,
    id: Option<PersonId>,
  ) -> Result<Vec<Person>> {
    // A NULL id never compares equal, leaving only the name match.
    self
      .query_people(
        format!(
          "SELECT {PERSON_COLUMNS} FROM person
           WHERE name LIKE ?1 ESCAPE '\\' OR id = ?2
           ORDER BY id"
        ),
        vec![
          Value::Text(contains_pattern(fragment)),
          id.map_or(Value::Null, |PersonId(id)| Value::Integer(id)),
        ],
      )
      .await
  }

  async fn record_event(
    &self,
    id: PersonId,
    event: AttendanceEvent,
  ) -> Result<Person> {
    let updated: Option<Person> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let raw = tx
          .query_row(
            &format!("SELECT {PERSON_COLUMNS} FROM person WHERE id = ?1"),
            [id.0],
            RawPerson::from_row,
          )
          .optional()?;
        let Some(raw) = raw else {
          return Ok(None);
        };

        let person = raw
          .into_person()
          .map_err(|e| tokio_rusqlite::Error::Other(Box::new(e)))?
          .apply(event);

        tx.execute(
          "UPDATE person SET last_login = ?2, last_logout = ?3 WHERE id = ?1",
          rusqlite::params![
            id.0,
            person.last_login.map(encode_dt),
            person.last_logout.map(encode_dt),
          ],
        )?;

        tx.commit()?;
        Ok(Some(person))
      })
      .await?;

    updated.ok_or(Error::NotFound(id))
  }

  async fn list_online(&self) -> Result<Vec<Person>> {
    self
      .query_people(
        format!(
          "SELECT {PERSON_COLUMNS} FROM person
           WHERE last_login IS NOT NULL AND last_logout IS NULL
           ORDER BY id"
        ),
        Vec::new(),
      )
      .await
  }
}
