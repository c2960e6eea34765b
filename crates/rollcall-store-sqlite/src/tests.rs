//! Integration tests for `SqliteStore` and the `Roster` operations on top of
//! it, against in-memory and temporary file databases.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use chrono::{DateTime, Duration, TimeZone, Utc};
use rollcall_core::{
  ErrorKind, NewPerson, PersonId, Roster,
  attendance::{AttendanceEvent, Presence},
  clock::ManualClock,
  store::RecordStore,
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn t0() -> DateTime<Utc> { Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap() }

async fn roster() -> Roster<SqliteStore, ManualClock> {
  Roster::with_clock(store().await, ManualClock::new(t0()))
}

/// A fresh database path under the OS temp dir.
fn temp_db(name: &str) -> PathBuf {
  let path = std::env::temp_dir()
    .join(format!("rollcall-{}-{name}.db", std::process::id()));
  remove_db(&path);
  path
}

fn remove_db(path: &Path) {
  for suffix in ["", "-wal", "-shm"] {
    let mut p = path.as_os_str().to_owned();
    p.push(suffix);
    let _ = std::fs::remove_file(p);
  }
}

// ─── Store: insert and lookup ────────────────────────────────────────────────

#[tokio::test]
async fn insert_with_explicit_id_and_get() {
  let s = store().await;
  let input = NewPerson::new(Some(PersonId(7)), "Ada Lovelace").unwrap();

  let person = s.insert(input, t0()).await.unwrap();
  assert_eq!(person.id, PersonId(7));
  assert_eq!(person.created_at, t0());

  let fetched = s.get(PersonId(7)).await.unwrap().unwrap();
  assert_eq!(fetched, person);
}

#[tokio::test]
async fn get_missing_returns_none() {
  let s = store().await;
  assert!(s.get(PersonId(404)).await.unwrap().is_none());
}

#[tokio::test]
async fn insert_duplicate_id_is_rejected() {
  let s = store().await;
  s.insert(NewPerson::new(Some(PersonId(1)), "First").unwrap(), t0())
    .await
    .unwrap();

  let err = s
    .insert(NewPerson::new(Some(PersonId(1)), "Second").unwrap(), t0())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::DuplicateKey(PersonId(1))));
  assert_eq!(rollcall_core::Error::from(err).kind(), ErrorKind::DuplicateKey);
}

#[tokio::test]
async fn assigned_ids_continue_after_explicit_ids() {
  let s = store().await;
  s.insert(NewPerson::new(Some(PersonId(50)), "Explicit").unwrap(), t0())
    .await
    .unwrap();
  let auto = s
    .insert(NewPerson::new(None, "Assigned").unwrap(), t0())
    .await
    .unwrap();
  assert!(auto.id > PersonId(50));
}

#[tokio::test]
async fn older_login_committed_late_does_not_rewind() {
  let s = store().await;
  s.insert(NewPerson::new(Some(PersonId(1)), "Racer").unwrap(), t0())
    .await
    .unwrap();

  let newer = t0() + Duration::seconds(2);
  s.record_event(PersonId(1), AttendanceEvent::login(newer))
    .await
    .unwrap();
  let returned = s
    .record_event(PersonId(1), AttendanceEvent::login(t0() + Duration::seconds(1)))
    .await
    .unwrap();
  assert_eq!(returned.last_login, Some(newer));

  let stored = s.get(PersonId(1)).await.unwrap().unwrap();
  assert_eq!(stored.last_login, Some(newer));
  assert!(stored.is_online());
}

#[tokio::test]
async fn record_event_on_missing_id_is_not_found() {
  let s = store().await;
  let err = s
    .record_event(PersonId(9), AttendanceEvent::login(t0()))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::NotFound(PersonId(9))));
}

// ─── Store: name search ──────────────────────────────────────────────────────

#[tokio::test]
async fn name_search_is_case_insensitive_substring() {
  let s = store().await;
  for name in ["Ada Lovelace", "Grace Hopper", "Alan Turing"] {
    s.insert(NewPerson::new(None, name).unwrap(), t0()).await.unwrap();
  }

  let hits = s.find_by_name("LOVE").await.unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].name, "Ada Lovelace");

  let hits = s.find_by_name("a").await.unwrap();
  assert_eq!(hits.len(), 3);
  assert!(hits.windows(2).all(|w| w[0].id < w[1].id));
}

#[tokio::test]
async fn name_search_treats_wildcards_literally() {
  let s = store().await;
  s.insert(NewPerson::new(None, "100% Real").unwrap(), t0()).await.unwrap();
  s.insert(NewPerson::new(None, "Under_score").unwrap(), t0()).await.unwrap();
  s.insert(NewPerson::new(None, "Plain Name").unwrap(), t0()).await.unwrap();

  let hits = s.find_by_name("%").await.unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].name, "100% Real");

  let hits = s.find_by_name("_").await.unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].name, "Under_score");
}

#[tokio::test]
async fn name_or_id_search_reads_both_in_one_query() {
  let s = store().await;
  s.insert(NewPerson::new(Some(PersonId(12)), "Ada Lovelace").unwrap(), t0())
    .await
    .unwrap();
  s.insert(NewPerson::new(Some(PersonId(3)), "Room 12 Cleaner").unwrap(), t0())
    .await
    .unwrap();
  s.insert(NewPerson::new(Some(PersonId(20)), "Grace Hopper").unwrap(), t0())
    .await
    .unwrap();

  let hits = s.find_by_name_or_id("12", Some(PersonId(12))).await.unwrap();
  let ids: Vec<_> = hits.iter().map(|p| p.id).collect();
  assert_eq!(ids, vec![PersonId(3), PersonId(12)]);

  let hits = s.find_by_name_or_id("12", None).await.unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].id, PersonId(3));
}

// ─── Store: durability ───────────────────────────────────────────────────────

#[tokio::test]
async fn records_survive_reopen() {
  let path = temp_db("reopen");

  let s = SqliteStore::open(&path).await.unwrap();
  s.insert(NewPerson::new(Some(PersonId(3)), "Grace Hopper").unwrap(), t0())
    .await
    .unwrap();
  s.record_event(PersonId(3), AttendanceEvent::login(t0()))
    .await
    .unwrap();
  s.close().await.unwrap();

  let reopened = SqliteStore::open(&path).await.unwrap();
  let person = reopened.get(PersonId(3)).await.unwrap().unwrap();
  assert_eq!(person.name, "Grace Hopper");
  assert_eq!(person.last_login, Some(t0()));
  assert!(person.is_online());
  reopened.close().await.unwrap();

  remove_db(&path);
}

#[tokio::test]
async fn unopenable_path_is_storage_unavailable() {
  let path = std::env::temp_dir()
    .join(format!("rollcall-missing-dir-{}", std::process::id()))
    .join("nested")
    .join("User.db");

  let err = match SqliteStore::open(&path).await {
    Ok(_) => panic!("opened a store under a missing directory"),
    Err(e) => e,
  };
  assert_eq!(rollcall_core::Error::from(err).kind(), ErrorKind::StorageUnavailable);
}

// ─── Roster: create ──────────────────────────────────────────────────────────

#[tokio::test]
async fn create_then_find_has_no_timestamps() {
  let r = roster().await;
  let created = r.create_person(Some(PersonId(7)), "Ada Lovelace").await.unwrap();

  let found = r.find_by_id(PersonId(7)).await.unwrap().unwrap();
  assert_eq!(found, created);
  assert_eq!(found.last_login, None);
  assert_eq!(found.last_logout, None);
  assert_eq!(found.presence(), Presence::Offline);
}

#[tokio::test]
async fn create_duplicate_leaves_existing_unchanged() {
  let r = roster().await;
  let original = r.create_person(Some(PersonId(7)), "Ada Lovelace").await.unwrap();
  r.login(PersonId(7)).await.unwrap();
  let before = r.find_by_id(PersonId(7)).await.unwrap().unwrap();

  let err = r
    .create_person(Some(PersonId(7)), "Impostor")
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::DuplicateKey);

  let after = r.find_by_id(PersonId(7)).await.unwrap().unwrap();
  assert_eq!(after, before);
  assert_eq!(after.name, original.name);
}

#[tokio::test]
async fn create_with_blank_name_is_invalid_and_writes_nothing() {
  let r = roster().await;
  let err = r.create_person(Some(PersonId(1)), "   ").await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::InvalidInput);
  assert!(r.find_by_id(PersonId(1)).await.unwrap().is_none());
}

#[tokio::test]
async fn create_with_oversized_id_is_invalid_and_assignment_keeps_working() {
  let r = roster().await;
  let err = r
    .create_person(Some(PersonId(i64::MAX)), "Max")
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::InvalidInput);

  let top = r.create_person(Some(PersonId::MAX), "Top").await.unwrap();
  let next = r.create_person(None, "Next").await.unwrap();
  assert!(next.id > top.id);
  assert!(r.find_by_id(next.id).await.unwrap().is_some());
}

#[tokio::test]
async fn create_trims_name() {
  let r = roster().await;
  let p = r.create_person(None, "  Alan Turing  ").await.unwrap();
  assert_eq!(p.name, "Alan Turing");
}

#[tokio::test]
async fn omitted_ids_are_distinct_and_retrievable() {
  let r = roster().await;
  let a = r.create_person(None, "First Person").await.unwrap();
  let b = r.create_person(None, "Second Person").await.unwrap();

  assert_ne!(a.id, b.id);
  assert_eq!(r.find_by_id(a.id).await.unwrap().unwrap().name, "First Person");
  assert_eq!(r.find_by_id(b.id).await.unwrap().unwrap().name, "Second Person");
}

// ─── Roster: attendance ──────────────────────────────────────────────────────

#[tokio::test]
async fn login_unknown_id_is_not_found_and_creates_nothing() {
  let r = roster().await;
  let err = r.login(PersonId(42)).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);
  assert!(r.find_by_id(PersonId(42)).await.unwrap().is_none());
  assert!(r.list_online().await.unwrap().is_empty());
}

#[tokio::test]
async fn logout_unknown_id_is_not_found() {
  let r = roster().await;
  let err = r.logout(PersonId(42)).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn login_then_logout_leaves_online_list() {
  let r = roster().await;
  let p = r.create_person(None, "Grace Hopper").await.unwrap();

  r.login(p.id).await.unwrap();
  r.logout(p.id).await.unwrap();

  let online = r.list_online().await.unwrap();
  assert!(online.iter().all(|o| o.id != p.id));
}

#[tokio::test]
async fn login_lists_exactly_once() {
  let r = roster().await;
  let p = r.create_person(None, "Grace Hopper").await.unwrap();
  r.create_person(None, "Bystander").await.unwrap();

  r.login(p.id).await.unwrap();

  let online = r.list_online().await.unwrap();
  assert_eq!(online.iter().filter(|o| o.id == p.id).count(), 1);
  assert_eq!(online.len(), 1);
}

#[tokio::test]
async fn relogin_moves_timestamp_forward_and_stays_online() {
  let clock = Arc::new(ManualClock::new(t0()));
  let r = Roster::with_clock(store().await, Arc::clone(&clock));
  let p = r.create_person(None, "Grace Hopper").await.unwrap();

  let first = r.login(p.id).await.unwrap();
  clock.advance(Duration::minutes(5));
  let second = r.login(p.id).await.unwrap();

  assert_eq!(first.last_login, Some(t0()));
  assert_eq!(second.last_login, Some(t0() + Duration::minutes(5)));
  assert!(second.is_online());
  assert_eq!(r.list_online().await.unwrap().len(), 1);
}

#[tokio::test]
async fn login_after_logout_clears_logout() {
  let r = roster().await;
  let p = r.create_person(None, "Grace Hopper").await.unwrap();

  r.login(p.id).await.unwrap();
  let out = r.logout(p.id).await.unwrap();
  assert!(out.last_logout.is_some());

  let back = r.login(p.id).await.unwrap();
  assert_eq!(back.last_logout, None);
  assert!(back.is_online());

  let stored = r.find_by_id(p.id).await.unwrap().unwrap();
  assert_eq!(stored, back);
}

#[tokio::test]
async fn logout_while_offline_is_idempotent() {
  let r = roster().await;
  let p = r.create_person(None, "Grace Hopper").await.unwrap();

  let once = r.logout(p.id).await.unwrap();
  let twice = r.logout(p.id).await.unwrap();
  assert_eq!(once.presence(), Presence::Offline);
  assert_eq!(twice.presence(), Presence::Offline);
  assert_eq!(twice.last_login, None);
}

#[tokio::test]
async fn ada_lovelace_scenario() {
  let r = roster().await;
  r.create_person(Some(PersonId(7)), "Ada Lovelace").await.unwrap();

  let logged_in = r.login(PersonId(7)).await.unwrap();
  let t1 = logged_in.last_login.expect("login timestamp");

  let online = r.list_online().await.unwrap();
  assert_eq!(online.len(), 1);
  assert_eq!(online[0].id, PersonId(7));
  assert_eq!(online[0].name, "Ada Lovelace");
  assert_eq!(online[0].last_login, Some(t1));
  assert_eq!(online[0].last_logout, None);

  r.logout(PersonId(7)).await.unwrap();
  assert!(r.list_online().await.unwrap().is_empty());
}

// ─── Roster: queries ─────────────────────────────────────────────────────────

#[tokio::test]
async fn empty_search_returns_nothing() {
  let r = roster().await;
  r.create_person(None, "Ada Lovelace").await.unwrap();

  for _ in 0..3 {
    assert!(r.search("").await.unwrap().is_empty());
    assert!(r.search("   ").await.unwrap().is_empty());
    assert!(r.find_by_name_fragment("").await.unwrap().is_empty());
  }
}

#[tokio::test]
async fn search_matches_name_or_id() {
  let r = roster().await;
  r.create_person(Some(PersonId(12)), "Ada Lovelace").await.unwrap();
  r.create_person(Some(PersonId(3)), "Room 12 Cleaner").await.unwrap();
  r.create_person(Some(PersonId(20)), "Grace Hopper").await.unwrap();

  let hits = r.search("12").await.unwrap();
  let ids: Vec<_> = hits.iter().map(|p| p.id).collect();
  assert_eq!(ids, vec![PersonId(3), PersonId(12)]);

  let hits = r.search("hopper").await.unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].id, PersonId(20));
}

#[tokio::test]
async fn search_does_not_duplicate_id_and_name_match() {
  let r = roster().await;
  r.create_person(Some(PersonId(5)), "Agent 5").await.unwrap();

  let hits = r.search("5").await.unwrap();
  assert_eq!(hits.len(), 1);
}

// ─── Concurrency ─────────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_logins_keep_one_entry_per_person() {
  let r = Roster::new(store().await);
  let mut ids = Vec::new();
  for i in 0..5 {
    ids.push(r.create_person(None, &format!("Worker {i}")).await.unwrap().id);
  }

  let mut tasks = Vec::new();
  for round in 0..4 {
    for &id in &ids {
      let r = r.clone();
      tasks.push(tokio::spawn(async move {
        if round % 2 == 0 { r.login(id).await } else { r.logout(id).await }
      }));
    }
  }
  for task in tasks {
    task.await.unwrap().unwrap();
  }

  // Final round: everyone logs in concurrently.
  let mut tasks = Vec::new();
  for &id in &ids {
    let r1 = r.clone();
    tasks.push(tokio::spawn(async move { r1.login(id).await }));
    let r2 = r.clone();
    tasks.push(tokio::spawn(async move { r2.login(id).await }));
  }
  for task in tasks {
    task.await.unwrap().unwrap();
  }

  let online = r.list_online().await.unwrap();
  let online_ids: Vec<_> = online.iter().map(|p| p.id).collect();
  assert_eq!(online_ids, ids);
}
