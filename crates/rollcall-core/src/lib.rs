//! Core types and trait definitions for the Rollcall attendance tracker.
//!
//! This crate is deliberately free of database dependencies. Storage backends
//! implement [`store::RecordStore`]; callers talk to [`roster::Roster`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod attendance;
pub mod clock;
pub mod error;
pub mod identity;
pub mod person;
pub mod query;
pub mod roster;
pub mod store;

pub use error::{Error, ErrorKind, Result};
pub use person::{NewPerson, Person, PersonId};
pub use roster::Roster;
