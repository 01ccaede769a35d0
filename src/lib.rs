//! Door-connection tables for the room-mapping contest.
//!
//! [`matrix`] builds a symmetric per-room, per-door table from connection
//! records and renders it as text. [`ingest`] turns JSON, line-delimited
//! records, free-text room entries and route plans into those records.
//! [`session`] keeps a player's exploration history and assembles guesses.

pub mod config;
pub mod error;
pub mod ingest;
pub mod matrix;
pub mod session;

pub use error::{MapError, Result};
