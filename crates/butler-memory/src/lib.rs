//! # butler-memory
//!
//! Persistent storage for Butler (SQLite-backed): users and their weather
//! settings, daily and one-time tasks, and reminder escalation history.

pub mod models;
pub mod store;

pub use models::*;
pub use store::Store;
