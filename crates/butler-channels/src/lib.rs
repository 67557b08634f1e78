//! # butler-channels
//!
//! Messaging platform integrations for Butler.

pub mod telegram;
pub(crate) mod utils;
