//! # butler-core
//!
//! Core types, traits, configuration, and error handling for the Butler bot.

pub mod config;
pub mod error;
pub mod message;
pub mod traits;
pub mod weather;
