//! Core domain + application logic for the game bot.
//!
//! This crate is intentionally framework-agnostic. Telegram and SQLite live
//! behind ports (traits) implemented in adapter crates.

pub mod config;
pub mod dispatch;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod games;
pub mod logging;
pub mod messaging;
pub mod persistence;
pub mod ports;
pub mod registry;
pub mod session;

pub use errors::{Error, Result};
