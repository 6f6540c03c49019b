//! Shared error definitions and logging setup used across all herald crates.

pub mod error;
pub mod logging;

pub use error::{Error, FromMessage, Result};
