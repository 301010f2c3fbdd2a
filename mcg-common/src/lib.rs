//! # MCGalaxy Common Library
//!
//! Shared code for MCGalaxy server tooling including:
//! - Error types
//! - Configuration loading and root folder resolution
//! - Server file layout
//! - Database connection setup and row/batch primitives
//! - Time conversion helpers

pub mod config;
pub mod db;
pub mod error;
pub mod time;

pub use config::{ServerLayout, TomlConfig};
pub use error::{Error, Result};
