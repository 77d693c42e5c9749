//! Shared utilities, configuration, and error handling for Heritage
//!
//! This crate provides common functionality used across the Heritage workspace:
//! - Configuration management following 12-factor principles
//! - Error types and their HTTP mapping
//! - State machine error type shared by domain crates
//! - Lenient request-body extraction

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod state;

pub use db::RepositoryError;
pub use error::{Error, Result};
pub use extractors::LenientJson;
pub use state::StateError;
