//! Common utilities shared across services.
//!
//! This crate provides:
//! - Unified error handling mapped onto HTTP responses
//! - The configuration provider seam and its implementations

pub mod config;
pub mod error;

pub use config::{ConfigProvider, EnvConfig, StaticConfig};
pub use error::{AppError, AppResult, OptionExt};
