//! tilerc - declarative configuration for a tiling window manager
//!
//! The host window manager calls [`Config::load`] once at startup and again
//! on every reload. The returned value carries the key bindings, groups,
//! layouts, bar widgets, mouse bindings, float rules and lifecycle hooks the
//! host reads by name.

pub mod cli;
pub mod config;
pub mod lifecycle;
pub mod logging;
pub mod models;
pub mod services;

pub use config::{Config, Settings};
pub use models::*;

/// Result type alias for tilerc operations
pub type Result<T> = anyhow::Result<T>;

/// Error types specific to tilerc operations
#[derive(thiserror::Error, Debug)]
pub enum TileRcError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
