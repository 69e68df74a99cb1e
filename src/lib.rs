//! Catalog-Harvester: a bounded-concurrency catalogue page harvester
//!
//! This crate fetches a fixed list of catalogue pages, extracts product records
//! (title, price, availability, image links) from each one, and aggregates the
//! results into a single run result that is handed to output sinks.

pub mod config;
pub mod harvester;
pub mod model;
pub mod output;

use thiserror::Error;

/// Main error type for Catalog-Harvester operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {identifier}: {source}")]
    Http {
        identifier: String,
        source: reqwest::Error,
    },

    #[error("Unexpected status {status} for {identifier}")]
    Status { identifier: String, status: u16 },

    #[error("Failed to read response body for {identifier}: {source}")]
    Body {
        identifier: String,
        source: reqwest::Error,
    },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Invalid selector: {0}")]
    Selector(String),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: model::FetchState,
        to: model::FetchState,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector in config: {0}")]
    InvalidSelector(String),

    #[error("Invalid request header: {0}")]
    InvalidHeader(String),

    #[error("Invalid identifier list: {0}")]
    Identifiers(String),
}

/// Result type alias for Catalog-Harvester operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use harvester::{harvest, Harvester};
pub use model::{Availability, FetchFailure, FetchState, Outcome, Record, RunResult};
