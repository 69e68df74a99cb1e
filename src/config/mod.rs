//! Configuration module for Catalog-Harvester
//!
//! This module handles loading, parsing, and validating TOML configuration files,
//! and loading the identifier list a run is built from.
//!
//! # Example
//!
//! ```no_run
//! use catalog_harvester::config::{load_config, load_identifiers};
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! let ids = load_identifiers(Path::new(&config.harvester.identifiers_file)).unwrap();
//! println!("{} pages at concurrency {}", ids.len(), config.harvester.concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, HarvesterConfig, LoggerConfig, NameValue, OutputConfig, RequestProfileConfig,
    SelectorConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, load_identifiers};
