use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use catalog_harvester::config::load_config;
///
/// let config = load_config(Path::new("config.toml")).unwrap();
/// println!("Concurrency: {}", config.harvester.concurrency);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let config: Config = toml::from_str(&content)?;

    validate(&config)?;

    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so a run's output can be matched to the configuration
/// that produced it.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

/// Loads the identifier list: a JSON array of strings
///
/// Identifiers are opaque and passed through exactly as written. Order is
/// preserved and duplicates are kept; each entry becomes one fetch. Blank
/// (empty or whitespace-only) entries are rejected.
///
/// # Errors
///
/// Any failure here is fatal to the run: the file is unreadable, is not a
/// JSON array of strings, or contains a blank identifier.
pub fn load_identifiers(path: &Path) -> Result<Vec<String>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ConfigError::Identifiers(format!("cannot read {}: {}", path.display(), e))
    })?;

    let identifiers: Vec<String> = serde_json::from_str(&content).map_err(|e| {
        ConfigError::Identifiers(format!("{} is not a JSON string array: {}", path.display(), e))
    })?;

    if let Some(position) = identifiers.iter().position(|id| id.trim().is_empty()) {
        return Err(ConfigError::Identifiers(format!(
            "blank identifier at position {} in {}",
            position,
            path.display()
        )));
    }

    Ok(identifiers)
}
