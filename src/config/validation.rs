use crate::config::types::{
    Config, HarvesterConfig, LoggerConfig, NameValue, OutputConfig, RequestProfileConfig,
    SelectorConfig,
};
use crate::ConfigError;
use reqwest::header::{HeaderName, HeaderValue};
use scraper::Selector;
use url::Url;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: [&str; 2] = ["console", "json"];

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_harvester_config(&config.harvester)?;
    validate_request_profile(&config.request_profile)?;
    validate_selectors(&config.selectors)?;
    validate_output_config(&config.output)?;
    validate_logger_config(&config.logger)?;
    Ok(())
}

/// Validates harvest behaviour configuration
fn validate_harvester_config(config: &HarvesterConfig) -> Result<(), ConfigError> {
    if config.concurrency == 0 {
        return Err(ConfigError::Validation(
            "concurrency must be at least 1".to_string(),
        ));
    }

    validate_http_url("base-url", &config.base_url)?;
    validate_http_url("image-base-url", &config.image_base_url)?;

    if config.identifiers_file.trim().is_empty() {
        return Err(ConfigError::Validation(
            "identifiers-file cannot be empty".to_string(),
        ));
    }

    if config.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request-timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Checks that a URL parses and uses an HTTP(S) scheme
fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            field, value
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' has no host",
            field, value
        )));
    }

    Ok(())
}

/// Validates the request profile: header names/values must be sendable
fn validate_request_profile(config: &RequestProfileConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    HeaderValue::from_str(&config.user_agent)
        .map_err(|_| ConfigError::InvalidHeader("user-agent contains invalid characters".into()))?;

    for header in &config.headers {
        HeaderName::from_bytes(header.name.as_bytes())
            .map_err(|_| ConfigError::InvalidHeader(format!("bad header name '{}'", header.name)))?;
        HeaderValue::from_str(&header.value).map_err(|_| {
            ConfigError::InvalidHeader(format!("bad value for header '{}'", header.name))
        })?;
    }

    validate_cookies(&config.cookies)?;

    if let Some(domain) = &config.cookie_domain {
        if domain.trim_start_matches('.').is_empty() {
            return Err(ConfigError::Validation(
                "cookie-domain cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates cookie entries: names are tokens, values carry no separators
fn validate_cookies(cookies: &[NameValue]) -> Result<(), ConfigError> {
    for cookie in cookies {
        if cookie.name.is_empty()
            || cookie
                .name
                .chars()
                .any(|c| c.is_whitespace() || c.is_control() || "=;,".contains(c))
        {
            return Err(ConfigError::Validation(format!(
                "invalid cookie name '{}'",
                cookie.name
            )));
        }

        if cookie
            .value
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || c == ';' || c == ',')
        {
            return Err(ConfigError::Validation(format!(
                "invalid value for cookie '{}'",
                cookie.name
            )));
        }
    }

    Ok(())
}

/// Compiles every selector once so a typo fails before the run starts
fn validate_selectors(config: &SelectorConfig) -> Result<(), ConfigError> {
    for (field, selector) in [
        ("title", &config.title),
        ("price-block", &config.price_block),
        ("price-current", &config.price_current),
        ("price-base", &config.price_base),
        ("status-block", &config.status_block),
        ("gallery", &config.gallery),
        ("slide", &config.slide),
    ] {
        Selector::parse(selector).map_err(|e| {
            ConfigError::InvalidSelector(format!("{} '{}': {}", field, selector, e))
        })?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.records_path.is_empty() {
        return Err(ConfigError::Validation(
            "records-path cannot be empty".to_string(),
        ));
    }

    if config.workbook_path.is_empty() {
        return Err(ConfigError::Validation(
            "workbook-path cannot be empty".to_string(),
        ));
    }

    if config.table_path.is_empty() {
        return Err(ConfigError::Validation(
            "table-path cannot be empty".to_string(),
        ));
    }

    if config.summary_path.is_empty() {
        return Err(ConfigError::Validation(
            "summary-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_logger_config(config: &LoggerConfig) -> Result<(), ConfigError> {
    if !LOG_LEVELS.contains(&config.level.to_lowercase().as_str()) {
        return Err(ConfigError::Validation(format!(
            "logger level must be one of {:?}, got '{}'",
            LOG_LEVELS, config.level
        )));
    }

    if !LOG_FORMATS.contains(&config.format.as_str()) {
        return Err(ConfigError::Validation(format!(
            "logger format must be one of {:?}, got '{}'",
            LOG_FORMATS, config.format
        )));
    }

    Ok(())
}
