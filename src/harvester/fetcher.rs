//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester, including:
//! - Building one HTTP client carrying the fixed browser-like request profile
//! - Binding the configured session cookies to the target domain
//! - Applying the politeness delay before each request
//! - Turning each retrieval into exactly one `Outcome`
//!
//! A single attempt is made per request; there is no retry.

use crate::config::{Config, HarvesterConfig, RequestProfileConfig};
use crate::harvester::extractor::ExtractionRules;
use crate::harvester::throttle::PolitenessDelay;
use crate::model::{FetchRequest, FetchState, FetchTracker, Outcome, Record};
use crate::{ConfigError, HarvestError};
use reqwest::cookie::Jar;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Builds the HTTP client shared (read-only) by every fetch task
///
/// The client carries the user agent, the ordered header set, and a cookie
/// jar holding the configured cookies bound to the target domain.
///
/// # Example
///
/// ```no_run
/// use catalog_harvester::config::load_config;
/// use catalog_harvester::harvester::build_http_client;
/// use std::path::Path;
///
/// let config = load_config(Path::new("config.toml")).unwrap();
/// let client = build_http_client(&config.harvester, &config.request_profile).unwrap();
/// ```
pub fn build_http_client(
    harvester: &HarvesterConfig,
    profile: &RequestProfileConfig,
) -> Result<Client, HarvestError> {
    let headers = build_headers(profile)?;
    let base_url = Url::parse(&harvester.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", harvester.base_url, e)))?;
    let jar = build_cookie_jar(profile, &base_url);

    let client = Client::builder()
        .user_agent(profile.user_agent.as_str())
        .default_headers(headers)
        .cookie_provider(jar)
        .timeout(Duration::from_secs(harvester.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

/// Converts the ordered header list into a `HeaderMap`
fn build_headers(profile: &RequestProfileConfig) -> Result<HeaderMap, ConfigError> {
    let mut headers = HeaderMap::with_capacity(profile.headers.len());

    for header in &profile.headers {
        let name = HeaderName::from_bytes(header.name.as_bytes())
            .map_err(|_| ConfigError::InvalidHeader(format!("bad header name '{}'", header.name)))?;
        let value = HeaderValue::from_str(&header.value).map_err(|_| {
            ConfigError::InvalidHeader(format!("bad value for header '{}'", header.name))
        })?;
        headers.insert(name, value);
    }

    Ok(headers)
}

/// Loads the configured cookies into a jar, in configuration order
///
/// With a `cookie-domain` the cookies are domain cookies; without one they are
/// host-only cookies on the base URL's host.
fn build_cookie_jar(profile: &RequestProfileConfig, base_url: &Url) -> Arc<Jar> {
    let jar = Arc::new(Jar::default());

    if let (Some(domain), Some(host)) = (&profile.cookie_domain, base_url.host_str()) {
        if !domain_matches(host, domain) {
            warn!(
                cookie_domain = %domain,
                host,
                "cookie domain does not cover the base URL host; cookies will not be sent"
            );
        }
    }

    for cookie in &profile.cookies {
        let set_cookie = build_set_cookie_string(&cookie.name, &cookie.value, profile);
        jar.add_cookie_str(&set_cookie, base_url);
        debug!(name = %cookie.name, "loaded cookie into jar");
    }

    jar
}

fn build_set_cookie_string(name: &str, value: &str, profile: &RequestProfileConfig) -> String {
    match &profile.cookie_domain {
        Some(domain) => format!("{}={}; Domain={}; Path=/", name, value, domain),
        None => format!("{}={}; Path=/", name, value),
    }
}

/// Returns true if `host` is `domain` or a subdomain of it
fn domain_matches(host: &str, domain: &str) -> bool {
    let domain = domain.trim_start_matches('.').to_ascii_lowercase();
    let host = host.to_ascii_lowercase();
    host == domain || host.ends_with(&format!(".{}", domain))
}

/// Retrieves documents and turns them into outcomes
///
/// Holds only read-only state; one instance is shared by all fetch tasks.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    rules: ExtractionRules,
    delay: PolitenessDelay,
    domain: String,
}

impl Fetcher {
    /// Builds a fetcher from configuration
    pub fn new(config: &Config) -> Result<Self, HarvestError> {
        let client = build_http_client(&config.harvester, &config.request_profile)?;
        let rules = ExtractionRules::compile(
            &config.selectors,
            config.harvester.collect_images,
            &config.harvester.image_base_url,
        )?;
        let delay = PolitenessDelay::new(Duration::from_millis(
            config.harvester.politeness_delay_ms,
        ));
        let domain = Url::parse(&config.harvester.base_url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_default();

        Ok(Self::from_parts(client, rules, delay, domain))
    }

    pub fn from_parts(
        client: Client,
        rules: ExtractionRules,
        delay: PolitenessDelay,
        domain: String,
    ) -> Self {
        Self {
            client,
            rules,
            delay,
            domain,
        }
    }

    /// Performs one retrieval for `request` and returns its single outcome
    pub async fn fetch(&self, request: &FetchRequest) -> Outcome {
        let mut tracker = FetchTracker::new();
        record_transition(&mut tracker, FetchState::Fetching, request);

        let outcome = Outcome::from_result(request, self.fetch_record(request).await);

        let terminal = if outcome.is_success() {
            FetchState::Parsed
        } else {
            FetchState::Failed
        };
        record_transition(&mut tracker, terminal, request);

        outcome
    }

    async fn fetch_record(&self, request: &FetchRequest) -> Result<Record, HarvestError> {
        self.delay.wait(&self.domain).await;

        let response = self
            .client
            .get(&request.url)
            .send()
            .await
            .map_err(|source| {
                debug!(
                    identifier = %request.identifier,
                    kind = transport_error_kind(&source),
                    "request failed"
                );
                HarvestError::Http {
                    identifier: request.identifier.clone(),
                    source,
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(HarvestError::Status {
                identifier: request.identifier.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| HarvestError::Body {
            identifier: request.identifier.clone(),
            source,
        })?;

        Ok(self
            .rules
            .extract(&body, &request.identifier, &request.url))
    }
}

fn record_transition(tracker: &mut FetchTracker, next: FetchState, request: &FetchRequest) {
    match tracker.advance(next) {
        Ok(()) => debug!(identifier = %request.identifier, state = %next, "fetch state"),
        Err(e) => warn!(identifier = %request.identifier, "{}", e),
    }
}

/// Classifies a transport error for logging
fn transport_error_kind(error: &reqwest::Error) -> &'static str {
    if error.is_timeout() {
        "timeout"
    } else if error.is_connect() {
        "connect"
    } else if error.is_redirect() {
        "redirect"
    } else if error.is_body() || error.is_decode() {
        "body"
    } else {
        "other"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NameValue;

    fn create_test_harvester() -> HarvesterConfig {
        HarvesterConfig {
            base_url: "https://www.example.com/books".to_string(),
            image_base_url: "https://static.example.com/books".to_string(),
            concurrency: 4,
            politeness_delay_ms: 0,
            collect_images: false,
            identifiers_file: "ids.json".to_string(),
            request_timeout_secs: 30,
        }
    }

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&create_test_harvester(), &RequestProfileConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_build_client_with_cookies() {
        let profile = RequestProfileConfig {
            cookie_domain: Some(".example.com".to_string()),
            cookies: vec![
                NameValue::new("PHPSESSID", "abc"),
                NameValue::new("cookie_policy", "1"),
            ],
            ..RequestProfileConfig::default()
        };
        assert!(build_http_client(&create_test_harvester(), &profile).is_ok());
    }

    #[test]
    fn test_build_headers_keeps_every_entry() {
        let profile = RequestProfileConfig::default();
        let headers = build_headers(&profile).unwrap();
        assert_eq!(headers.len(), profile.headers.len());
        assert_eq!(headers.get("sec-fetch-mode").unwrap(), "navigate");
    }

    #[test]
    fn test_build_headers_rejects_bad_name() {
        let profile = RequestProfileConfig {
            headers: vec![NameValue::new("Bad Name", "x")],
            ..RequestProfileConfig::default()
        };
        assert!(matches!(
            build_headers(&profile),
            Err(ConfigError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_set_cookie_string() {
        let mut profile = RequestProfileConfig::default();
        assert_eq!(
            build_set_cookie_string("a", "1", &profile),
            "a=1; Path=/"
        );

        profile.cookie_domain = Some(".example.com".to_string());
        assert_eq!(
            build_set_cookie_string("a", "1", &profile),
            "a=1; Domain=.example.com; Path=/"
        );
    }

    #[test]
    fn test_domain_matches() {
        assert!(domain_matches("www.example.com", ".example.com"));
        assert!(domain_matches("example.com", ".example.com"));
        assert!(domain_matches("WWW.Example.com", "example.com"));
        assert!(!domain_matches("example.org", ".example.com"));
        assert!(!domain_matches("notexample.com", "example.com"));
    }
}
