use serde::Deserialize;

/// Main configuration structure for Catalog-Harvester
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub harvester: HarvesterConfig,
    #[serde(rename = "request-profile", default)]
    pub request_profile: RequestProfileConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub logger: LoggerConfig,
}

/// Harvest behaviour configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HarvesterConfig {
    /// Prefix every identifier is appended to (`{base-url}/{identifier}`)
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Prefix for synthesized image links
    #[serde(rename = "image-base-url")]
    pub image_base_url: String,

    /// Maximum number of fetch tasks in flight
    pub concurrency: u32,

    /// Upper bound of the random delay applied before each request (milliseconds)
    #[serde(rename = "politeness-delay-ms", default)]
    pub politeness_delay_ms: u64,

    /// Whether image links are synthesized from the gallery block
    #[serde(rename = "collect-images", default)]
    pub collect_images: bool,

    /// Path to the JSON array of identifiers
    #[serde(rename = "identifiers-file")]
    pub identifiers_file: String,

    /// Whole-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

/// Fixed browser-like request profile applied to every fetch
#[derive(Debug, Clone, Deserialize)]
pub struct RequestProfileConfig {
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Headers sent with every request, in order
    #[serde(default = "default_headers")]
    pub headers: Vec<NameValue>,

    /// Domain the cookies are bound to (e.g. ".example.com").
    /// Cookies are host-only on the base URL's host when unset.
    #[serde(rename = "cookie-domain", default)]
    pub cookie_domain: Option<String>,

    /// Session cookies, in order
    #[serde(default)]
    pub cookies: Vec<NameValue>,
}

impl Default for RequestProfileConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            headers: default_headers(),
            cookie_domain: None,
            cookies: Vec::new(),
        }
    }
}

/// An ordered name/value pair (header or cookie)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NameValue {
    pub name: String,
    pub value: String,
}

impl NameValue {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

/// CSS selectors driving field extraction
#[derive(Debug, Clone, Deserialize)]
pub struct SelectorConfig {
    #[serde(default = "default_title_selector")]
    pub title: String,

    /// Container the price nodes are looked up in
    #[serde(rename = "price-block", default = "default_price_block_selector")]
    pub price_block: String,

    /// Price-in-currency node (inner HTML is used)
    #[serde(rename = "price-current", default = "default_price_current_selector")]
    pub price_current: String,

    /// Base price node, used when the current price is absent
    #[serde(rename = "price-base", default = "default_price_base_selector")]
    pub price_base: String,

    #[serde(rename = "status-block", default = "default_status_block_selector")]
    pub status_block: String,

    #[serde(default = "default_gallery_selector")]
    pub gallery: String,

    #[serde(default = "default_slide_selector")]
    pub slide: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            title: default_title_selector(),
            price_block: default_price_block_selector(),
            price_current: default_price_current_selector(),
            price_base: default_price_base_selector(),
            status_block: default_status_block_selector(),
            gallery: default_gallery_selector(),
            slide: default_slide_selector(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the JSON records file
    #[serde(rename = "records-path")]
    pub records_path: String,

    /// Path to the XLSX workbook
    #[serde(rename = "workbook-path", default = "default_workbook_path")]
    pub workbook_path: String,

    /// Path to the CSV table file
    #[serde(rename = "table-path")]
    pub table_path: String,

    /// Path to the markdown run summary
    #[serde(rename = "summary-path")]
    pub summary_path: String,

    /// Append `_YYYY-MM-DD` before the file extension
    #[serde(rename = "date-suffix", default = "default_true")]
    pub date_suffix: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggerConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// "console" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_request_timeout() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_workbook_path() -> String {
    "./books.xlsx".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "console".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36".to_string()
}

fn default_headers() -> Vec<NameValue> {
    vec![
        NameValue::new(
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7",
        ),
        NameValue::new("Accept-Language", "ru-RU,ru;q=0.9,en-US;q=0.8,en;q=0.7"),
        NameValue::new("Cache-Control", "max-age=0"),
        NameValue::new("Priority", "u=0, i"),
        NameValue::new("Referer", "https://www.labirint.ru/"),
        NameValue::new(
            "Sec-Ch-Ua",
            "\"Chromium\";v=\"124\", \"Google Chrome\";v=\"124\", \"Not-A.Brand\";v=\"99\"",
        ),
        NameValue::new("Sec-Ch-Ua-Mobile", "?0"),
        NameValue::new("Sec-Ch-Ua-Platform", "\"Windows\""),
        NameValue::new("Sec-Fetch-Dest", "document"),
        NameValue::new("Sec-Fetch-Mode", "navigate"),
        NameValue::new("Sec-Fetch-Site", "same-origin"),
        NameValue::new("Sec-Fetch-User", "?1"),
        NameValue::new("Upgrade-Insecure-Requests", "1"),
    ]
}

fn default_title_selector() -> String {
    "h1[itemprop=name]".to_string()
}

fn default_price_block_selector() -> String {
    "div[class^='_prices_']".to_string()
}

fn default_price_current_selector() -> String {
    "div.rubl".to_string()
}

fn default_price_base_selector() -> String {
    "div[class^='_priceBase_']".to_string()
}

fn default_status_block_selector() -> String {
    "div[class^='_block_']".to_string()
}

fn default_gallery_selector() -> String {
    "div[class^='_gallery_']".to_string()
}

fn default_slide_selector() -> String {
    "div[class^='_slide_']".to_string()
}
