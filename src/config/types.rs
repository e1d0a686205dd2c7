use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Default site root all listing, detail and embed URLs hang off
pub const DEFAULT_BASE_URL: &str = "https://1games.io";

/// Default browser-like user agent sent with every request
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Main configuration structure for Embed-Scout
///
/// Every key is optional; an empty file yields [`Config::default`].
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Site root used to build listing and embed URLs
    pub base_url: String,

    /// Categories scraped when none are given on the command line
    pub categories: Vec<String>,

    /// Number of listing pages fetched per category
    pub max_pages: u32,

    /// Pause between consecutive requests (seconds)
    pub rate_limit_seconds: f64,

    /// Whether to enrich summaries with detail + embed pages and keep only embeddable games
    pub scrape_iframes: bool,

    /// Total attempts per request, including the first
    pub retry_attempts: u32,

    /// Per-request timeout (seconds)
    pub timeout_seconds: u64,

    /// Page size requested from the listing endpoint
    pub games_per_page: u32,

    /// User agent header value
    pub user_agent: String,

    /// Directory receiving `<category>_games.json` files
    pub output_dir: PathBuf,

    /// Directory receiving per-run log files
    pub log_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            categories: vec!["action".to_string()],
            max_pages: 2,
            rate_limit_seconds: 1.5,
            scrape_iframes: true,
            retry_attempts: 3,
            timeout_seconds: 30,
            games_per_page: 50,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            output_dir: PathBuf::from("data"),
            log_dir: PathBuf::from("logs"),
        }
    }
}

impl Config {
    /// The configured rate limit as a [`Duration`]
    pub fn rate_limit(&self) -> Duration {
        Duration::try_from_secs_f64(self.rate_limit_seconds.max(0.0)).unwrap_or(Duration::MAX)
    }

    /// The configured per-request timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}
