/// Configuration management for the client
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `GRAMSETU_API_URL`: Base URL of the REST API (default: http://localhost:5000/api)
/// - `GRAMSETU_TIMEOUT_SECS`: Per-request timeout in seconds (default: 15)
/// - `GRAMSETU_TOKEN_FILE`: Optional path for the persistent token store
///
/// # Example
///
/// ```no_run
/// use gramsetu_client::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Talking to {}", config.base_url);
/// # Ok(())
/// # }
/// ```
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default API base URL for local development
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Default per-request timeout, matching the upstream transport
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Client configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the REST API, without a trailing slash
    pub base_url: String,

    /// Fixed per-request timeout
    pub timeout: Duration,

    /// Path for the persistent token store (None keeps tokens in memory)
    pub token_file: Option<PathBuf>,
}

impl Config {
    /// Creates a configuration with the given base URL and default timeout
    pub fn new(base_url: impl Into<String>) -> Self {
        Config {
            base_url: trim_base_url(base_url.into()),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            token_file: None,
        }
    }

    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `GRAMSETU_API_URL` is empty or not an
    /// `http`/`https` URL, or if `GRAMSETU_TIMEOUT_SECS` cannot be parsed.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let base_url =
            env::var("GRAMSETU_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let base_url = validate_base_url(trim_base_url(base_url))?;

        let timeout_secs = env::var("GRAMSETU_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()?;

        let token_file = env::var("GRAMSETU_TOKEN_FILE").ok().map(PathBuf::from);

        Ok(Config {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            token_file,
        })
    }

    /// Sets the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the persistent token store path
    pub fn with_token_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_file = Some(path.into());
        self
    }
}

fn trim_base_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn validate_base_url(url: String) -> anyhow::Result<String> {
    if url.is_empty() {
        anyhow::bail!("GRAMSETU_API_URL must not be empty");
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        anyhow::bail!("GRAMSETU_API_URL must be an http or https URL, got {url:?}");
    }
    Ok(url)
}
