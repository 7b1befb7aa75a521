use std::env;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_API_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 30_000;

/// Distinguishes runtime behavior for different stages of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the job portal client.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub api: ApiConfig,
    pub polling: PollingConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load settings from the process environment, after applying any `.env` file.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let base_url = env::var("JOB_PORTAL_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        let base_url = validate_base_url(base_url)?;

        let token = env::var("JOB_PORTAL_API_TOKEN")
            .ok()
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty());

        let timeout = read_millis("JOB_PORTAL_API_TIMEOUT_MS", DEFAULT_API_TIMEOUT_MS)
            .ok_or(ConfigError::InvalidTimeout)?;
        let interval = read_millis("JOB_PORTAL_POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL_MS)
            .ok_or(ConfigError::InvalidPollInterval)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            api: ApiConfig {
                base_url,
                token,
                timeout,
            },
            polling: PollingConfig { interval },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Parses a positive millisecond count, returning `None` when set but invalid.
fn read_millis(key: &str, default: u64) -> Option<Duration> {
    let millis = match env::var(key) {
        Ok(raw) => raw.trim().parse::<u64>().ok()?,
        Err(_) => default,
    };
    (millis > 0).then(|| Duration::from_millis(millis))
}

/// Accepts http(s) URLs, trimming whitespace and trailing slashes.
pub fn validate_base_url(raw: String) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_string())
    } else {
        Err(ConfigError::InvalidBaseUrl { value: raw })
    }
}

/// Settings for the REST backend.
#[derive(Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            token: None,
            timeout: Duration::from_millis(DEFAULT_API_TIMEOUT_MS),
        }
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Cadence of application status polling.
#[derive(Debug, Clone)]
pub struct PollingConfig {
    pub interval: Duration,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidBaseUrl { value: String },
    InvalidTimeout,
    InvalidPollInterval,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidBaseUrl { value } => write!(
                f,
                "JOB_PORTAL_API_BASE_URL must be an http(s) URL, got '{}'",
                value
            ),
            ConfigError::InvalidTimeout => {
                write!(f, "JOB_PORTAL_API_TIMEOUT_MS must be a positive integer")
            }
            ConfigError::InvalidPollInterval => {
                write!(f, "JOB_PORTAL_POLL_INTERVAL_MS must be a positive integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
