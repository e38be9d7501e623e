use axum::http::HeaderValue;
use hookhub_core::signature::WebhookSecret;

/// Log output format selected by `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// An environment variable holds a value that cannot be used.
#[derive(Debug, thiserror::Error)]
#[error("invalid value for {var}: {value:?} ({reason})")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// SQLite database URL (default: `sqlite://data/hookhub.db`).
    pub database_url: String,
    /// Shared webhook signing secret. `None` disables signature checks.
    pub webhook_secret: Option<WebhookSecret>,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    /// Empty disables the CORS layer.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Largest accepted request body in bytes (default: 25 MiB).
    pub max_body_bytes: usize,
    /// Log output format (default: text).
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                    |
    /// |-------------------------|----------------------------|
    /// | `HOST`                  | `0.0.0.0`                  |
    /// | `PORT`                  | `8000`                     |
    /// | `DATABASE_URL`          | `sqlite://data/hookhub.db` |
    /// | `GITHUB_WEBHOOK_SECRET` | unset (no verification)    |
    /// | `CORS_ORIGINS`          | unset (CORS disabled)      |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                       |
    /// | `MAX_BODY_BYTES`        | `26214400`                 |
    /// | `LOG_FORMAT`            | `text`                     |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = var("HOST", "0.0.0.0");
        let port = parse_number("PORT", var("PORT", "8000"))?;
        let database_url = var("DATABASE_URL", "sqlite://data/hookhub.db");

        let webhook_secret = lookup("GITHUB_WEBHOOK_SECRET").and_then(WebhookSecret::new);

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if let Some(bad) = cors_origins
            .iter()
            .find(|o| o.parse::<HeaderValue>().is_err())
        {
            return Err(ConfigError {
                var: "CORS_ORIGINS",
                value: bad.clone(),
                reason: "not a valid origin header value".to_string(),
            });
        }

        let request_timeout_secs =
            parse_number("REQUEST_TIMEOUT_SECS", var("REQUEST_TIMEOUT_SECS", "30"))?;
        let max_body_bytes = parse_number("MAX_BODY_BYTES", var("MAX_BODY_BYTES", "26214400"))?;

        let log_format = match var("LOG_FORMAT", "text").to_ascii_lowercase().as_str() {
            "text" | "pretty" => LogFormat::Text,
            "json" => LogFormat::Json,
            other => {
                return Err(ConfigError {
                    var: "LOG_FORMAT",
                    value: other.to_string(),
                    reason: "expected `text` or `json`".to_string(),
                })
            }
        };

        Ok(Self {
            host,
            port,
            database_url,
            webhook_secret,
            cors_origins,
            request_timeout_secs,
            max_body_bytes,
            log_format,
        })
    }
}

fn parse_number<T>(var: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let parsed = value.trim().parse::<T>();
    parsed.map_err(|e| ConfigError {
        var,
        reason: e.to_string(),
        value,
    })
}
