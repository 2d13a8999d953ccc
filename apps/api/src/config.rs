use anyhow::{Context, Result};
use axum::http::HeaderValue;

/// Default chat-completion endpoint. Overridable via `COMPLETION_API_URL`.
pub const DEFAULT_COMPLETION_API_URL: &str = "https://api.deepseek.com/v1/chat/completions";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
const DEFAULT_HOST: &str = "127.0.0.1";

/// Application configuration loaded from environment variables.
/// Everything has a default except the API key, which stays unset unless the
/// operator provides one.
#[derive(Debug, Clone)]
pub struct Config {
    pub completion_api_url: String,
    /// Seeds the credential store at startup. Never defaulted.
    pub completion_api_key: Option<String>,
    pub completion_timeout_secs: u64,
    pub max_upload_bytes: usize,
    /// Bind address. Loopback unless the operator opts into wider exposure.
    pub host: String,
    pub port: u16,
    /// The one cross-origin caller allowed to use the API (e.g. a dev server
    /// serving the form). `None` means same-origin requests only.
    pub cors_allowed_origin: Option<HeaderValue>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            completion_api_url: std::env::var("COMPLETION_API_URL")
                .unwrap_or_else(|_| DEFAULT_COMPLETION_API_URL.to_string()),
            completion_api_key: optional_env("COMPLETION_API_KEY"),
            completion_timeout_secs: parse_env("COMPLETION_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            host: std::env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: parse_env("PORT", 8080)?,
            cors_allowed_origin: optional_env("CORS_ALLOWED_ORIGIN")
                .map(|origin| parse_origin(&origin))
                .transpose()?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Returns the variable only if it is set to something other than whitespace.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Origins are compared byte-for-byte with the `Origin` header, which never
/// carries a trailing slash.
fn parse_origin(raw: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(raw.trim_end_matches('/'))
        .with_context(|| format!("CORS_ALLOWED_ORIGIN is not a valid origin: {raw}"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Config used by unit tests; never touches the process environment.
    pub fn for_tests(completion_api_url: &str) -> Self {
        Config {
            completion_api_url: completion_api_url.to_string(),
            completion_api_key: None,
            completion_timeout_secs: 5,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            host: DEFAULT_HOST.to_string(),
            port: 0,
            cors_allowed_origin: None,
            rust_log: "debug".to_string(),
        }
    }
}
