use anyhow::{Context, Result};

use crate::ui::upload_form::FormVariant;

const DEFAULT_BACKEND_UPLOAD_URL: &str = "http://localhost:5000/api/upload";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;
const DEFAULT_SESSION_IDLE_SECS: u64 = 60 * 60;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Full URL of the portfolio service's upload endpoint.
    pub backend_upload_url: String,
    pub port: u16,
    pub form_variant: FormVariant,
    /// Request body limit for `POST /generate`.
    pub max_upload_bytes: usize,
    /// Unset means the backend call may take as long as it needs.
    pub backend_timeout_secs: Option<u64>,
    /// How long a browser session's form and result survive without a request.
    pub session_idle_secs: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            backend_upload_url: std::env::var("BACKEND_UPLOAD_URL")
                .unwrap_or_else(|_| DEFAULT_BACKEND_UPLOAD_URL.to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            form_variant: std::env::var("FORM_VARIANT")
                .unwrap_or_else(|_| "with-provider".to_string())
                .parse::<FormVariant>()
                .context("FORM_VARIANT must be 'with-provider' or 'file-only'")?,
            max_upload_bytes: optional_env("MAX_UPLOAD_BYTES")?
                .map(|v| v.parse::<usize>())
                .transpose()
                .context("MAX_UPLOAD_BYTES must be a byte count")?
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            backend_timeout_secs: optional_env("BACKEND_TIMEOUT_SECS")?
                .map(|v| v.parse::<u64>())
                .transpose()
                .context("BACKEND_TIMEOUT_SECS must be a whole number of seconds")?,
            session_idle_secs: optional_env("SESSION_IDLE_SECS")?
                .map(|v| v.parse::<u64>())
                .transpose()
                .context("SESSION_IDLE_SECS must be a whole number of seconds")?
                .unwrap_or(DEFAULT_SESSION_IDLE_SECS),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Reads a variable that may be absent. Present-but-not-unicode is an error.
fn optional_env(key: &str) -> Result<Option<String>> {
    match std::env::var(key) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value.trim().to_string())),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Environment variable '{key}' is not valid unicode")),
    }
}
