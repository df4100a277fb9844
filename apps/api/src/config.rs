use anyhow::{Context, Result};

use crate::ingest::acquire::DEFAULT_LINE_TOLERANCE;
use crate::ingest::dispatch::DEFAULT_MAX_UPLOAD_BYTES;

/// Application configuration loaded from environment variables.
/// Every variable is optional; a value that does not parse is a startup error.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Largest accepted upload, in bytes.
    pub max_upload_bytes: usize,
    /// Vertical band, in PDF layout units, within which fragments share a line.
    pub pdf_line_tolerance: f32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            pdf_line_tolerance: DEFAULT_LINE_TOLERANCE,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        Ok(Config {
            port: parse_env("PORT", defaults.port).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
            pdf_line_tolerance: parse_env("PDF_LINE_TOLERANCE", defaults.pdf_line_tolerance)
                .context("PDF_LINE_TOLERANCE must be a number")?,
        })
    }
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
            .with_context(|| format!("Invalid value '{raw}' for '{key}'")),
        Err(_) => Ok(default),
    }
}
