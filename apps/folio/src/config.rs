use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use uuid::Uuid;

/// Client configuration loaded from environment variables.
/// Everything has a default except the optional remote store and session.
#[derive(Debug, Clone)]
pub struct Config {
    /// Remote document store. Local JSON files are used alone when unset.
    pub database_url: Option<String>,
    pub store_dir: PathBuf,
    pub download_dir: PathBuf,
    /// Signed-in account. `None` means no session.
    pub account_id: Option<Uuid>,
    pub account_email: Option<String>,
    pub font_dirs: Vec<PathBuf>,
    pub settle_delay_ms: u64,
    pub preview_settle_delay_ms: u64,
    pub image_timeout_ms: u64,
    pub capture_timeout_ms: Option<u64>,
    pub allowed_image_origins: Vec<String>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let account_id = optional_env("FOLIO_ACCOUNT_ID")
            .map(|raw| {
                Uuid::parse_str(&raw).context("FOLIO_ACCOUNT_ID must be a valid UUID")
            })
            .transpose()?;

        let font_dirs = optional_env("FOLIO_FONT_DIR")
            .map(|raw| {
                std::env::split_paths(&raw)
                    .filter(|p| !p.as_os_str().is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let allowed_image_origins = optional_env("FOLIO_ALLOWED_IMAGE_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().trim_end_matches('/').to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            store_dir: optional_env("FOLIO_STORE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".folio")),
            download_dir: optional_env("FOLIO_DOWNLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            account_id,
            account_email: optional_env("FOLIO_ACCOUNT_EMAIL"),
            font_dirs,
            settle_delay_ms: parse_env("FOLIO_SETTLE_DELAY_MS", 500)?,
            preview_settle_delay_ms: parse_env("FOLIO_PREVIEW_SETTLE_DELAY_MS", 300)?,
            image_timeout_ms: parse_env("FOLIO_IMAGE_TIMEOUT_MS", 15_000)?,
            capture_timeout_ms: optional_env("FOLIO_CAPTURE_TIMEOUT_MS")
                .map(|raw| {
                    raw.parse::<u64>()
                        .context("FOLIO_CAPTURE_TIMEOUT_MS must be a number of milliseconds")
                })
                .transpose()?,
            allowed_image_origins,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn preview_settle_delay(&self) -> Duration {
        Duration::from_millis(self.preview_settle_delay_ms)
    }

    pub fn image_timeout(&self) -> Duration {
        Duration::from_millis(self.image_timeout_ms)
    }

    pub fn capture_timeout(&self) -> Option<Duration> {
        self.capture_timeout_ms.map(Duration::from_millis)
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env(key: &str, default: u64) -> Result<u64> {
    match optional_env(key) {
        Some(raw) => raw
            .parse::<u64>()
            .with_context(|| format!("Environment variable '{key}' must be a whole number")),
        None => Ok(default),
    }
}
