//! Image resources referenced by the clone.
//!
//! Inline `data:` URIs and local files are always readable. Remote images are
//! fetched only from allowed origins, each bounded by the image timeout. Any
//! source that cannot be read is left out of the map and simply not drawn; it
//! never fails the capture.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tracing::{debug, warn};

/// Raw bytes per image source, as written in the `src` attribute.
pub type ImageBytes = HashMap<String, Vec<u8>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceKind {
    DataUri,
    Remote,
    Local,
}

fn classify(src: &str) -> SourceKind {
    let lower = src.trim_start().to_ascii_lowercase();
    if lower.starts_with("data:") {
        SourceKind::DataUri
    } else if lower.starts_with("http://") || lower.starts_with("https://") {
        SourceKind::Remote
    } else {
        SourceKind::Local
    }
}

pub struct ResourceLoader {
    client: reqwest::Client,
    allowed_origins: Vec<String>,
    timeout: Duration,
}

impl ResourceLoader {
    pub fn new(allowed_origins: Vec<String>, timeout: Duration) -> Self {
        ResourceLoader {
            client: reqwest::Client::new(),
            allowed_origins: allowed_origins
                .into_iter()
                .map(|o| o.trim_end_matches('/').to_ascii_lowercase())
                .collect(),
            timeout,
        }
    }

    /// Loads every distinct source; unreadable ones are skipped with a warning.
    pub async fn prefetch(&self, sources: &[String]) -> ImageBytes {
        let mut loaded = ImageBytes::new();
        for src in sources {
            if src.is_empty() || loaded.contains_key(src) {
                continue;
            }
            match self.load(src).await {
                Ok(bytes) => {
                    loaded.insert(src.clone(), bytes);
                }
                Err(reason) => {
                    warn!(src = %truncate(src), "Excluding image from capture: {reason}")
                }
            }
        }
        debug!(requested = sources.len(), loaded = loaded.len(), "Prefetched images");
        loaded
    }

    async fn load(&self, src: &str) -> Result<Vec<u8>, String> {
        match classify(src) {
            SourceKind::DataUri => {
                decode_data_uri(src).ok_or_else(|| "malformed data URI".to_string())
            }
            SourceKind::Local => {
                let path = src.strip_prefix("file://").unwrap_or(src);
                tokio::fs::read(Path::new(path))
                    .await
                    .map_err(|e| format!("unreadable file: {e}"))
            }
            SourceKind::Remote => {
                if !self.is_allowed_origin(src) {
                    return Err("cross-origin source".to_string());
                }
                self.fetch_remote(src).await
            }
        }
    }

    async fn fetch_remote(&self, url: &str) -> Result<Vec<u8>, String> {
        let request = async {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .and_then(|r| r.error_for_status())
                .map_err(|e| format!("request failed: {e}"))?;
            response
                .bytes()
                .await
                .map(|b| b.to_vec())
                .map_err(|e| format!("body read failed: {e}"))
        };
        tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| format!("timed out after {}ms", self.timeout.as_millis()))?
    }

    pub fn is_allowed_origin(&self, url: &str) -> bool {
        let Ok(parsed) = reqwest::Url::parse(url) else {
            return false;
        };
        let origin = parsed.origin().ascii_serialization().to_ascii_lowercase();
        self.allowed_origins.iter().any(|o| *o == origin)
    }
}

/// Payload of a base64 `data:` URI.
pub fn decode_data_uri(uri: &str) -> Option<Vec<u8>> {
    let rest = uri.trim().strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    if !header.split(';').any(|p| p.eq_ignore_ascii_case("base64")) {
        return None;
    }
    STANDARD.decode(payload.trim()).ok()
}

fn truncate(src: &str) -> &str {
    match src.char_indices().nth(80) {
        Some((idx, _)) => &src[..idx],
        None => src,
    }
}
