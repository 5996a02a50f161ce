//! Security utilities for input validation and sanitization.
//!
//! This module provides SSRF protection for the one user-supplied URL the
//! pipeline ever fetches from (`audioUrl`, and transitively the artwork
//! URL carried in `podcast.artwork`): there is no platform whitelist here,
//! since unlike the teacher's video-platform intake, source audio can come
//! from any podcast host, but internal/metadata endpoints are still blocked.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;
use url::Url;

/// Maximum URL length to prevent DoS attacks.
const MAX_URL_LENGTH: usize = 2048;

/// Maximum title length.
pub const MAX_TITLE_LENGTH: usize = 500;

/// Blocked URL patterns (internal/cloud-metadata endpoints).
static BLOCKED_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"^https?://127\.").unwrap(),
        Regex::new(r"^https?://localhost").unwrap(),
        Regex::new(r"^https?://10\.").unwrap(),
        Regex::new(r"^https?://172\.(1[6-9]|2[0-9]|3[0-1])\.").unwrap(),
        Regex::new(r"^https?://192\.168\.").unwrap(),
        Regex::new(r"^https?://169\.254\.").unwrap(),
        Regex::new(r"^https?://\[::1\]").unwrap(),
        Regex::new(r"^https?://\[fd").unwrap(),
        Regex::new(r"^https?://\[fe80").unwrap(),
        Regex::new(r"^https?://metadata\.").unwrap(),
        Regex::new(r"^https?://169\.254\.169\.254").unwrap(),
        Regex::new(r"^https?://metadata\.google\.internal").unwrap(),
    ]
});

/// Result of fetch-target URL validation.
#[derive(Debug)]
pub enum UrlValidationResult {
    Valid(String),
    Invalid(String),
    Blocked(String),
    TooLong,
}

impl UrlValidationResult {
    pub fn into_result(self) -> Result<String, String> {
        match self {
            Self::Valid(url) => Ok(url),
            Self::Invalid(msg) => Err(msg),
            Self::Blocked(reason) => Err(reason),
            Self::TooLong => Err(format!("URL exceeds maximum length of {} characters", MAX_URL_LENGTH)),
        }
    }
}

/// Validate a URL the pipeline will itself `GET` (audio source, artwork):
/// length, protocol, and blocked internal/metadata patterns.
pub fn validate_fetch_url(url: &str) -> UrlValidationResult {
    if url.len() > MAX_URL_LENGTH {
        return UrlValidationResult::TooLong;
    }

    let url = url.trim();
    if url.is_empty() {
        return UrlValidationResult::Invalid("URL cannot be empty".to_string());
    }

    let parsed = match Url::parse(url) {
        Ok(u) => u,
        Err(e) => return UrlValidationResult::Invalid(format!("Invalid URL format: {}", e)),
    };

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return UrlValidationResult::Invalid(format!(
                "Invalid protocol '{}'. Only HTTP and HTTPS are allowed.",
                scheme
            ))
        }
    }

    for pattern in BLOCKED_PATTERNS.iter() {
        if pattern.is_match(url) {
            warn!(url = %url, "Blocked URL pattern detected");
            return UrlValidationResult::Blocked(
                "URL appears to target an internal or restricted endpoint".to_string(),
            );
        }
    }

    UrlValidationResult::Valid(url.to_string())
}

/// Validate job ID format before it reaches a storage path lookup.
///
/// Valid format: alphanumeric characters only (job IDs are hex UUIDs), 8-64 chars.
pub fn is_valid_job_id(id: &str) -> bool {
    if id.is_empty() || id.len() > 64 || id.len() < 8 {
        return false;
    }
    id.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Sanitize a title for safe storage/logging.
pub fn sanitize_title(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.len() > MAX_TITLE_LENGTH {
        trimmed.chars().take(MAX_TITLE_LENGTH).collect()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_https_urls() {
        assert!(matches!(
            validate_fetch_url("https://cdn.example.com/episode.mp3"),
            UrlValidationResult::Valid(_)
        ));
    }

    #[test]
    fn blocks_internal_ips_and_metadata_endpoints() {
        assert!(matches!(validate_fetch_url("http://127.0.0.1/x.mp3"), UrlValidationResult::Blocked(_)));
        assert!(matches!(validate_fetch_url("http://localhost/x.mp3"), UrlValidationResult::Blocked(_)));
        assert!(matches!(validate_fetch_url("http://192.168.1.1/x.mp3"), UrlValidationResult::Blocked(_)));
        assert!(matches!(
            validate_fetch_url("http://169.254.169.254/latest/meta-data/"),
            UrlValidationResult::Blocked(_)
        ));
    }

    #[test]
    fn rejects_non_http_protocols() {
        assert!(matches!(validate_fetch_url("ftp://example.com/x.mp3"), UrlValidationResult::Invalid(_)));
        assert!(matches!(validate_fetch_url("javascript:alert(1)"), UrlValidationResult::Invalid(_)));
    }

    #[test]
    fn job_id_validation() {
        assert!(is_valid_job_id("0123456789abcdef0123456789abcdef"));
        assert!(!is_valid_job_id("short"));
        assert!(!is_valid_job_id("has/slash"));
        assert!(!is_valid_job_id("has-hyphen"));
    }
}
