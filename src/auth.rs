//! API key resolution.
//!
//! The key is looked up in order: explicit caller value, the
//! `GEMINI_API_KEY` environment variable, then a key file under the platform
//! config directory (`gemini-image-gen/api_key`). The first hit wins.

use std::fs;
use std::path::PathBuf;

use thiserror::Error;

/// Environment variable consulted when no explicit key is given.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

const KEY_FILE_DIR: &str = "gemini-image-gen";
const KEY_FILE_NAME: &str = "api_key";

/// Errors that can occur while resolving the API key.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// No key was found in any of the supported locations.
    #[error(
        "no API key found: pass one explicitly, set {API_KEY_ENV}, or create {0}"
    )]
    Missing(String),
    /// The key file exists but could not be read.
    #[error("failed to read key file {path}: {source}")]
    Unreadable {
        /// Path of the key file that failed to read
        path: String,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

/// Resolves the API key, preferring an explicit value over the environment
/// over the key file.
pub fn resolve_api_key(explicit: Option<&str>) -> Result<String, CredentialError> {
    if let Some(key) = explicit {
        let key = key.trim();
        if !key.is_empty() {
            return Ok(key.to_string());
        }
    }

    if let Ok(key) = std::env::var(API_KEY_ENV) {
        if !key.trim().is_empty() {
            return Ok(key.trim().to_string());
        }
    }

    let path = key_file_path();
    if path.exists() {
        let key = fs::read_to_string(&path).map_err(|source| CredentialError::Unreadable {
            path: path.display().to_string(),
            source,
        })?;
        let key = key.trim();
        if !key.is_empty() {
            return Ok(key.to_string());
        }
    }

    Err(CredentialError::Missing(path.display().to_string()))
}

fn key_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(KEY_FILE_DIR)
        .join(KEY_FILE_NAME)
}
