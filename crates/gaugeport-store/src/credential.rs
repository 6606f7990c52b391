//! Bearer credential loading.
//!
//! The token is read once at startup and passed through to every store
//! request without inspection.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("failed to read credential {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("credential file {0} is empty")]
    Empty(PathBuf),
}

/// Read the bearer token from `path`, trimming surrounding whitespace.
pub fn load_token(path: &Path) -> Result<String, CredentialError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CredentialError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let token = raw.trim();
    if token.is_empty() {
        return Err(CredentialError::Empty(path.to_path_buf()));
    }
    Ok(token.to_string())
}
