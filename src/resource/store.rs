//! # State Store
//!
//! Reads and writes the persisted state document. A missing file means the
//! registration has no state (ABSENT).
//!
//! ```json
//! {
//!   "version": 1,
//!   "resource_type": "aws_lb_target_group_registration",
//!   "updated_at": "2026-01-01T00:00:00Z",
//!   "resource": { "id": "...", "target_group_arn": "...", "target": [] }
//! }
//! ```

use crate::constants::{RESOURCE_TYPE_NAME, STATE_FORMAT_VERSION};
use crate::resource::state::RegistrationState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access state file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse state file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("state file {path} has unsupported version {found} (expected {expected})")]
    UnsupportedVersion {
        path: PathBuf,
        found: u32,
        expected: u32,
    },
    #[error("state file {path} holds resource type {found:?}")]
    WrongResourceType { path: PathBuf, found: String },
}

/// On-disk state document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateDocument {
    pub version: u32,
    pub resource_type: String,
    pub updated_at: DateTime<Utc>,
    pub resource: RegistrationState,
}

impl StateDocument {
    #[must_use]
    pub fn new(resource: RegistrationState) -> Self {
        Self {
            version: STATE_FORMAT_VERSION,
            resource_type: RESOURCE_TYPE_NAME.to_string(),
            updated_at: Utc::now(),
            resource,
        }
    }
}

/// Load persisted state, or `None` when no state file exists
pub fn load_state(path: &Path) -> Result<Option<RegistrationState>, StoreError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No state file at {}", path.display());
            return Ok(None);
        }
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let document: StateDocument =
        serde_json::from_str(&raw).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    if document.version != STATE_FORMAT_VERSION {
        return Err(StoreError::UnsupportedVersion {
            path: path.to_path_buf(),
            found: document.version,
            expected: STATE_FORMAT_VERSION,
        });
    }
    if document.resource_type != RESOURCE_TYPE_NAME {
        return Err(StoreError::WrongResourceType {
            path: path.to_path_buf(),
            found: document.resource_type,
        });
    }

    Ok(Some(document.resource))
}

/// Write persisted state, replacing the file atomically
pub fn save_state(path: &Path, state: &RegistrationState) -> Result<(), StoreError> {
    let document = StateDocument::new(state.clone());
    let body = serde_json::to_string_pretty(&document).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let tmp_path = path.with_extension("tmp");
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    std::fs::write(&tmp_path, body).map_err(io_err)?;
    std::fs::rename(&tmp_path, path).map_err(io_err)?;
    debug!("Wrote state for {} to {}", state.id, path.display());
    Ok(())
}

/// Remove persisted state; returns false when there was none
pub fn remove_state(path: &Path) -> Result<bool, StoreError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}
