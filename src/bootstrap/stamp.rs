//! Install stamps.
//!
//! After a successful install depot records which manifest it installed,
//! so `depot check` can tell the operator when `requirements.txt` changed
//! since the last bootstrap.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// File name of the stamp inside the venv directory.
pub const STAMP_FILE: &str = ".depot-install.json";

/// Record of the last successful dependency install.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallStamp {
    /// SHA-256 of the manifest contents, hex encoded.
    pub requirements_sha256: String,
    /// When the install finished.
    pub installed_at: DateTime<Utc>,
}

impl InstallStamp {
    /// Stamp for the manifest at `requirements`, dated now.
    pub fn for_manifest(requirements: &Path) -> Result<Self> {
        Ok(Self {
            requirements_sha256: hash_file(requirements)?,
            installed_at: Utc::now(),
        })
    }

    /// Location of the stamp for a venv root.
    pub fn path(venv_root: &Path) -> PathBuf {
        venv_root.join(STAMP_FILE)
    }

    /// Load the stamp for a venv, if one was written.
    pub fn load(venv_root: &Path) -> Option<Self> {
        let content = fs::read_to_string(Self::path(venv_root)).ok()?;
        match serde_json::from_str(&content) {
            Ok(stamp) => Some(stamp),
            Err(e) => {
                tracing::warn!("Ignoring unreadable install stamp: {}", e);
                None
            }
        }
    }

    /// Persist the stamp into the venv.
    pub fn save(&self, venv_root: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(anyhow::Error::from)?;
        fs::write(Self::path(venv_root), json)?;
        Ok(())
    }

    /// Whether the manifest still matches what was installed.
    pub fn is_current(&self, requirements: &Path) -> bool {
        hash_file(requirements)
            .map(|hash| hash == self.requirements_sha256)
            .unwrap_or(false)
    }
}

fn hash_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    let digest = Sha256::digest(&bytes);
    Ok(hex::encode(&digest[..]))
}
