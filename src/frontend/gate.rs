//! Production precondition on the built UI bundle.
//!
//! The backend serves the bundle under a fixed base path. A bundle built
//! without that base path loads a blank page, so the gate checks the index
//! file for asset URLs carrying the prefix.

use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config::DepotConfig;
use crate::error::{DepotError, Result};

/// Read-only check of the UI build output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactGate {
    index: PathBuf,
    marker: String,
    base_path: String,
    base_path_var: String,
}

/// What a passing gate found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactReport {
    /// The index file that was inspected.
    pub index: PathBuf,
    /// The base-path marker it contains.
    pub marker: String,
}

impl ArtifactGate {
    /// Gate for a project's configured bundle.
    pub fn from_config(config: &DepotConfig, project_root: &Path) -> Self {
        let frontend = &config.frontend;
        Self {
            index: dist_dir(config, project_root).join(&frontend.index_file),
            marker: frontend.marker(),
            base_path: frontend.base_path.clone(),
            base_path_var: frontend.base_path_var.clone(),
        }
    }

    /// Path of the index file the gate inspects.
    pub fn index(&self) -> &Path {
        &self.index
    }

    /// Substring the index file must contain.
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Inspect the bundle. Never modifies anything.
    pub fn check(&self) -> Result<ArtifactReport> {
        if self.index.is_dir() {
            return Err(self.missing());
        }
        let content = match fs::read(&self.index) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(self.missing()),
            Err(e) => return Err(e.into()),
        };

        // Bundles may embed bytes that are not UTF-8; the marker is ASCII.
        if !contains_bytes(&content, self.marker.as_bytes()) {
            return Err(DepotError::ArtifactMisconfigured {
                path: self.index.clone(),
                marker: self.marker.clone(),
                hint: format!(
                    "Rebuild with {}={} (run 'depot build').",
                    self.base_path_var, self.base_path
                ),
            });
        }

        tracing::debug!("{} references {}", self.index.display(), self.marker);
        Ok(ArtifactReport {
            index: self.index.clone(),
            marker: self.marker.clone(),
        })
    }

    fn missing(&self) -> DepotError {
        DepotError::ArtifactMissing {
            path: self.index.clone(),
            hint: format!(
                "Run 'depot build' (or build the frontend with {}={}) first.",
                self.base_path_var, self.base_path
            ),
        }
    }
}

fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|w| w == needle)
}

/// Absolute path of the build output directory.
pub fn dist_dir(config: &DepotConfig, project_root: &Path) -> PathBuf {
    project_root
        .join(&config.frontend.dir)
        .join(&config.frontend.dist_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const GOOD_INDEX: &str = r#"<!doctype html>
<html>
  <head>
    <script type="module" crossorigin src="/ui/assets/index-4f2a.js"></script>
    <link rel="stylesheet" href="/ui/assets/index-91c0.css">
  </head>
  <body><div id="root"></div></body>
</html>
"#;

    fn gate_with_index(content: Option<&str>) -> (TempDir, ArtifactGate) {
        let temp = TempDir::new().unwrap();
        let config = DepotConfig::default();
        if let Some(content) = content {
            let dist = dist_dir(&config, temp.path());
            fs::create_dir_all(&dist).unwrap();
            fs::write(dist.join("index.html"), content).unwrap();
        }
        let gate = ArtifactGate::from_config(&config, temp.path());
        (temp, gate)
    }

    #[test]
    fn correctly_built_bundle_passes() {
        let (_temp, gate) = gate_with_index(Some(GOOD_INDEX));
        let report = gate.check().unwrap();
        assert_eq!(report.marker, "/ui/assets/");
        assert!(report.index.ends_with("frontend/dist/index.html"));
    }

    #[test]
    fn missing_index_is_artifact_missing() {
        let (_temp, gate) = gate_with_index(None);
        let err = gate.check().unwrap_err();
        assert!(matches!(err, DepotError::ArtifactMissing { .. }));
        assert!(err.to_string().contains("depot build"));
    }

    #[test]
    fn root_relative_assets_are_misconfigured() {
        let (_temp, gate) = gate_with_index(Some(
            r#"<script type="module" src="/assets/index-4f2a.js"></script>"#,
        ));
        let err = gate.check().unwrap_err();
        match err {
            DepotError::ArtifactMisconfigured { marker, hint, .. } => {
                assert_eq!(marker, "/ui/assets/");
                assert!(hint.contains("VITE_BASE_PATH=/ui/"));
            }
            other => panic!("Expected ArtifactMisconfigured, got {:?}", other),
        }
    }

    #[test]
    fn marker_follows_configured_base_path() {
        let temp = TempDir::new().unwrap();
        let mut config = DepotConfig::default();
        config.frontend.base_path = "/app/".to_string();
        let dist = dist_dir(&config, temp.path());
        fs::create_dir_all(&dist).unwrap();
        fs::write(dist.join("index.html"), GOOD_INDEX).unwrap();

        let gate = ArtifactGate::from_config(&config, temp.path());
        assert_eq!(gate.marker(), "/app/assets/");
        assert!(gate.check().is_err());
    }

    #[test]
    fn non_utf8_index_is_searched_as_bytes() {
        let temp = TempDir::new().unwrap();
        let config = DepotConfig::default();
        let dist = dist_dir(&config, temp.path());
        fs::create_dir_all(&dist).unwrap();
        let mut content = br#"<script src="/ui/assets/index.js"></script><!-- "#.to_vec();
        content.extend_from_slice(&[0xFF, b' ', b'-', b'-', b'>']);
        fs::write(dist.join("index.html"), &content).unwrap();

        let gate = ArtifactGate::from_config(&config, temp.path());
        assert_eq!(gate.check().unwrap().marker, "/ui/assets/");

        fs::write(dist.join("index.html"), [0xFF, 0xFE, b'/', b'a']).unwrap();
        assert!(matches!(
            gate.check().unwrap_err(),
            DepotError::ArtifactMisconfigured { .. }
        ));
    }

    #[test]
    fn directory_at_index_path_is_artifact_missing() {
        let temp = TempDir::new().unwrap();
        let config = DepotConfig::default();
        fs::create_dir_all(dist_dir(&config, temp.path()).join("index.html")).unwrap();

        let err = ArtifactGate::from_config(&config, temp.path()).check().unwrap_err();
        assert!(matches!(err, DepotError::ArtifactMissing { .. }));
    }

    #[test]
    fn check_does_not_modify_bundle() {
        let (_temp, gate) = gate_with_index(Some("<html></html>"));
        let _ = gate.check();
        assert_eq!(fs::read_to_string(gate.index()).unwrap(), "<html></html>");
    }
}
