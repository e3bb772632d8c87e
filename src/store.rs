use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::locations::types::Location;

/// YAML file holding the registry between runs.
///
/// Sub-directory caches are derived data and are never written.
#[derive(Debug, Clone)]
pub struct LocationStore {
    path: PathBuf,
}

impl LocationStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `locations.yaml` under the platform data directory, if one exists.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "folderdeck")
            .map(|dirs| dirs.data_dir().join("locations.yaml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when nothing has been saved yet.
    pub async fn load(&self) -> Result<Option<Vec<Location>>, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let locations: Vec<Location> =
            serde_yaml::from_str(&content).map_err(|source| StoreError::Decode {
                path: self.path.clone(),
                source,
            })?;

        Ok(Some(locations))
    }

    pub async fn save(&self, locations: &[Location]) -> Result<(), StoreError> {
        let stripped: Vec<Location> = locations
            .iter()
            .map(|l| Location {
                children: None,
                ..l.clone()
            })
            .collect();
        let content = serde_yaml::to_string(&stripped).map_err(StoreError::Encode)?;

        let write_err = |source: std::io::Error| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
            }
        }

        // Write beside the target and rename so a crash never leaves half a file.
        let mut tmp_name = self.path.clone().into_os_string();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        tokio::fs::write(&tmp_path, content).await.map_err(write_err)?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(write_err)?;

        Ok(())
    }
}
