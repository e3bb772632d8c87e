//! Capabilities the location core consumes from the host platform.
//!
//! Directory listing, entry enhancement, identifier generation and the
//! well-known device folders are all injected so the registry and the tree
//! loader stay testable without touching the real file system.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::error::ListingError;
use crate::locations::types::{DirectoryEntry, RawEntry};

/// Single-level, non-recursive directory listing.
#[async_trait]
pub trait DirectoryLister: Send + Sync {
    async fn list_directory(
        &self,
        path: &Path,
        include_files: bool,
    ) -> Result<Vec<RawEntry>, ListingError>;
}

pub trait EntryEnhancer: Send + Sync {
    fn enhance(&self, entry: RawEntry) -> DirectoryEntry;
}

pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Lists directories with `tokio::fs`.
///
/// `include_files` only controls metadata loading: file entries are always
/// reported so callers can classify them, but their size is left at zero
/// when it is `false`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsDirectoryLister;

#[async_trait]
impl DirectoryLister for FsDirectoryLister {
    async fn list_directory(
        &self,
        path: &Path,
        include_files: bool,
    ) -> Result<Vec<RawEntry>, ListingError> {
        let io_err = |source: std::io::Error| ListingError::Io {
            path: path.to_path_buf(),
            source,
        };

        let meta = tokio::fs::metadata(path).await.map_err(io_err)?;
        if !meta.is_dir() {
            return Err(ListingError::NotADirectory {
                path: path.to_path_buf(),
            });
        }

        let mut dir = tokio::fs::read_dir(path).await.map_err(io_err)?;
        let mut entries = Vec::new();

        while let Some(entry) = dir.next_entry().await.map_err(io_err)? {
            // Symlinks are classified by their target; dangling ones by the link itself.
            let meta = match tokio::fs::metadata(entry.path()).await {
                Ok(meta) => meta,
                Err(_) => match entry.metadata().await {
                    Ok(meta) => meta,
                    // Vanished between readdir and stat.
                    Err(_) => continue,
                },
            };
            let is_file = !meta.is_dir();
            let last_modified = meta
                .modified()
                .ok()
                .map(|t| chrono::DateTime::<chrono::Utc>::from(t).to_rfc3339());

            entries.push(RawEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                path: entry.path().to_string_lossy().into_owned(),
                is_file,
                size: if is_file && include_files { meta.len() } else { 0 },
                last_modified,
            });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

/// Assigns an identifier and classifies the extension.
///
/// The identifier is a name-based UUID of the entry's path, so reloading a
/// tree yields the same ids and log entries keyed by them stay attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultEnhancer;

impl EntryEnhancer for DefaultEnhancer {
    fn enhance(&self, entry: RawEntry) -> DirectoryEntry {
        let extension = if entry.is_file {
            Path::new(&entry.name)
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_lowercase)
                .unwrap_or_default()
        } else {
            String::new()
        };

        DirectoryEntry {
            uuid: uuid::Uuid::new_v5(&uuid::Uuid::NAMESPACE_URL, entry.path.as_bytes())
                .to_string(),
            name: entry.name,
            path: entry.path,
            is_file: entry.is_file,
            extension,
            size: entry.size,
            last_modified: entry.last_modified,
            children: None,
        }
    }
}

/// Named well-known folders, in seeding order.
pub type DevicePaths = Vec<(String, PathBuf)>;

/// Desktop, documents, downloads, music, pictures and videos of the current
/// user. Folders the platform does not define are skipped.
pub fn default_device_paths() -> DevicePaths {
    let Some(dirs) = directories::UserDirs::new() else {
        return Vec::new();
    };

    [
        ("desktop", dirs.desktop_dir()),
        ("documents", dirs.document_dir()),
        ("downloads", dirs.download_dir()),
        ("music", dirs.audio_dir()),
        ("pictures", dirs.picture_dir()),
        ("videos", dirs.video_dir()),
    ]
    .into_iter()
    .filter_map(|(key, dir)| dir.map(|d| (key.to_string(), d.to_path_buf())))
    .collect()
}
