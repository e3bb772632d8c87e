use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;

use crate::config::SettingsSource;
use crate::error::ListingError;
use crate::locations::registry::LocationRegistry;
use crate::locations::types::{DirectoryEntry, Location, LocationPatch};
use crate::logging::{LogCategory, LogManager};
use crate::platform_io::{DirectoryLister, EntryEnhancer};

pub type EntryFuture = Pin<Box<dyn Future<Output = DirectoryEntry> + Send + 'static>>;

/// Loads bounded-depth sub-directory trees under locations.
///
/// Listing failures never escape: they are logged and the node keeps the
/// children it already had.
#[derive(Clone)]
pub struct TreeLoader {
    lister: Arc<dyn DirectoryLister>,
    enhancer: Arc<dyn EntryEnhancer>,
    settings: Arc<dyn SettingsSource>,
    logs: LogManager,
}

impl TreeLoader {
    pub fn new(
        lister: Arc<dyn DirectoryLister>,
        enhancer: Arc<dyn EntryEnhancer>,
        settings: Arc<dyn SettingsSource>,
        logs: LogManager,
    ) -> Self {
        Self {
            lister,
            enhancer,
            settings,
            logs,
        }
    }

    pub fn logs(&self) -> &LogManager {
        &self.logs
    }

    /// List the location's primary path and attach its sub-directories,
    /// descending `depth` further levels.
    pub async fn enumerate_tree(&self, location: Location, depth: usize) -> Location {
        let Some(path) = location.primary_path() else {
            self.report(
                &ListingError::MissingPath {
                    location: location.uuid.clone(),
                },
                &location.uuid,
            );
            return location;
        };

        let children = self
            .load_children(Path::new(path), depth, &location.uuid)
            .await;
        match children {
            Some(children) => Location {
                children: Some(children),
                ..location
            },
            None => location,
        }
    }

    /// Same as [`enumerate_tree`](Self::enumerate_tree) for a descendant entry.
    pub fn enumerate_entry(&self, entry: DirectoryEntry, depth: usize) -> EntryFuture {
        let loader = self.clone();
        Box::pin(async move {
            let children = loader
                .load_children(Path::new(&entry.path), depth, &entry.uuid)
                .await;
            match children {
                Some(children) => DirectoryEntry {
                    children: Some(children),
                    ..entry
                },
                None => entry,
            }
        })
    }

    /// Enumerate the location and return an edit carrying only the loaded
    /// children, so fields changed while the listing ran are not reverted.
    pub async fn sub_directories_patch(&self, location: Location, depth: usize) -> LocationPatch {
        let uuid = location.uuid.clone();
        let loaded = self.enumerate_tree(location, depth).await;

        let count: usize = loaded
            .children
            .iter()
            .flatten()
            .map(|child| 1 + child.descendant_count())
            .sum();
        self.logs.info(
            LogCategory::TreeLoad,
            &format!("Loaded {count} sub-directories (depth {depth})"),
            Some(uuid.clone()),
        );

        LocationPatch {
            children: loaded.children,
            ..LocationPatch::new(uuid)
        }
    }

    /// Enumerate the location and store the result through an edit.
    pub async fn load_sub_directories(
        &self,
        registry: &LocationRegistry,
        location: Location,
        depth: usize,
    ) -> LocationRegistry {
        let patch = self.sub_directories_patch(location, depth).await;
        registry.edit(&patch)
    }

    /// `None` when listing failed or no directory survived filtering.
    async fn load_children(
        &self,
        path: &Path,
        depth: usize,
        owner: &str,
    ) -> Option<Vec<DirectoryEntry>> {
        let settings = self.settings.current_settings();

        let entries = match self.lister.list_directory(path, false).await {
            Ok(entries) => entries,
            Err(e) => {
                self.report(&e, owner);
                return None;
            }
        };

        let directories: Vec<DirectoryEntry> = entries
            .into_iter()
            .filter(|entry| !settings.hides(&entry.name))
            .map(|entry| self.enhancer.enhance(entry))
            .filter(|entry| !entry.is_file)
            .collect();

        if directories.is_empty() {
            return None;
        }
        if depth == 0 {
            return Some(directories);
        }

        // Every branch runs as its own task; a panicking branch only loses its own subtree.
        let branches: Vec<_> = directories
            .into_iter()
            .map(|dir| {
                let fallback = dir.clone();
                (fallback, tokio::spawn(self.enumerate_entry(dir, depth - 1)))
            })
            .collect();

        let mut children = Vec::with_capacity(branches.len());
        for (fallback, handle) in branches {
            match handle.await {
                Ok(child) => children.push(child),
                Err(e) => {
                    self.logs.error(
                        LogCategory::TreeLoad,
                        &format!("Sub-directory task for {} failed: {}", fallback.path, e),
                        Some(fallback.uuid.clone()),
                    );
                    children.push(fallback);
                }
            }
        }

        Some(children)
    }

    fn report(&self, error: &ListingError, owner: &str) {
        self.logs.error(
            LogCategory::TreeLoad,
            &format!("[{}] {}", error.code(), error),
            Some(owner.to_string()),
        );
    }
}
