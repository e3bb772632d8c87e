use serde::{Deserialize, Serialize};

/// A user-registered root folder or drive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub uuid: String,
    pub name: String,
    /// First entry is the primary path.
    pub paths: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perspective: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub is_read_only: bool,
    #[serde(default)]
    pub watch_for_changes: bool,
    #[serde(default)]
    pub persist_index: bool,
    /// Cached sub-directories. `None` does not mean the location is empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<DirectoryEntry>>,
}

impl Location {
    pub fn primary_path(&self) -> Option<&str> {
        self.paths.first().map(String::as_str)
    }

    /// Shallow merge: every field present in the patch overwrites ours.
    /// The identifier and creation date never change.
    pub fn merged(&self, patch: &LocationPatch) -> Location {
        Location {
            uuid: self.uuid.clone(),
            name: patch.name.clone().unwrap_or_else(|| self.name.clone()),
            paths: patch.paths.clone().unwrap_or_else(|| self.paths.clone()),
            perspective: patch.perspective.clone().or_else(|| self.perspective.clone()),
            creation_date: self.creation_date.clone(),
            is_default: patch.is_default.unwrap_or(self.is_default),
            is_read_only: patch.is_read_only.unwrap_or(self.is_read_only),
            watch_for_changes: patch.watch_for_changes.unwrap_or(self.watch_for_changes),
            persist_index: patch.persist_index.unwrap_or(self.persist_index),
            children: patch.children.clone().or_else(|| self.children.clone()),
        }
    }
}

/// Input of the add operation. The identifier is generated when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocationDraft {
    pub uuid: Option<String>,
    pub name: String,
    pub paths: Vec<String>,
    pub perspective: Option<String>,
    pub is_default: bool,
    pub is_read_only: bool,
    pub watch_for_changes: bool,
    pub persist_index: bool,
}

impl LocationDraft {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            paths: vec![path.into()],
            ..Self::default()
        }
    }
}

/// Input of the edit operation: the target identifier plus the fields to overwrite.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationPatch {
    pub uuid: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub paths: Option<Vec<String>>,
    #[serde(default)]
    pub perspective: Option<String>,
    #[serde(default)]
    pub is_default: Option<bool>,
    #[serde(default)]
    pub is_read_only: Option<bool>,
    #[serde(default)]
    pub watch_for_changes: Option<bool>,
    #[serde(default)]
    pub persist_index: Option<bool>,
    #[serde(default)]
    pub children: Option<Vec<DirectoryEntry>>,
}

impl LocationPatch {
    pub fn new(uuid: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            ..Self::default()
        }
    }

    pub fn with_default(mut self, is_default: bool) -> Self {
        self.is_default = Some(is_default);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A complete record used as an edit replaces every mutable field.
impl From<Location> for LocationPatch {
    fn from(location: Location) -> Self {
        Self {
            uuid: location.uuid,
            name: Some(location.name),
            paths: Some(location.paths),
            perspective: location.perspective,
            is_default: Some(location.is_default),
            is_read_only: Some(location.is_read_only),
            watch_for_changes: Some(location.watch_for_changes),
            persist_index: Some(location.persist_index),
            children: location.children,
        }
    }
}

/// One entry as returned by the directory-listing capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEntry {
    pub name: String,
    pub path: String,
    pub is_file: bool,
    pub size: u64,
    pub last_modified: Option<String>,
}

/// A listing entry after enhancement; directories may carry their own subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryEntry {
    pub uuid: String,
    pub name: String,
    pub path: String,
    pub is_file: bool,
    #[serde(default)]
    pub extension: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<DirectoryEntry>>,
}

impl DirectoryEntry {
    /// Number of directories in this subtree, excluding the entry itself.
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .flatten()
            .map(|child| 1 + child.descendant_count())
            .sum()
    }
}
