//! Location 레지스트리
//!
//! 순서가 있는 Location 목록을 관리합니다. 모든 연산은 기존 스냅샷을 변경하지 않고
//! 새로운 레지스트리를 반환합니다.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::locations::types::{Location, LocationDraft, LocationPatch};
use crate::platform_io::{DevicePaths, IdGenerator, UuidGenerator};

/// State-transition requests accepted by [`LocationRegistry::reduce`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum LocationAction {
    #[serde(rename = "APP/ADD_LOCATION")]
    Add(LocationDraft),
    #[serde(rename = "APP/EDIT_LOCATION")]
    Edit(LocationPatch),
    #[serde(rename = "APP/MOVE_UP_LOCATION")]
    MoveUp(String),
    #[serde(rename = "APP/MOVE_DOWN_LOCATION")]
    MoveDown(String),
    #[serde(rename = "APP/REMOVE_LOCATION")]
    Remove(String),
}

#[derive(Clone)]
pub struct LocationRegistry {
    locations: Vec<Location>,
    id_gen: Arc<dyn IdGenerator>,
}

impl fmt::Debug for LocationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocationRegistry")
            .field("locations", &self.locations)
            .finish_non_exhaustive()
    }
}

impl Default for LocationRegistry {
    fn default() -> Self {
        Self::from_locations(Vec::new(), Arc::new(UuidGenerator))
    }
}

impl LocationRegistry {
    /// Seed one plain location per well-known device folder, named by its key.
    pub fn initialize(device_paths: DevicePaths, id_gen: Arc<dyn IdGenerator>) -> Self {
        let locations = device_paths
            .into_iter()
            .map(|(key, path)| Location {
                uuid: id_gen.generate(),
                name: key,
                paths: vec![path.to_string_lossy().into_owned()],
                perspective: None,
                creation_date: None,
                is_default: false,
                is_read_only: false,
                watch_for_changes: false,
                persist_index: false,
                children: None,
            })
            .collect();

        Self { locations, id_gen }
    }

    /// Restore a registry from previously saved records, in their saved order.
    pub fn from_locations(locations: Vec<Location>, id_gen: Arc<dyn IdGenerator>) -> Self {
        Self { locations, id_gen }
    }

    fn with_locations(&self, locations: Vec<Location>) -> Self {
        Self {
            locations,
            id_gen: Arc::clone(&self.id_gen),
        }
    }

    /// Index of the last record with this identifier. Identifiers are unique,
    /// so in practice this is the only match.
    fn index_of(&self, uuid: &str) -> Option<usize> {
        self.locations.iter().rposition(|l| l.uuid == uuid)
    }

    pub fn reduce(&self, action: LocationAction) -> Self {
        match action {
            LocationAction::Add(draft) => self.add(draft),
            LocationAction::Edit(patch) => self.edit(&patch),
            LocationAction::MoveUp(uuid) => self.move_up(&uuid),
            LocationAction::MoveDown(uuid) => self.move_down(&uuid),
            LocationAction::Remove(uuid) => self.remove(&uuid),
        }
    }

    /// Append a new record. A new default clears the flag on every existing record.
    pub fn add(&self, draft: LocationDraft) -> Self {
        let mut locations: Vec<Location> = self
            .locations
            .iter()
            .map(|l| Location {
                is_default: l.is_default && !draft.is_default,
                ..l.clone()
            })
            .collect();

        locations.push(Location {
            uuid: draft.uuid.unwrap_or_else(|| self.id_gen.generate()),
            name: draft.name,
            paths: draft.paths,
            perspective: draft.perspective,
            creation_date: Some(
                chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            ),
            is_default: draft.is_default,
            is_read_only: draft.is_read_only,
            watch_for_changes: draft.watch_for_changes,
            persist_index: draft.persist_index,
            children: None,
        });

        self.with_locations(locations)
    }

    /// Merge the patch over its target in place.
    ///
    /// When the patch sets the default flag, every other record loses it even
    /// if the target does not exist.
    pub fn edit(&self, patch: &LocationPatch) -> Self {
        let clear_default = patch.is_default == Some(true);
        let target = self.index_of(&patch.uuid);

        let locations = self
            .locations
            .iter()
            .enumerate()
            .map(|(index, l)| {
                if Some(index) == target {
                    l.merged(patch)
                } else if clear_default {
                    Location {
                        is_default: false,
                        ..l.clone()
                    }
                } else {
                    l.clone()
                }
            })
            .collect();

        self.with_locations(locations)
    }

    pub fn move_up(&self, uuid: &str) -> Self {
        match self.index_of(uuid) {
            Some(index) if index > 0 => self.swapped(index, index - 1),
            _ => self.clone(),
        }
    }

    pub fn move_down(&self, uuid: &str) -> Self {
        match self.index_of(uuid) {
            Some(index) if index + 1 < self.locations.len() => self.swapped(index, index + 1),
            _ => self.clone(),
        }
    }

    fn swapped(&self, a: usize, b: usize) -> Self {
        let mut locations = self.locations.clone();
        locations.swap(a, b);
        self.with_locations(locations)
    }

    pub fn remove(&self, uuid: &str) -> Self {
        match self.index_of(uuid) {
            Some(index) => {
                let mut locations = self.locations.clone();
                locations.remove(index);
                self.with_locations(locations)
            }
            None => self.clone(),
        }
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn location(&self, uuid: &str) -> Option<&Location> {
        self.index_of(uuid).map(|index| &self.locations[index])
    }

    pub fn default_location_id(&self) -> Option<&str> {
        self.locations
            .iter()
            .rev()
            .find(|l| l.is_default)
            .map(|l| l.uuid.as_str())
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct SeqIds(AtomicUsize);

    impl IdGenerator for SeqIds {
        fn generate(&self) -> String {
            format!("id-{}", self.0.fetch_add(1, Ordering::SeqCst))
        }
    }

    fn seq_ids() -> Arc<dyn IdGenerator> {
        Arc::new(SeqIds(AtomicUsize::new(0)))
    }

    fn draft(uuid: &str, name: &str, is_default: bool) -> LocationDraft {
        LocationDraft {
            uuid: Some(uuid.to_string()),
            is_default,
            ..LocationDraft::new(name, format!("/data/{name}"))
        }
    }

    fn abc() -> LocationRegistry {
        LocationRegistry::default()
            .add(draft("a", "A", false))
            .add(draft("b", "B", false))
            .add(draft("c", "C", false))
    }

    fn ids(registry: &LocationRegistry) -> Vec<&str> {
        registry.locations().iter().map(|l| l.uuid.as_str()).collect()
    }

    fn defaults(registry: &LocationRegistry) -> Vec<&str> {
        registry
            .locations()
            .iter()
            .filter(|l| l.is_default)
            .map(|l| l.uuid.as_str())
            .collect()
    }

    #[test]
    fn test_initialize_seeds_device_paths_in_order() {
        let device_paths = vec![
            ("desktop".to_string(), PathBuf::from("/home/me/Desktop")),
            ("documents".to_string(), PathBuf::from("/home/me/Documents")),
        ];
        let registry = LocationRegistry::initialize(device_paths, seq_ids());

        assert_eq!(ids(&registry), vec!["id-0", "id-1"]);
        let desktop = &registry.locations()[0];
        assert_eq!(desktop.name, "desktop");
        assert_eq!(desktop.paths, vec!["/home/me/Desktop".to_string()]);
        assert!(!desktop.is_default);
        assert!(!desktop.is_read_only);
        assert!(!desktop.persist_index);
        assert!(registry.default_location_id().is_none());
    }

    #[test]
    fn test_add_appends_and_generates_id() {
        let registry = LocationRegistry::from_locations(Vec::new(), seq_ids())
            .add(LocationDraft::new("Photos", "/p"))
            .add(LocationDraft::new("Photos", "/p"));

        assert_eq!(ids(&registry), vec!["id-0", "id-1"]);
        assert!(registry.locations()[0].creation_date.is_some());
    }

    #[test]
    fn test_add_keeps_supplied_id() {
        let registry = LocationRegistry::default().add(draft("mine", "Mine", false));
        assert_eq!(ids(&registry), vec!["mine"]);
    }

    #[test]
    fn test_add_default_clears_others() {
        let registry = LocationRegistry::default()
            .add(draft("a", "A", true))
            .add(draft("b", "B", false))
            .add(draft("c", "C", true));

        assert_eq!(defaults(&registry), vec!["c"]);
        assert_eq!(registry.default_location_id(), Some("c"));
    }

    #[test]
    fn test_add_non_default_keeps_existing_default() {
        let registry = LocationRegistry::default()
            .add(draft("a", "A", true))
            .add(draft("b", "B", false));
        assert_eq!(registry.default_location_id(), Some("a"));
    }

    #[test]
    fn test_operations_do_not_touch_previous_snapshot() {
        let before = LocationRegistry::default().add(draft("a", "A", true));
        let after = before.add(draft("b", "B", true));

        assert_eq!(before.default_location_id(), Some("a"));
        assert_eq!(before.len(), 1);
        assert_eq!(after.default_location_id(), Some("b"));
    }

    #[test]
    fn test_edit_new_default_scenario() {
        let registry = LocationRegistry::default()
            .add(draft("1", "A", true))
            .add(draft("2", "B", false));

        let edited = registry.edit(&LocationPatch::new("2").with_default(true));

        assert!(!edited.locations()[0].is_default);
        assert_eq!(edited.locations()[0].name, "A");
        assert!(edited.locations()[1].is_default);
        assert_eq!(edited.locations()[1].name, "B");
    }

    #[test]
    fn test_edit_keeps_position() {
        let edited = abc().edit(&LocationPatch::new("b").with_name("Bee"));
        assert_eq!(ids(&edited), vec!["a", "b", "c"]);
        assert_eq!(edited.locations()[1].name, "Bee");
    }

    #[test]
    fn test_edit_unknown_id_is_noop() {
        let registry = abc();
        let edited = registry.edit(&LocationPatch::new("zzz").with_name("Nope"));
        assert_eq!(edited.locations(), registry.locations());
    }

    #[test]
    fn test_edit_unknown_id_still_clears_defaults() {
        let registry = LocationRegistry::default()
            .add(draft("a", "A", true))
            .add(draft("b", "B", false));

        let edited = registry.edit(&LocationPatch::new("zzz").with_default(true));

        assert!(defaults(&edited).is_empty());
        assert_eq!(ids(&edited), vec!["a", "b"]);
    }

    #[test]
    fn test_edit_unsetting_default_leaves_others() {
        let registry = LocationRegistry::default()
            .add(draft("a", "A", true))
            .add(draft("b", "B", false));

        let edited = registry.edit(&LocationPatch::new("b").with_default(false));
        assert_eq!(edited.default_location_id(), Some("a"));
    }

    #[test]
    fn test_move_scenarios() {
        assert_eq!(ids(&abc().move_down("a")), vec!["b", "a", "c"]);
        assert_eq!(ids(&abc().move_up("c")), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_move_at_edges_is_noop() {
        assert_eq!(ids(&abc().move_up("a")), vec!["a", "b", "c"]);
        assert_eq!(ids(&abc().move_down("c")), vec!["a", "b", "c"]);
        assert_eq!(ids(&abc().move_up("missing")), vec!["a", "b", "c"]);
        assert_eq!(ids(&abc().move_down("missing")), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_move_up_then_down_round_trips() {
        let original = abc();
        for uuid in ["b", "c"] {
            let restored = original.move_up(uuid).move_down(uuid);
            assert_eq!(ids(&restored), ids(&original));
        }
    }

    #[test]
    fn test_remove() {
        let registry = abc();
        let removed = registry.remove("b");
        assert_eq!(removed.len(), registry.len() - 1);
        assert_eq!(ids(&removed), vec!["a", "c"]);

        let untouched = registry.remove("missing");
        assert_eq!(untouched.len(), registry.len());
    }

    #[test]
    fn test_duplicate_ids_resolve_to_last_match() {
        let registry = LocationRegistry::default()
            .add(draft("dup", "First", false))
            .add(draft("x", "X", false))
            .add(draft("dup", "Second", false));

        assert_eq!(registry.location("dup").map(|l| l.name.as_str()), Some("Second"));

        let edited = registry.edit(&LocationPatch::new("dup").with_name("Edited"));
        assert_eq!(edited.locations()[0].name, "First");
        assert_eq!(edited.locations()[2].name, "Edited");

        let removed = registry.remove("dup");
        assert_eq!(removed.locations()[0].name, "First");
        assert_eq!(removed.len(), 2);
    }

    #[test]
    fn test_selectors() {
        let registry = abc();
        assert_eq!(registry.location("b").map(|l| l.name.as_str()), Some("B"));
        assert!(registry.location("nope").is_none());
        assert!(registry.default_location_id().is_none());
    }

    #[test]
    fn test_reduce_dispatches_actions() {
        let registry = LocationRegistry::default()
            .reduce(LocationAction::Add(draft("a", "A", false)))
            .reduce(LocationAction::Add(draft("b", "B", false)))
            .reduce(LocationAction::MoveUp("b".to_string()))
            .reduce(LocationAction::Edit(LocationPatch::new("a").with_default(true)))
            .reduce(LocationAction::MoveDown("b".to_string()));

        assert_eq!(ids(&registry), vec!["a", "b"]);
        assert_eq!(registry.default_location_id(), Some("a"));

        let registry = registry.reduce(LocationAction::Remove("a".to_string()));
        assert_eq!(ids(&registry), vec!["b"]);
    }

    #[test]
    fn test_action_json_shape() {
        let action: LocationAction = serde_json::from_str(
            r#"{"type":"APP/MOVE_UP_LOCATION","payload":"loc-7"}"#,
        )
        .unwrap();
        assert_eq!(action, LocationAction::MoveUp("loc-7".to_string()));

        let edit: LocationAction = serde_json::from_str(
            r#"{"type":"APP/EDIT_LOCATION","payload":{"uuid":"loc-7","isDefault":true}}"#,
        )
        .unwrap();
        assert_eq!(
            edit,
            LocationAction::Edit(LocationPatch::new("loc-7").with_default(true))
        );
    }
}
