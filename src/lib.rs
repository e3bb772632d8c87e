pub mod config;
pub mod error;
pub mod error_codes;
pub mod locations;
pub mod logging;
pub mod path_validation;
pub mod platform_io;
pub mod store;


use std::sync::Arc;
use tokio::sync::RwLock;

use config::{AppConfig, Settings, SettingsSource};
use error::StoreError;
use locations::{
    Location, LocationAction, LocationDraft, LocationPatch, LocationRegistry, LocationSession,
    TreeLoader,
};
use logging::{LogCategory, LogManager};
use platform_io::{
    default_device_paths, DefaultEnhancer, DevicePaths, FsDirectoryLister, IdGenerator,
    UuidGenerator,
};
use store::LocationStore;

/// Process-wide state shared with the UI layer.
pub struct AppState {
    pub log_manager: LogManager,
    pub registry: Arc<RwLock<LocationRegistry>>,
    pub session: Arc<RwLock<LocationSession>>,
    pub settings: Arc<std::sync::RwLock<Settings>>,
    pub tree_loader: TreeLoader,
    pub store: Option<LocationStore>,
}

impl AppState {
    /// `settings` should be the handle the tree loader reads from, so that
    /// [`update_settings`](Self::update_settings) reaches later loads.
    pub fn new(
        registry: LocationRegistry,
        tree_loader: TreeLoader,
        settings: Arc<std::sync::RwLock<Settings>>,
        store: Option<LocationStore>,
    ) -> Self {
        Self {
            log_manager: tree_loader.logs().clone(),
            registry: Arc::new(RwLock::new(registry)),
            session: Arc::new(RwLock::new(LocationSession::default())),
            settings,
            tree_loader,
            store,
        }
    }

    /// Build the state from config: restore saved locations, or seed them from
    /// the user's well-known folders on first run.
    pub async fn bootstrap(config: &AppConfig) -> Result<Self, StoreError> {
        Self::bootstrap_with(config, default_device_paths()).await
    }

    pub async fn bootstrap_with(
        config: &AppConfig,
        device_paths: DevicePaths,
    ) -> Result<Self, StoreError> {
        let log_manager = LogManager::new(config.max_log_lines);
        let id_gen: Arc<dyn IdGenerator> = Arc::new(UuidGenerator);
        let store = config
            .store_path
            .clone()
            .or_else(LocationStore::default_path)
            .map(LocationStore::new);

        let saved = match &store {
            Some(store) => store.load().await?,
            None => None,
        };

        let registry = match saved {
            Some(locations) => {
                log_manager.info(
                    LogCategory::Store,
                    &format!("Restored {} locations", locations.len()),
                    None,
                );
                LocationRegistry::from_locations(locations, id_gen)
            }
            None => {
                let registry = LocationRegistry::initialize(device_paths, id_gen);
                log_manager.info(
                    LogCategory::Registry,
                    &format!("Seeded {} locations from device folders", registry.len()),
                    None,
                );
                registry
            }
        };

        let settings = Arc::new(std::sync::RwLock::new(config.settings.clone()));
        let tree_loader = TreeLoader::new(
            Arc::new(FsDirectoryLister),
            Arc::new(DefaultEnhancer),
            settings.clone(),
            log_manager,
        );

        Ok(Self::new(registry, tree_loader, settings, store))
    }

    pub async fn dispatch(&self, action: LocationAction) -> LocationRegistry {
        let mut registry = self.registry.write().await;
        *registry = registry.reduce(action);
        registry.clone()
    }

    /// Add a location and open it.
    pub async fn add_location(&self, draft: LocationDraft) -> LocationRegistry {
        let mut registry = self.registry.write().await;
        *registry = registry.reduce(LocationAction::Add(draft));

        if let Some(added) = registry.locations().last() {
            self.session.write().await.open(added);
            self.log_manager.info(
                LogCategory::Registry,
                &format!("Opened location {}", added.name),
                Some(added.uuid.clone()),
            );
        }
        registry.clone()
    }

    /// Edit a location. When it is the open one, read-only mode follows the
    /// edited record.
    pub async fn edit_location(&self, patch: LocationPatch) -> LocationRegistry {
        let mut registry = self.registry.write().await;
        *registry = registry.reduce(LocationAction::Edit(patch.clone()));

        let mut session = self.session.write().await;
        if session.current_location_id() == Some(patch.uuid.as_str()) {
            let read_only = registry
                .location(&patch.uuid)
                .map(|l| l.is_read_only)
                .unwrap_or(false);
            session.set_read_only_mode(read_only);
        }
        registry.clone()
    }

    /// Close the location if it is open, then remove it.
    pub async fn remove_location(&self, uuid: &str) -> LocationRegistry {
        let mut registry = self.registry.write().await;
        if self.session.write().await.close(uuid) {
            self.log_manager.info(
                LogCategory::Registry,
                "Closed location before removal",
                Some(uuid.to_string()),
            );
        }
        *registry = registry.reduce(LocationAction::Remove(uuid.to_string()));
        registry.clone()
    }

    /// Returns `false` when no location has this identifier.
    pub async fn open_location(&self, uuid: &str) -> bool {
        let registry = self.registry.read().await;
        let Some(location) = registry.location(uuid) else {
            self.log_manager.warn(
                LogCategory::Registry,
                "Cannot open unknown location",
                Some(uuid.to_string()),
            );
            return false;
        };
        self.session.write().await.open(location);
        true
    }

    pub async fn close_location(&self, uuid: &str) -> bool {
        self.session.write().await.close(uuid)
    }

    pub async fn current_location_id(&self) -> Option<String> {
        self.session
            .read()
            .await
            .current_location_id()
            .map(str::to_string)
    }

    pub async fn is_read_only_mode(&self) -> bool {
        self.session.read().await.is_read_only_mode()
    }

    pub fn settings(&self) -> Settings {
        self.settings.current_settings()
    }

    /// Change the settings used by subsequent tree loads.
    pub fn update_settings(&self, update: impl FnOnce(&mut Settings)) {
        let mut settings = match self.settings.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        update(&mut *settings);
        self.log_manager.info(
            LogCategory::Config,
            &format!(
                "Settings updated (show hidden entries: {})",
                settings.show_unix_hidden_entries
            ),
            None,
        );
    }

    pub async fn locations(&self) -> Vec<Location> {
        self.registry.read().await.locations().to_vec()
    }

    pub async fn location(&self, uuid: &str) -> Option<Location> {
        self.registry.read().await.location(uuid).cloned()
    }

    pub async fn default_location_id(&self) -> Option<String> {
        self.registry
            .read()
            .await
            .default_location_id()
            .map(str::to_string)
    }

    /// Load the sub-directory tree of a registered location and store it.
    ///
    /// The registry is not locked while directories are listed, and only the
    /// children are written back, so edits made meanwhile survive. Returns the
    /// stored record, or `None` when the identifier is unknown or the location
    /// was removed during the load.
    pub async fn load_sub_directories(&self, uuid: &str, depth: usize) -> Option<Location> {
        let location = self.location(uuid).await?;
        let patch = self.tree_loader.sub_directories_patch(location, depth).await;

        let registry = self.dispatch(LocationAction::Edit(patch)).await;
        registry.location(uuid).cloned()
    }

    pub async fn persist(&self) -> Result<(), StoreError> {
        let Some(store) = &self.store else {
            return Ok(());
        };

        let locations = self.locations().await;
        match store.save(&locations).await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.log_manager
                    .error(LogCategory::Store, &format!("[{}] {}", e.code(), e), None);
                Err(e)
            }
        }
    }
}
