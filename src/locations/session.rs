use crate::locations::types::Location;

/// The location the user is browsing and whether it is browsed read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationSession {
    current_location_id: Option<String>,
    read_only_mode: bool,
}

impl LocationSession {
    pub fn open(&mut self, location: &Location) {
        self.current_location_id = Some(location.uuid.clone());
        self.read_only_mode = location.is_read_only;
    }

    /// Returns `false` when a different location (or none) is open.
    pub fn close(&mut self, uuid: &str) -> bool {
        if self.current_location_id.as_deref() != Some(uuid) {
            return false;
        }
        self.current_location_id = None;
        self.read_only_mode = false;
        true
    }

    pub fn set_read_only_mode(&mut self, read_only: bool) {
        self.read_only_mode = read_only;
    }

    pub fn current_location_id(&self) -> Option<&str> {
        self.current_location_id.as_deref()
    }

    pub fn is_read_only_mode(&self) -> bool {
        self.read_only_mode
    }
}
