use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Default maximum number of log lines to keep in memory
pub const DEFAULT_MAX_LOG_LINES: usize = 10000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogCategory {
    Registry,
    TreeLoad,
    Config,
    Store,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub timestamp: String,
    pub level: String,
    pub category: LogCategory,
    pub message: String,
    pub location_id: Option<String>,
}

#[derive(Clone)]
pub struct LogManager {
    entries: Arc<Mutex<VecDeque<LogEntry>>>,
    max_lines: usize,
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LOG_LINES)
    }
}

impl LogManager {
    pub fn new(max_lines: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(max_lines.min(1024)))),
            max_lines,
        }
    }

    pub fn log(
        &self,
        level: &str,
        category: LogCategory,
        message: &str,
        location_id: Option<String>,
    ) {
        let now = chrono::Utc::now();
        let entry = LogEntry {
            id: format!("{}-{}", now.timestamp_micros(), uuid::Uuid::new_v4().simple()),
            timestamp: now.to_rfc3339(),
            level: level.to_string(),
            category,
            message: message.to_string(),
            location_id,
        };

        // A poisoned lock only means another logger panicked mid-push.
        let mut logs = match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        logs.push_back(entry);

        while logs.len() > self.max_lines {
            logs.pop_front();
        }
    }

    pub fn info(&self, category: LogCategory, message: &str, location_id: Option<String>) {
        self.log("info", category, message, location_id);
    }

    pub fn warn(&self, category: LogCategory, message: &str, location_id: Option<String>) {
        self.log("warning", category, message, location_id);
    }

    pub fn error(&self, category: LogCategory, message: &str, location_id: Option<String>) {
        self.log("error", category, message, location_id);
    }

    pub fn get_logs(&self, location_id: Option<&str>) -> Vec<LogEntry> {
        let logs = match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match location_id {
            Some(id) => logs
                .iter()
                .filter(|l| l.location_id.as_deref() == Some(id))
                .cloned()
                .collect(),
            None => logs.iter().cloned().collect(),
        }
    }

    /// Get logs with pagination for better performance with large log sets
    pub fn get_logs_paginated(
        &self,
        location_id: Option<&str>,
        offset: usize,
        limit: usize,
    ) -> Vec<LogEntry> {
        let filtered = self.get_logs(location_id);

        let start = offset.min(filtered.len());
        let end = offset.saturating_add(limit).min(filtered.len());

        filtered[start..end].to_vec()
    }

    pub fn len(&self) -> usize {
        match self.entries.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_manager_new() {
        let manager = LogManager::new(100);
        assert!(manager.is_empty());
    }

    #[test]
    fn test_log_manager_log() {
        let manager = LogManager::new(10);

        manager.info(LogCategory::Registry, "test message", None);
        assert_eq!(manager.len(), 1);

        manager.warn(LogCategory::TreeLoad, "another message", Some("loc1".to_string()));
        assert_eq!(manager.len(), 2);
    }

    #[test]
    fn test_log_manager_rotation() {
        let manager = LogManager::new(3);

        for i in 0..5 {
            manager.info(LogCategory::Registry, &format!("message {}", i), None);
        }

        let logs = manager.get_logs(None);
        assert_eq!(logs.len(), 3);
        assert_eq!(logs[0].message, "message 2");
        assert_eq!(logs[2].message, "message 4");
    }

    #[test]
    fn test_log_manager_get_logs_by_location() {
        let manager = LogManager::new(10);

        manager.info(LogCategory::Registry, "message1", None);
        manager.error(LogCategory::TreeLoad, "message2", Some("loc1".to_string()));
        manager.error(LogCategory::TreeLoad, "message3", Some("loc1".to_string()));

        assert_eq!(manager.get_logs(None).len(), 3);

        let location_logs = manager.get_logs(Some("loc1"));
        assert_eq!(location_logs.len(), 2);
        assert!(location_logs.iter().all(|l| l.level == "error"));

        assert!(manager.get_logs(Some("nonexistent")).is_empty());
    }

    #[test]
    fn test_log_manager_pagination() {
        let manager = LogManager::new(100);

        for i in 0..20 {
            manager.info(LogCategory::Store, &format!("message {}", i), None);
        }

        assert_eq!(manager.get_logs_paginated(None, 0, 10).len(), 10);
        assert_eq!(manager.get_logs_paginated(None, 10, 10).len(), 10);
        assert_eq!(manager.get_logs_paginated(None, 20, 10).len(), 0);
        assert_eq!(manager.get_logs_paginated(None, 15, usize::MAX).len(), 5);
    }

    #[test]
    fn test_clones_share_entries() {
        let manager = LogManager::new(10);
        let clone = manager.clone();

        clone.info(LogCategory::Config, "from clone", None);
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_default_max_log_lines() {
        assert_eq!(DEFAULT_MAX_LOG_LINES, 10000);
    }
}
