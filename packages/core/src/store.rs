//! In-memory alerting configuration store.
//!
//! `ConfigStore` keeps the most recently accepted document for each
//! datasource. It only ever holds validated documents, and it lives for
//! the lifetime of the process; nothing is written to disk.
//!
//! The store does no locking of its own; callers wrap it in
//! `Arc<RwLock<ConfigStore>>` to share it between Axum handlers.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::alerting::{GettableUserConfig, PostableUserConfig};

/// An accepted document and when it was accepted.
#[derive(Debug, Clone)]
pub struct StoredConfig {
    pub config: PostableUserConfig,
    pub stored_at: DateTime<Utc>,
}

impl StoredConfig {
    /// Read-model view returned to clients.
    pub fn to_gettable(&self) -> GettableUserConfig {
        self.config.to_gettable(self.stored_at)
    }
}

/// Latest accepted document per datasource id.
#[derive(Debug, Default)]
pub struct ConfigStore {
    configs: HashMap<String, StoredConfig>,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `config` for `datasource_id`, replacing and returning any
    /// previous document.
    pub fn put(
        &mut self,
        datasource_id: impl Into<String>,
        config: PostableUserConfig,
    ) -> Option<StoredConfig> {
        self.configs.insert(
            datasource_id.into(),
            StoredConfig {
                config,
                stored_at: Utc::now(),
            },
        )
    }

    pub fn get(&self, datasource_id: &str) -> Option<&StoredConfig> {
        self.configs.get(datasource_id)
    }

    /// Remove the document for `datasource_id`. Returns `true` if one existed.
    pub fn remove(&mut self, datasource_id: &str) -> bool {
        self.configs.remove(datasource_id).is_some()
    }

    /// Number of datasources with a stored document.
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerting::{decode_postable, Backend};

    fn config(receiver: &str) -> PostableUserConfig {
        let body = format!(
            r#"{{
                "alertmanager_config": {{
                    "route": {{ "receiver": "{receiver}" }},
                    "receivers": [ {{
                        "name": "{receiver}",
                        "grafana_managed_receiver_configs": [
                            {{ "name": "{receiver}", "type": "email", "secureSettings": {{ "password": "x" }} }}
                        ]
                    }} ]
                }}
            }}"#
        );
        decode_postable(body.as_bytes()).unwrap()
    }

    #[test]
    fn new_store_is_empty() {
        let store = ConfigStore::new();
        assert!(store.is_empty());
        assert!(store.get("1").is_none());
    }

    #[test]
    fn put_then_get_returns_document() {
        let mut store = ConfigStore::new();
        assert!(store.put("1", config("a")).is_none());

        let stored = store.get("1").unwrap();
        assert_eq!(stored.config, config("a"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn put_replaces_previous_document() {
        let mut store = ConfigStore::new();
        store.put("1", config("a"));

        let previous = store.put("1", config("b")).unwrap();
        assert_eq!(previous.config, config("a"));
        assert_eq!(store.get("1").unwrap().config, config("b"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn datasources_are_independent() {
        let mut store = ConfigStore::new();
        store.put("1", config("a"));
        store.put("2", config("b"));

        assert!(store.remove("1"));
        assert!(store.get("1").is_none());
        assert!(store.get("2").is_some());
    }

    #[test]
    fn remove_missing_returns_false() {
        let mut store = ConfigStore::new();
        assert!(!store.remove("nope"));
    }

    #[test]
    fn gettable_view_marks_secure_fields() {
        let mut store = ConfigStore::new();
        store.put("1", config("a"));

        let gettable = store.get("1").unwrap().to_gettable();
        assert_eq!(gettable.backend(), Backend::Grafana);

        let entry = &gettable.alertmanager_config().receivers()[0].managed()[0];
        assert_eq!(entry.id, 1);
        assert_eq!(entry.secure_fields.get("password"), Some(&true));
    }
}
