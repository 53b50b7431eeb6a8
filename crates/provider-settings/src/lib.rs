//! Provider enablement reconciliation.
//!
//! Holds the authoritative in-memory map of provider name → settings and
//! merges three sources of truth: compiled-in defaults, the snapshot
//! persisted from a prior session, and the live detection report from the
//! configured-providers endpoint. The merge policy never overrides an
//! explicit user choice: auto logic only enables, never disables, and a
//! provider the user turned off stays off until the user turns it back on.

pub mod detect;
pub mod env_stack;
pub mod error;
pub mod http;
pub mod store;

use std::{
    collections::{BTreeSet, HashMap},
    sync::{Arc, Mutex, MutexGuard},
};

use {
    banter_providers::{ConfigMethod, ProviderRegistry},
    banter_service_traits::ConfiguredProviderService,
    serde::{Deserialize, Serialize},
    tracing::{debug, info, warn},
};

pub use crate::{
    detect::detect_configured_providers,
    env_stack::{EnvLookup, EnvStack},
    error::{Error, Result},
    http::HttpConfiguredProviderClient,
    store::{HistoryStore, SettingsStore},
};

/// Per-provider settings record. Currently just the enablement flag;
/// unknown fields in persisted snapshots are tolerated on deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSettings {
    pub enabled: bool,
}

/// Shallow patch applied over an existing settings record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

pub type ProviderSettingsMap = HashMap<String, ProviderSettings>;

/// Reconciles defaults, the persisted snapshot, and live detection results
/// into one authoritative enablement map.
///
/// All mutation goes through the internal lock; the auto-enable pass reads
/// the current map before awaiting the detection response and applies its
/// decision synchronously afterwards. The decision is a pure function of
/// (current map, report, history), so concurrent passes converge and
/// persisted storage is last-write-wins.
pub struct ProviderSettingsReconciler {
    registry: Arc<ProviderRegistry>,
    detection: Arc<dyn ConfiguredProviderService>,
    settings_store: SettingsStore,
    history_store: HistoryStore,
    map: Mutex<ProviderSettingsMap>,
}

impl ProviderSettingsReconciler {
    #[must_use]
    pub fn new(registry: Arc<ProviderRegistry>, detection: Arc<dyn ConfiguredProviderService>) -> Self {
        Self::with_stores(registry, detection, SettingsStore::new(), HistoryStore::new())
    }

    #[must_use]
    pub fn with_stores(
        registry: Arc<ProviderRegistry>,
        detection: Arc<dyn ConfiguredProviderService>,
        settings_store: SettingsStore,
        history_store: HistoryStore,
    ) -> Self {
        Self {
            registry,
            detection,
            settings_store,
            history_store,
            map: Mutex::new(HashMap::new()),
        }
    }

    fn lock_map(&self) -> MutexGuard<'_, ProviderSettingsMap> {
        self.map.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Build the working set: defaults for every known provider (local
    /// disabled, cloud enabled), overlaid with the persisted snapshot for
    /// keys present in both. Unknown snapshot keys are ignored; a malformed
    /// snapshot or entry falls back to the default for that provider.
    pub fn initialize(&self) -> ProviderSettingsMap {
        let mut map: ProviderSettingsMap = self
            .registry
            .descriptors()
            .map(|d| {
                (d.name.to_string(), ProviderSettings { enabled: !d.local })
            })
            .collect();

        for (name, value) in self.settings_store.load_raw() {
            let Some(entry) = map.get_mut(&name) else {
                debug!(provider = %name, "ignoring unknown provider in persisted snapshot");
                continue;
            };
            match serde_json::from_value::<ProviderSettings>(value) {
                Ok(settings) => *entry = settings,
                Err(error) => {
                    warn!(
                        provider = %name,
                        error = %error,
                        "ignoring malformed snapshot entry, keeping default"
                    );
                },
            }
        }

        *self.lock_map() = map.clone();
        map
    }

    /// Current working set.
    #[must_use]
    pub fn settings_map(&self) -> ProviderSettingsMap {
        self.lock_map().clone()
    }

    /// Apply the auto-enable policy against a fresh detection report.
    ///
    /// A local provider reported configured via environment is enabled only
    /// if it is currently disabled and either no persisted snapshot exists
    /// (first run on this machine) or the provider was auto-enabled before.
    /// A provider the user disabled without it ever being auto-enabled is
    /// never touched. Returns the names that were flipped.
    pub async fn auto_enable(&self) -> Vec<String> {
        let current = self.settings_map();
        let has_user_settings = self.settings_store.exists();

        let report = match self.detection.list_configured().await {
            Ok(report) => report,
            Err(error) => {
                warn!(error = %error, "detection query failed, leaving enablement untouched");
                return Vec::new();
            },
        };

        let history = self.history_store.load();
        let mut flipped = Vec::new();
        for entry in &report {
            if !entry.is_configured || entry.config_method != ConfigMethod::Environment {
                continue;
            }
            if !self.registry.is_local(&entry.name) {
                continue;
            }
            // Only entries in the working set can flip; before initialize()
            // there is nothing to enable or record.
            let Some(settings) = current.get(&entry.name) else {
                continue;
            };
            if settings.enabled {
                continue;
            }
            let was_auto_enabled = history.contains(&entry.name);
            if !has_user_settings || was_auto_enabled {
                flipped.push(entry.name.clone());
            }
        }

        if flipped.is_empty() {
            debug!("auto-enable pass made no changes");
            return flipped;
        }

        let snapshot = {
            let mut map = self.lock_map();
            for name in &flipped {
                if let Some(settings) = map.get_mut(name) {
                    settings.enabled = true;
                }
            }
            map.clone()
        };
        self.persist_settings(&snapshot);

        let mut updated_history = history;
        updated_history.extend(flipped.iter().cloned());
        self.persist_history(updated_history);

        info!(providers = ?flipped, "auto-enabled providers configured via environment");
        flipped
    }

    /// Shallow-merge `patch` into the entry for `name` and persist. For
    /// local providers an `enabled` change also updates the auto-enabled
    /// history: enabling records the name, disabling removes it so a later
    /// detection pass will not silently re-enable what the user turned off.
    pub fn update_provider_settings(
        &self,
        name: &str,
        patch: &ProviderSettingsPatch,
    ) -> Result<ProviderSettings> {
        let snapshot = {
            let mut map = self.lock_map();
            let Some(entry) = map.get_mut(name) else {
                return Err(Error::unknown_provider(name));
            };
            if let Some(enabled) = patch.enabled {
                entry.enabled = enabled;
            }
            map.clone()
        };
        self.persist_settings(&snapshot);

        if let Some(enabled) = patch.enabled
            && self.registry.is_local(name)
        {
            let mut history = self.history_store.load();
            let changed = if enabled {
                history.insert(name.to_string())
            } else {
                history.remove(name)
            };
            if changed {
                self.persist_history(history);
            }
        }

        // The entry was present above; re-read it for the return value.
        Ok(snapshot
            .get(name)
            .cloned()
            .unwrap_or(ProviderSettings { enabled: false }))
    }

    fn persist_settings(&self, map: &ProviderSettingsMap) {
        if let Err(error) = self.settings_store.save(map) {
            warn!(error = %error, "failed to persist provider settings, in-memory state remains authoritative");
        }
    }

    fn persist_history(&self, mut names: BTreeSet<String>) {
        // History is defined as a subset of the local providers; prune
        // anything a registry change orphaned.
        names.retain(|name| self.registry.is_local(name));
        if let Err(error) = self.history_store.save(&names) {
            warn!(error = %error, "failed to persist auto-enabled history");
        }
    }
}
