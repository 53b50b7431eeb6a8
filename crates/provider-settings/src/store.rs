//! Durable projections of the reconciler state.
//!
//! Two JSON files under the config dir: `provider_settings.json` (provider
//! name → settings record) and `auto_enabled.json` (names the reconciler
//! itself turned on). Both are written atomically via temp file + rename so
//! readers never observe partially-written JSON, and both tolerate missing
//! or corrupt contents by falling back to empty.

use std::{
    collections::{BTreeSet, HashMap},
    path::{Path, PathBuf},
};

use {serde_json::Value, tracing::warn};

use crate::{ProviderSettings, error::Result};

fn default_store_path(file_name: &str) -> PathBuf {
    banter_config::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config/banter"))
        .join(file_name)
}

fn write_json_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let temp_path = path.with_extension(format!("json.tmp.{nanos}"));
    std::fs::write(&temp_path, data)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = std::fs::set_permissions(&temp_path, std::fs::Permissions::from_mode(0o600));
    }
    std::fs::rename(&temp_path, path)?;
    Ok(())
}

fn read_store_file(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(raw) => Some(raw),
        Err(error) => {
            if error.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %path.display(), error = %error, "failed to read store file");
            }
            None
        },
    }
}

/// Persisted snapshot of the provider settings map.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            path: default_store_path("provider_settings.json"),
        }
    }

    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Whether a snapshot exists at all. The auto-enable policy uses this to
    /// tell a first run apart from a machine with prior user settings.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Raw per-provider entries from the snapshot. Entries stay untyped here
    /// so one malformed record doesn't discard the rest.
    #[must_use]
    pub fn load_raw(&self) -> HashMap<String, Value> {
        let Some(raw) = read_store_file(&self.path) else {
            return HashMap::new();
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(error) => {
                warn!(
                    path = %self.path.display(),
                    error = %error,
                    "provider settings snapshot is invalid JSON and will be ignored"
                );
                HashMap::new()
            },
        }
    }

    pub fn save(&self, map: &HashMap<String, ProviderSettings>) -> Result<()> {
        write_json_atomic(&self.path, &serde_json::to_string_pretty(map)?)
    }
}

/// Persisted set of provider names the reconciler auto-enabled, kept apart
/// from the settings snapshot so "user turned this off" and "never touched"
/// remain distinguishable.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            path: default_store_path("auto_enabled.json"),
        }
    }

    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn load(&self) -> BTreeSet<String> {
        let Some(raw) = read_store_file(&self.path) else {
            return BTreeSet::new();
        };
        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(names) => names.into_iter().collect(),
            Err(error) => {
                warn!(
                    path = %self.path.display(),
                    error = %error,
                    "auto-enabled history is invalid JSON and will be ignored"
                );
                BTreeSet::new()
            },
        }
    }

    pub fn save(&self, names: &BTreeSet<String>) -> Result<()> {
        let list: Vec<&String> = names.iter().collect();
        write_json_atomic(&self.path, &serde_json::to_string_pretty(&list)?)
    }
}
