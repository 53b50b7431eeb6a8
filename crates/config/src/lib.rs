//! Configuration directory resolution and the static `[env]` override table.
//!
//! Config file: `banter.toml`, searched in `./` then `~/.config/banter/`.
//! The `[env]` table supplies provider credentials without mutating the
//! process environment; the detector probes it after the real environment.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use {serde::Deserialize, tracing::warn};

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    env: HashMap<String, String>,
}

/// User-global config directory (`~/.config/banter` on Linux).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "banter").map(|d| d.config_dir().to_path_buf())
}

/// Returns the path of an existing config file, if any.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("banter.toml");
    if local.is_file() {
        return Some(local);
    }
    let global = config_dir()?.join("banter.toml");
    global.is_file().then_some(global)
}

/// Load the `[env]` override table from the discovered config file.
///
/// Missing or malformed config degrades to an empty map; credentials from
/// the real environment still apply either way.
pub fn env_overrides() -> HashMap<String, String> {
    find_config_file()
        .map(|path| env_overrides_from(&path))
        .unwrap_or_default()
}

/// Load the `[env]` override table from a specific config file path.
pub fn env_overrides_from(path: &Path) -> HashMap<String, String> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) => {
            if error.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %path.display(), error = %error, "failed to read config file");
            }
            return HashMap::new();
        },
    };

    match toml::from_str::<ConfigFile>(&raw) {
        Ok(config) => config.env,
        Err(error) => {
            warn!(
                path = %path.display(),
                error = %error,
                "config file is invalid TOML and will be ignored"
            );
            HashMap::new()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_from_reads_env_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("banter.toml");
        std::fs::write(
            &path,
            "[env]\nOLLAMA_API_BASE_URL = \"http://localhost:11434\"\n",
        )
        .unwrap();

        let overrides = env_overrides_from(&path);
        assert_eq!(
            overrides.get("OLLAMA_API_BASE_URL").map(String::as_str),
            Some("http://localhost:11434")
        );
    }

    #[test]
    fn env_overrides_from_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(env_overrides_from(&dir.path().join("absent.toml")).is_empty());
    }

    #[test]
    fn env_overrides_from_invalid_toml_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("banter.toml");
        std::fs::write(&path, "[env\nbroken").unwrap();
        assert!(env_overrides_from(&path).is_empty());
    }

    #[test]
    fn env_table_is_optional() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("banter.toml");
        std::fs::write(&path, "# no env table\n").unwrap();
        assert!(env_overrides_from(&path).is_empty());
    }
}
