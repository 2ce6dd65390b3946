use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Prefs {
    pub theme: Theme,
}

/// Durable panel preferences. A missing or unreadable file falls back
/// to defaults.
#[derive(Clone)]
pub struct PrefStore {
    path: Arc<PathBuf>,
    prefs: Arc<RwLock<Prefs>>,
}

impl PrefStore {
    pub fn load(path: PathBuf) -> Self {
        let prefs = read_prefs(&path).unwrap_or_else(|err| {
            tracing::warn!("Unable to read prefs from {}: {err:?}", path.display());
            Prefs::default()
        });
        Self {
            path: Arc::new(path),
            prefs: Arc::new(RwLock::new(prefs)),
        }
    }

    pub fn theme(&self) -> Theme {
        self.prefs.read().expect("pref store poisoned").theme
    }

    pub fn set_theme(&self, theme: Theme) -> Result<()> {
        let updated = {
            let mut guard = self.prefs.write().expect("pref store poisoned");
            guard.theme = theme;
            *guard
        };
        write_prefs(&self.path, &updated)
    }
}

fn read_prefs(path: &Path) -> Result<Prefs> {
    if !path.exists() {
        return Ok(Prefs::default());
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

fn write_prefs(path: &Path, prefs: &Prefs) -> Result<()> {
    let raw = serde_json::to_string_pretty(prefs)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    fs::write(path, raw).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn scratch_path(tag: &str) -> PathBuf {
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock before epoch")
            .as_nanos();
        std::env::temp_dir().join(format!("faunascope_{}_{}_{}.json", tag, std::process::id(), ts))
    }

    #[test]
    fn defaults_to_light_when_file_missing() {
        let store = PrefStore::load(scratch_path("missing"));
        assert_eq!(store.theme(), Theme::Light);
    }

    #[test]
    fn theme_survives_reload() {
        let path = scratch_path("roundtrip");
        let store = PrefStore::load(path.clone());
        store.set_theme(Theme::Dark).expect("persist theme");

        let reloaded = PrefStore::load(path.clone());
        assert_eq!(reloaded.theme(), Theme::Dark);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn garbage_file_falls_back_to_default() {
        let path = scratch_path("garbage");
        fs::write(&path, "{not json").expect("write scratch file");
        let store = PrefStore::load(path.clone());
        assert_eq!(store.theme(), Theme::Light);
        let _ = fs::remove_file(path);
    }
}
