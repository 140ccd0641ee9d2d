use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

pub const DEFAULT_TITLE: &str = "DHT11 Sensor Dashboard";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    pub title: String,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.into(),
        }
    }
}

/// Dashboard preferences kept as a small JSON file next to the database.
///
/// Changes are held in memory until [`SettingsStore::persist`] is called on
/// exit.
pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<DashboardSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!("Ignoring unreadable settings file {}: {err}", path.display());
                DashboardSettings::default()
            })
        } else {
            DashboardSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn title(&self) -> String {
        self.read().title.clone()
    }

    /// Blank titles fall back to the default.
    pub fn set_title(&self, title: &str) {
        let title = title.trim();
        let mut guard = self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.title = if title.is_empty() {
            DEFAULT_TITLE.to_string()
        } else {
            title.to_string()
        };
    }

    pub fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create settings directory {}", parent.display())
                })?;
            }
        }

        let serialized = serde_json::to_string_pretty(&*self.read())?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, DashboardSettings> {
        self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_default_title() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("dashboard.json")).unwrap();
        assert_eq!(store.title(), DEFAULT_TITLE);
    }

    #[test]
    fn title_survives_a_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("dashboard.json");

        let store = SettingsStore::new(path.clone()).unwrap();
        store.set_title("  Greenhouse  ");
        store.persist().unwrap();

        let reopened = SettingsStore::new(path).unwrap();
        assert_eq!(reopened.title(), "Greenhouse");
    }

    #[test]
    fn blank_title_resets_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("dashboard.json")).unwrap();
        store.set_title("Lab");
        store.set_title("   ");
        assert_eq!(store.title(), DEFAULT_TITLE);
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        fs::write(&path, "{not json").unwrap();
        let store = SettingsStore::new(path).unwrap();
        assert_eq!(store.title(), DEFAULT_TITLE);
    }
}
