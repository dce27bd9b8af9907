use anyhow::{Context, Result};
use papermap_core::{PlatformType, StrengthThresholds};
use papermap_graph::{ColumnColors, DEFAULT_HISTORY_DEPTH, SnapshotOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const SETTINGS_DIR: &str = "papermap";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerSettings {
    pub default_platform_type: PlatformType,
    #[serde(default = "default_history_depth")]
    pub history_depth: usize,
    pub colors: ColumnColors,
    pub strength: StrengthThresholds,
    /// Dataset directory opened on startup.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

fn default_history_depth() -> usize {
    DEFAULT_HISTORY_DEPTH
}

impl Default for ExplorerSettings {
    fn default() -> Self {
        Self {
            default_platform_type: PlatformType::default(),
            history_depth: default_history_depth(),
            colors: ColumnColors::default(),
            strength: StrengthThresholds::default(),
            data_dir: None,
        }
    }
}

impl ExplorerSettings {
    /// `<config dir>/papermap/settings.json`, when the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(SETTINGS_DIR).join(SETTINGS_FILE))
    }

    /// Loads from the default location, falling back to defaults on any failure.
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        tracing::info!("Loading settings from {:?}", path);
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::error!("Failed to load settings: {:#}", e);
                Self::default()
            }
        }
    }

    /// A missing file yields the defaults. Unreadable or malformed files are errors.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("Settings file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::default_path().context("No config directory on this platform")?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write settings file {}", path.display()))
    }

    pub fn snapshot_options(&self) -> SnapshotOptions {
        SnapshotOptions {
            colors: self.colors.clone(),
            strength: self.strength,
        }
    }
}
