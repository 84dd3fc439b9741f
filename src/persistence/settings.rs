use std::fs;
use std::path::PathBuf;

use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    // If None, use OS temporary directory for exports
    #[serde(default)]
    pub export_override: Option<PathBuf>,
    // Draw edge weights next to each connection
    #[serde(default = "AppSettings::default_show_distances")]
    pub show_distances: bool,
    // Most recently saved or loaded graph file
    #[serde(default)]
    pub last_file: Option<PathBuf>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            export_override: None,
            show_distances: Self::default_show_distances(),
            last_file: None,
        }
    }
}

const APP_DIR: &str = "Route-Mapper";
const SETTINGS_FILE: &str = "settings.json";

fn home_dir() -> PathBuf {
    std::env::var_os("HOME").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("~"))
}

// Per-user config root: Application Support on macOS, %APPDATA% on Windows,
// $XDG_CONFIG_HOME (or ~/.config) elsewhere
fn config_root() -> PathBuf {
    if cfg!(target_os = "macos") {
        home_dir().join("Library").join("Application Support")
    } else if cfg!(target_os = "windows") {
        std::env::var_os("APPDATA").map(PathBuf::from).unwrap_or_default()
    } else {
        std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .filter(|p| p.is_absolute())
            .unwrap_or_else(|| home_dir().join(".config"))
    }
}

impl AppSettings {
    /// Location of the settings file for the current user.
    pub fn settings_path() -> PathBuf {
        config_root().join(APP_DIR).join(SETTINGS_FILE)
    }

    /// Read settings, falling back to defaults when no file has been saved yet.
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::settings_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::from_json(&fs::read_to_string(&path)?)
    }

    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let path = Self::settings_path();
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&path, serde_json::to_string_pretty(self)?)?;
        debug!("settings written to {}", path.display());
        Ok(())
    }

    /// Default export directory when no override is set: OS temporary directory.
    /// Example: {temp_dir}/Route-Mapper/exports
    pub fn export_default_dir() -> PathBuf {
        std::env::temp_dir().join(APP_DIR).join("exports")
    }

    /// Effective export directory honoring user override or falling back to OS temp.
    pub fn export_dir(&self) -> PathBuf {
        if let Some(p) = &self.export_override { return p.clone(); }
        Self::export_default_dir()
    }

    pub(crate) fn default_show_distances() -> bool { true }
}
