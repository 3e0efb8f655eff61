use crate::state::app_state::SortOrder;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings that survive restarts: the last-loaded username and the sort
/// order. Written back after every successful collection load.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub username: Option<String>,
    #[serde(default)]
    pub sort: SortOrder,
    #[serde(skip)]
    pub full_screen: bool,
    #[serde(skip)]
    pub log_level: Option<LevelFilter>,
}

impl AppSettings {
    pub fn load() -> Self {
        let path = settings_path();
        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) -> Result<(), String> {
        let path = settings_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| format!("create dir failed: {e}"))?;
        }
        let payload = serde_json::to_string_pretty(self)
            .map_err(|e| format!("serialize settings failed: {e}"))?;
        std::fs::write(&path, payload).map_err(|e| format!("write settings failed: {e}"))?;
        Ok(())
    }
}

fn settings_path() -> PathBuf {
    if let Ok(config_dir) = std::env::var("XDG_CONFIG_HOME")
        && !config_dir.trim().is_empty()
    {
        return PathBuf::from(config_dir).join("shelftui").join("settings.json");
    }
    if let Ok(home) = std::env::var("HOME")
        && !home.trim().is_empty()
    {
        return PathBuf::from(home)
            .join(".config")
            .join("shelftui")
            .join("settings.json");
    }
    PathBuf::from("shelftui_settings.json")
}
