use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::domain::MergeStrategy;

/// Project-wide engine settings.
///
/// Passed explicitly into the review service so that review construction is
/// a pure function of its inputs rather than reading a mutable global.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Strategy a new review starts with unless overridden per review.
    #[serde(default)]
    pub default_merge_strategy: MergeStrategy,
    /// Author recorded on comments when the caller does not supply one.
    #[serde(default = "default_author")]
    pub default_author: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_merge_strategy: MergeStrategy::default(),
            default_author: default_author(),
        }
    }
}

fn default_author() -> String {
    "reviewer".to_string()
}

pub fn load_config() -> AppConfig {
    let path = config_path();
    let Ok(contents) = std::fs::read_to_string(&path) else {
        return AppConfig::default();
    };
    toml::from_str(&contents).unwrap_or_default()
}

pub fn save_config(config: &AppConfig) -> std::io::Result<()> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let contents = toml::to_string_pretty(config).unwrap_or_default();
    std::fs::write(path, contents)
}

fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("MERGEFLOW_CONFIG_PATH") {
        return PathBuf::from(path);
    }

    app_data_dir().join("config.toml")
}

fn app_data_dir() -> PathBuf {
    if let Ok(path) = std::env::var("MERGEFLOW_DATA_HOME") {
        return PathBuf::from(path);
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = home::home_dir() {
            return home
                .join("Library")
                .join("Application Support")
                .join("MergeFlow");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("MergeFlow");
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Some(xdg) = std::env::var_os("XDG_DATA_HOME") {
            return PathBuf::from(xdg).join("mergeflow");
        }
        if let Some(home) = home::home_dir() {
            return home.join(".local").join("share").join("mergeflow");
        }
    }

    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".mergeflow")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_roundtrip_toml() {
        let config = AppConfig {
            default_merge_strategy: MergeStrategy::Squash,
            default_author: "alice".into(),
        };
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.default_merge_strategy, MergeStrategy::Squash);
        assert_eq!(parsed.default_author, "alice");
    }

    #[test]
    fn test_config_defaults() {
        let parsed: AppConfig = toml::from_str("").unwrap();
        assert_eq!(parsed.default_merge_strategy, MergeStrategy::Merge);
        assert_eq!(parsed.default_author, "reviewer");
    }
}
