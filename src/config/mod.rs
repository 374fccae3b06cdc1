use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_border_color() -> String {
    "#6FDBFF".to_string()
}

fn default_mouse() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Count the root starts from
    #[serde(default)]
    pub initial_count: i64,

    /// Great-grandchild border color (#RRGGBB or #RGB)
    #[serde(default = "default_border_color")]
    pub border_color: String,

    /// Capture mouse so the button can be clicked
    #[serde(default = "default_mouse")]
    pub mouse: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            initial_count: 0,
            border_color: default_border_color(),
            mouse: default_mouse(),
        }
    }
}

impl AppConfig {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("propdrill");

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from file, or create default
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return Ok(config),
                    Err(e) => tracing::warn!("Failed to parse config: {}", e),
                },
                Err(e) => tracing::warn!("Failed to read config: {}", e),
            }
            return Ok(AppConfig::default());
        }

        let config = AppConfig::default();
        if let Err(e) = config.save_to(path) {
            tracing::warn!("Could not write default config: {}", e);
        }
        Ok(config)
    }

    /// Save config to file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("propdrill-test-{}-{}", std::process::id(), name))
            .join("config.toml")
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig {
            initial_count: -3,
            border_color: "#123456".to_string(),
            mouse: false,
        };

        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&serialized).unwrap();

        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: AppConfig = toml::from_str("initial_count = 7").unwrap();
        assert_eq!(config.initial_count, 7);
        assert_eq!(config.border_color, "#6FDBFF");
        assert!(config.mouse);
    }

    #[test]
    fn test_load_creates_default_file() {
        let path = scratch_path("create");
        let _ = std::fs::remove_file(&path);

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(path.exists());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_load_falls_back_on_bad_toml() {
        let path = scratch_path("bad");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "initial_count = \"lots\"").unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config, AppConfig::default());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
