use bevy::prelude::*;
use serde_derive::Deserialize;
use std::path::Path;
use thiserror::Error;

pub const CONFIG_PATH: &str = "assets/config/inventory.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Inventory must have at least one row and one column (got {rows}x{cols})")]
    InvalidDimensions { rows: usize, cols: usize },
}

/// 背包尺寸与物品表路径
#[derive(Resource, Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    pub rows: usize,
    pub cols: usize,
    /// 相对 assets/ 的路径
    pub item_list: String,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            rows: 4,
            cols: 5,
            item_list: "data/items.ron".into(),
        }
    }
}

impl InventoryConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: InventoryConfig = toml::from_str(text)?;
        if config.rows == 0 || config.cols == 0 {
            return Err(ConfigError::InvalidDimensions {
                rows: config.rows,
                cols: config.cols,
            });
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = InventoryConfig::from_toml("rows = 2").unwrap();
        assert_eq!(config.rows, 2);
        assert_eq!(config.cols, 5);
        assert_eq!(config.item_list, "data/items.ron");
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let err = InventoryConfig::from_toml("rows = 0\ncols = 3").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDimensions { rows: 0, cols: 3 }));
    }

    #[test]
    fn garbage_is_a_toml_error() {
        assert!(matches!(InventoryConfig::from_toml("rows = ="), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn shipped_config_is_valid() {
        let config = InventoryConfig::from_toml(include_str!("../../assets/config/inventory.toml")).unwrap();
        assert_eq!(config, InventoryConfig::default());
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(InventoryConfig::load("does/not/exist.toml"), Err(ConfigError::Io(_))));
    }
}
