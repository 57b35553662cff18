//! Wardrobe project configuration
//!
//! Defines the `wardrobe.json` manifest format.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the project manifest
pub const CONFIG_FILE_NAME: &str = "wardrobe.json";

/// The main project configuration file (wardrobe.json)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    /// Project name (display only)
    pub name: String,

    /// Serialized names used by item assets
    #[serde(default)]
    pub items: ItemFieldConfig,

    /// Outfit record output settings
    #[serde(default)]
    pub outfit: OutfitConfig,

    /// Extensions accepted for each record kind
    #[serde(default)]
    pub record_kinds: RecordKindConfig,

    /// Path to the binding table (relative to the project root)
    #[serde(default = "default_bindings_path")]
    pub bindings: PathBuf,
}

fn default_bindings_path() -> PathBuf {
    PathBuf::from("bindings.toml")
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "Wardrobe".to_string(),
            items: ItemFieldConfig::default(),
            outfit: OutfitConfig::default(),
            record_kinds: RecordKindConfig::default(),
            bindings: default_bindings_path(),
        }
    }
}

/// Field names inside an item asset
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFieldConfig {
    /// Name of the collection field that holds the item entries
    #[serde(default = "default_collection_field")]
    pub collection_field: String,

    /// Key of the descriptor id inside an entry
    #[serde(default = "default_descriptor_key")]
    pub descriptor_key: String,

    /// Key of the palette id inside an entry
    #[serde(default = "default_palette_key")]
    pub palette_key: String,

    /// Palette value written for "no palette"
    #[serde(default = "default_unset_palette")]
    pub unset_palette: i64,
}

fn default_collection_field() -> String {
    "_items".to_string()
}

fn default_descriptor_key() -> String {
    "_descriptorId".to_string()
}

fn default_palette_key() -> String {
    "_paletteId".to_string()
}

fn default_unset_palette() -> i64 {
    -1
}

impl Default for ItemFieldConfig {
    fn default() -> Self {
        Self {
            collection_field: default_collection_field(),
            descriptor_key: default_descriptor_key(),
            palette_key: default_palette_key(),
            unset_palette: default_unset_palette(),
        }
    }
}

/// Outfit record output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutfitConfig {
    /// Spaces per indentation level when rewriting an outfit file
    #[serde(default = "default_indent")]
    pub indent: usize,
}

fn default_indent() -> usize {
    4
}

impl Default for OutfitConfig {
    fn default() -> Self {
        Self {
            indent: default_indent(),
        }
    }
}

/// File extensions (without the dot) that identify each record kind
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordKindConfig {
    #[serde(default = "default_item_asset_extensions")]
    pub item_asset: Vec<String>,

    #[serde(default = "default_outfit_extensions")]
    pub outfit: Vec<String>,
}

fn default_item_asset_extensions() -> Vec<String> {
    vec!["asset".to_string(), "yaml".to_string(), "yml".to_string()]
}

fn default_outfit_extensions() -> Vec<String> {
    vec!["json".to_string()]
}

impl Default for RecordKindConfig {
    fn default() -> Self {
        Self {
            item_asset: default_item_asset_extensions(),
            outfit: default_outfit_extensions(),
        }
    }
}

/// Errors that can occur when loading the project manifest
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ProjectConfig {
    /// Load `wardrobe.json` from a project directory, falling back to defaults
    /// when the directory has none.
    pub fn load(project_dir: &Path) -> Result<Self, ConfigError> {
        let path = project_dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            tracing::debug!("No {} in {}, using defaults", CONFIG_FILE_NAME, project_dir.display());
            return Ok(Self::default());
        }
        Self::from_file(&path)
    }

    /// Parse a specific manifest file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Binding table location resolved against the project root
    pub fn bindings_path(&self, project_dir: &Path) -> PathBuf {
        if self.bindings.is_absolute() {
            self.bindings.clone()
        } else {
            project_dir.join(&self.bindings)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ProjectConfig::default();
        assert_eq!(config.items.collection_field, "_items");
        assert_eq!(config.items.descriptor_key, "_descriptorId");
        assert_eq!(config.items.unset_palette, -1);
        assert_eq!(config.outfit.indent, 4);
        assert!(config.record_kinds.outfit.contains(&"json".to_string()));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let json = r#"{ "name": "Closet", "items": { "collectionField": "items" } }"#;
        let config: ProjectConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.name, "Closet");
        assert_eq!(config.items.collection_field, "items");
        assert_eq!(config.items.palette_key, "_paletteId");
        assert_eq!(config.bindings, PathBuf::from("bindings.toml"));
    }

    #[test]
    fn test_config_serialization() {
        let config = ProjectConfig {
            name: "TestProject".to_string(),
            ..Default::default()
        };

        let json = serde_json::to_string_pretty(&config).unwrap();
        assert!(json.contains("\"collectionField\""));

        let deserialized: ProjectConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config.name, deserialized.name);
        assert_eq!(deserialized.record_kinds.item_asset.len(), 3);
    }

    #[test]
    fn test_load_missing_manifest_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ProjectConfig::load(dir.path()).unwrap();
        assert_eq!(config.name, "Wardrobe");
    }

    #[test]
    fn test_load_malformed_manifest() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "{ not json").unwrap();
        let err = ProjectConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_bindings_path_relative_to_project() {
        let config = ProjectConfig::default();
        let path = config.bindings_path(Path::new("/projects/closet"));
        assert_eq!(path, PathBuf::from("/projects/closet/bindings.toml"));
    }
}
