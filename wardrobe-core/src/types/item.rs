//! Item entries stored in an item asset's collection field

use serde_yaml::{Mapping, Value};

use super::ItemFieldConfig;

/// One entry of an item asset's collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemEntry {
    /// Descriptor id of the referenced item definition (never empty)
    pub descriptor_id: String,

    /// Palette variant; `unset_palette` from the config means "no palette"
    pub palette_id: i64,
}

impl ItemEntry {
    /// Entry with the "no palette" sentinel
    pub fn unpaletted(descriptor_id: impl Into<String>, fields: &ItemFieldConfig) -> Self {
        Self {
            descriptor_id: descriptor_id.into(),
            palette_id: fields.unset_palette,
        }
    }

    /// YAML mapping using the configured key names, descriptor first
    pub fn to_yaml(&self, fields: &ItemFieldConfig) -> Value {
        let mut mapping = Mapping::new();
        mapping.insert(
            Value::String(fields.descriptor_key.clone()),
            Value::String(self.descriptor_id.clone()),
        );
        mapping.insert(
            Value::String(fields.palette_key.clone()),
            Value::Number(self.palette_id.into()),
        );
        Value::Mapping(mapping)
    }

    /// Read an entry back from its YAML mapping, if it has the expected keys
    pub fn from_yaml(value: &Value, fields: &ItemFieldConfig) -> Option<Self> {
        let descriptor_id = value.get(fields.descriptor_key.as_str())?.as_str()?;
        let palette_id = value.get(fields.palette_key.as_str())?.as_i64()?;
        Some(Self {
            descriptor_id: descriptor_id.to_string(),
            palette_id,
        })
    }
}
