//! Outfit records
//!
//! An outfit file is a JSON object naming the skeleton it is built for and
//! the clothing pieces it wears. Files written by the engine's JSON utility
//! use PascalCase keys, and the engine only reads them back in that spelling,
//! so a record is written with the same key style it was read with.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Top-level key of the clothing list
pub const CLOTHING_FIELD: &str = "clothing";

/// Key the engine's JSON utility writes for the clothing list
pub const LEGACY_CLOTHING_FIELD: &str = "Clothing";

/// Key spelling of an outfit file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyStyle {
    /// `includeFallbacks`, `skeleton`, `clothing`, `id`, `colorIndex`
    #[default]
    Camel,

    /// `IncludeFallbacks`, `Skeleton`, `Clothing`, `Id`, `Color`
    Engine,
}

impl KeyStyle {
    /// Style of a raw outfit object, judged by how its clothing list is spelled
    pub fn detect(object: &Map<String, Value>) -> Self {
        if object.contains_key(LEGACY_CLOTHING_FIELD) && !object.contains_key(CLOTHING_FIELD) {
            KeyStyle::Engine
        } else {
            KeyStyle::Camel
        }
    }
}

/// Outfit record (`*.json`)
///
/// Absent `includeFallbacks`/`skeleton` stay absent when written back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutfitData {
    #[serde(default, alias = "IncludeFallbacks", skip_serializing_if = "Option::is_none")]
    pub include_fallbacks: Option<bool>,

    #[serde(default, alias = "Skeleton", skip_serializing_if = "Option::is_none")]
    pub skeleton: Option<String>,

    #[serde(alias = "Clothing")]
    pub clothing: Vec<ClothingEntry>,

    /// Any other top-level fields, carried through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,

    /// Spelling to write the record back with
    #[serde(skip)]
    pub key_style: KeyStyle,
}

/// A worn clothing piece
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClothingEntry {
    #[serde(alias = "Id")]
    pub id: String,

    /// Palette variant index
    #[serde(alias = "Color")]
    pub color_index: i64,
}

/// Engine-spelled view of an outfit, for serialization only
#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct EngineOutfit<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    include_fallbacks: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    skeleton: Option<&'a str>,

    clothing: Vec<EngineClothing<'a>>,

    #[serde(flatten)]
    extra: &'a Map<String, Value>,
}

#[derive(Serialize)]
struct EngineClothing<'a> {
    #[serde(rename = "Id")]
    id: &'a str,

    #[serde(rename = "Color")]
    color_index: i64,
}

impl OutfitData {
    /// Whether a raw JSON object carries a clothing list under either spelling
    pub fn has_clothing_field(object: &Map<String, Value>) -> bool {
        object.contains_key(CLOTHING_FIELD) || object.contains_key(LEGACY_CLOTHING_FIELD)
    }

    /// Parse a raw outfit object, remembering its key style
    pub fn from_object(value: Value) -> Result<Self, serde_json::Error> {
        let key_style = value.as_object().map(KeyStyle::detect).unwrap_or_default();
        let mut outfit: OutfitData = serde_json::from_value(value)?;
        outfit.key_style = key_style;
        Ok(outfit)
    }

    pub(crate) fn engine_view(&self) -> EngineOutfit<'_> {
        EngineOutfit {
            include_fallbacks: self.include_fallbacks,
            skeleton: self.skeleton.as_deref(),
            clothing: self
                .clothing
                .iter()
                .map(|entry| EngineClothing {
                    id: &entry.id,
                    color_index: entry.color_index,
                })
                .collect(),
            extra: &self.extra,
        }
    }
}
