//! Outfit clothing replacement
//!
//! Re-derives an outfit's clothing list from a catalog export. Each catalog
//! record becomes one clothing entry (item id + active palette) in catalog
//! order; the previous list is discarded and every other outfit field is
//! left as it was.

use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use crate::error::ImportError;
use crate::path_utils::path_to_string;
use crate::selection::{resolve_input_file, Selection};
use crate::types::{
    parse_catalog, CatalogEntry, ClothingEntry, KeyStyle, OutfitConfig, OutfitData, CLOTHING_FIELD,
};

/// Result of a replacement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaceOutcome {
    pub previous: usize,
    pub replaced: usize,
}

/// Clothing entries for a catalog, in catalog order
pub fn clothing_from_catalog(catalog: &[CatalogEntry]) -> Vec<ClothingEntry> {
    catalog
        .iter()
        .map(|entry| ClothingEntry {
            id: entry.item_id.clone(),
            color_index: entry.active_palette,
        })
        .collect()
}

/// Parse an outfit record. `label` names the record in errors.
pub fn parse_outfit(content: &str, label: &str) -> Result<OutfitData, ImportError> {
    let value: Value = serde_json::from_str(content).map_err(|e| ImportError::parse(label, e))?;
    let Some(object) = value.as_object() else {
        return Err(ImportError::parse(label, "expected a JSON object"));
    };
    if !OutfitData::has_clothing_field(object) {
        return Err(ImportError::missing_field(label, CLOTHING_FIELD));
    }
    OutfitData::from_object(value).map_err(|e| ImportError::parse(label, e))
}

/// Serialize an outfit in its own key style with `indent` spaces per level
/// and a trailing newline
pub fn render_outfit(outfit: &OutfitData, indent: usize) -> Result<String, serde_json::Error> {
    let pad = " ".repeat(indent);
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(pad.as_bytes()));
    match outfit.key_style {
        KeyStyle::Camel => outfit.serialize(&mut serializer)?,
        KeyStyle::Engine => outfit.engine_view().serialize(&mut serializer)?,
    }
    buf.push(b'\n');
    // serde_json only ever emits UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Apply a catalog to outfit text, returning the new text.
///
/// Both inputs are fully parsed before anything is produced.
pub fn apply_catalog(
    outfit_text: &str,
    outfit_label: &str,
    catalog_text: &str,
    catalog_label: &str,
    config: &OutfitConfig,
) -> Result<(String, ReplaceOutcome), ImportError> {
    let mut outfit = parse_outfit(outfit_text, outfit_label)?;
    let catalog = parse_catalog(catalog_text).map_err(|e| ImportError::parse(catalog_label, e))?;

    let previous = outfit.clothing.len();
    outfit.clothing = clothing_from_catalog(&catalog);

    let rendered = render_outfit(&outfit, config.indent).map_err(|e| ImportError::parse(outfit_label, e))?;
    Ok((
        rendered,
        ReplaceOutcome {
            previous,
            replaced: outfit.clothing.len(),
        },
    ))
}

/// Replace the selected outfit's clothing with the entries of a catalog file
pub fn replace_outfit_clothing(
    outfit: &Selection,
    catalog: Option<&Path>,
    config: &OutfitConfig,
) -> Result<ReplaceOutcome, ImportError> {
    let catalog_path = resolve_input_file(catalog).map_err(|e| {
        tracing::warn!("No catalog file selected");
        e
    })?;
    let catalog_label = path_to_string(&catalog_path);
    let catalog_text = std::fs::read_to_string(&catalog_path).map_err(|source| ImportError::Io {
        path: catalog_label.clone(),
        source,
    })?;

    let outfit_text = outfit.read()?;
    let (rendered, outcome) = apply_catalog(
        &outfit_text,
        &outfit.display(),
        &catalog_text,
        &catalog_label,
        config,
    )
    .map_err(|e| {
        tracing::error!("Failed to parse JSON. Ensure the files have the correct format: {}", e);
        e
    })?;

    outfit.overwrite(&rendered)?;
    tracing::info!(
        "Replaced {} clothing item(s) with {} from {} in {}",
        outcome.previous,
        outcome.replaced,
        catalog_label,
        outfit.display()
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::RecordKind;
    use crate::types::RecordKindConfig;
    use std::fs;

    const OUTFIT: &str = r#"{
    "includeFallbacks": true,
    "skeleton": "female",
    "clothing": [
        {
            "id": "old-n_item",
            "colorIndex": 7
        }
    ]
}
"#;

    const CATALOG: &str = r#"[
        { "item_id": "a", "active_palette": 2, "account_bound": false, "nft_metadata": null },
        { "item_id": "b", "active_palette": 0, "remote_render_metadata": { "v": 1 } }
    ]"#;

    fn setup(outfit: &str, catalog: &str) -> (tempfile::TempDir, Selection, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let outfit_path = dir.path().join("casual.json");
        let catalog_path = dir.path().join("export.json");
        fs::write(&outfit_path, outfit).unwrap();
        fs::write(&catalog_path, catalog).unwrap();
        let selection =
            Selection::resolve(Some(&outfit_path), RecordKind::Outfit, &RecordKindConfig::default()).unwrap();
        (dir, selection, catalog_path)
    }

    #[test]
    fn test_clothing_follows_catalog_order() {
        let catalog = parse_catalog(CATALOG).unwrap();
        let clothing = clothing_from_catalog(&catalog);
        assert_eq!(
            clothing,
            vec![
                ClothingEntry { id: "a".to_string(), color_index: 2 },
                ClothingEntry { id: "b".to_string(), color_index: 0 },
            ]
        );
    }

    #[test]
    fn test_replace_outfit_clothing() {
        let (_dir, selection, catalog_path) = setup(OUTFIT, CATALOG);

        let outcome = replace_outfit_clothing(&selection, Some(&catalog_path), &OutfitConfig::default()).unwrap();
        assert_eq!(outcome, ReplaceOutcome { previous: 1, replaced: 2 });

        let written = fs::read_to_string(selection.path()).unwrap();
        let value: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["skeleton"], "female");
        assert_eq!(value["includeFallbacks"], true);
        assert_eq!(
            value["clothing"],
            serde_json::json!([{ "id": "a", "colorIndex": 2 }, { "id": "b", "colorIndex": 0 }])
        );
        assert!(!written.contains("nft_metadata"));
    }

    #[test]
    fn test_output_uses_four_space_indent() {
        let (text, _) = apply_catalog(OUTFIT, "o", "[]", "c", &OutfitConfig::default()).unwrap();
        assert_eq!(
            text,
            "{\n    \"includeFallbacks\": true,\n    \"skeleton\": \"female\",\n    \"clothing\": []\n}\n"
        );
    }

    #[test]
    fn test_engine_outfit_keeps_engine_keys() {
        let outfit = r#"{"IncludeFallbacks":true,"Skeleton":"male","Clothing":[{"Id":"x","Color":1}]}"#;
        let (text, outcome) = apply_catalog(outfit, "o", CATALOG, "c", &OutfitConfig { indent: 2 }).unwrap();
        assert_eq!(outcome.previous, 1);
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "IncludeFallbacks": true,
                "Skeleton": "male",
                "Clothing": [{ "Id": "a", "Color": 2 }, { "Id": "b", "Color": 0 }]
            })
        );
        assert!(value.get("skeleton").is_none());
    }

    #[test]
    fn test_absent_outfit_fields_not_added() {
        let (text, _) = apply_catalog(r#"{"clothing":[]}"#, "o", CATALOG, "c", &OutfitConfig::default()).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert!(value.get("includeFallbacks").is_none());
        assert!(value.get("skeleton").is_none());
        assert_eq!(value["clothing"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_extra_outfit_fields_kept() {
        let outfit = r#"{ "skeleton": "s", "clothing": [], "displayName": "Gala" }"#;
        let (text, _) = apply_catalog(outfit, "o", CATALOG, "c", &OutfitConfig::default()).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["displayName"], "Gala");
    }

    #[test]
    fn test_catalog_object_is_parse_failure() {
        let (_dir, selection, catalog_path) = setup(OUTFIT, r#"{ "item_id": "a", "active_palette": 2 }"#);

        let err = replace_outfit_clothing(&selection, Some(&catalog_path), &OutfitConfig::default()).unwrap_err();
        assert!(matches!(err, ImportError::ParseFailure { .. }));
        assert_eq!(fs::read_to_string(selection.path()).unwrap(), OUTFIT);
    }

    #[test]
    fn test_malformed_outfit_is_parse_failure() {
        let (_dir, selection, catalog_path) = setup("{ \"skeleton\": ", CATALOG);

        let err = replace_outfit_clothing(&selection, Some(&catalog_path), &OutfitConfig::default()).unwrap_err();
        assert!(matches!(err, ImportError::ParseFailure { .. }));
        assert_eq!(fs::read_to_string(selection.path()).unwrap(), "{ \"skeleton\": ");
    }

    #[test]
    fn test_outfit_without_clothing_field() {
        let original = r#"{ "skeleton": "s" }"#;
        let (_dir, selection, catalog_path) = setup(original, CATALOG);

        let err = replace_outfit_clothing(&selection, Some(&catalog_path), &OutfitConfig::default()).unwrap_err();
        assert!(matches!(err, ImportError::MissingExpectedField { .. }));
        assert_eq!(fs::read_to_string(selection.path()).unwrap(), original);
    }

    #[test]
    fn test_missing_catalog() {
        let (dir, selection, _) = setup(OUTFIT, CATALOG);

        let err = replace_outfit_clothing(&selection, None, &OutfitConfig::default()).unwrap_err();
        assert!(matches!(err, ImportError::MissingInputFile(_)));

        let gone = dir.path().join("gone.json");
        let err = replace_outfit_clothing(&selection, Some(&gone), &OutfitConfig::default()).unwrap_err();
        assert!(matches!(err, ImportError::MissingInputFile(_)));
        assert_eq!(fs::read_to_string(selection.path()).unwrap(), OUTFIT);
    }
}
