//! Bulk item assignment
//!
//! Rebuilds an item asset's collection from a pasted, comma-separated list
//! of descriptor ids. The old collection is discarded; every id becomes one
//! entry with the "no palette" sentinel.

use crate::asset::{AssetDocument, AssetError};
use crate::error::ImportError;
use crate::selection::Selection;
use crate::types::{ItemEntry, ItemFieldConfig};

/// Result of a bulk assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignOutcome {
    /// Input was the empty string; nothing was touched
    NoInput,

    /// Collection replaced and the asset written back
    Replaced { previous: usize, assigned: usize },
}

/// Split pasted input on commas, trimming each id and dropping empty ones.
/// Order is preserved.
pub fn parse_id_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

/// Entries for the given ids, all without a palette
pub fn build_item_entries(ids: &[String], fields: &ItemFieldConfig) -> Vec<ItemEntry> {
    ids.iter()
        .map(|id| ItemEntry::unpaletted(id.as_str(), fields))
        .collect()
}

/// Rewrite asset text so its collection holds exactly `entries`.
///
/// Returns the new text and the size of the collection it replaced.
pub fn apply_items(
    text: &str,
    entries: &[ItemEntry],
    fields: &ItemFieldConfig,
) -> Result<(String, usize), AssetError> {
    let document = AssetDocument::parse(text)?;
    let previous = document
        .collection(&fields.collection_field)
        .map(|items| items.len())
        .ok_or_else(|| AssetError::MissingField(fields.collection_field.clone()))?;

    let values: Vec<_> = entries.iter().map(|entry| entry.to_yaml(fields)).collect();
    let updated = document.replace_collection(&fields.collection_field, &values)?;
    Ok((updated, previous))
}

/// Replace the selected asset's item collection with the ids in `input`.
///
/// An empty string is a warning and leaves the asset alone. Any other input,
/// even whitespace or bare separators, replaces the collection. A missing or
/// non-list collection field is an error and leaves the file byte-identical.
pub fn assign_items(
    selection: &Selection,
    input: &str,
    fields: &ItemFieldConfig,
) -> Result<AssignOutcome, ImportError> {
    if input.is_empty() {
        tracing::warn!("No IDs entered, {} left unchanged", selection.display());
        return Ok(AssignOutcome::NoInput);
    }

    let ids = parse_id_list(input);
    let entries = build_item_entries(&ids, fields);

    let text = selection.read()?;
    let (updated, previous) = apply_items(&text, &entries, fields).map_err(|e| match e {
        AssetError::MissingField(field) => {
            tracing::error!("Failed to find '{}' array in {}", field, selection.display());
            ImportError::missing_field(selection.display(), field)
        }
        AssetError::Yaml(e) => ImportError::parse(selection.display(), e),
    })?;

    selection.overwrite(&updated)?;
    tracing::info!(
        "Replaced {} item(s) with {} in {}",
        previous,
        entries.len(),
        selection.display()
    );

    Ok(AssignOutcome::Replaced {
        previous,
        assigned: entries.len(),
    })
}
