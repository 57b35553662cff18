//! Wardrobe Core Library
//!
//! This crate provides the core functionality for Wardrobe:
//! - Item asset and outfit record types
//! - Bulk item assignment from pasted descriptor ids
//! - Outfit clothing replacement from catalog exports
//! - Script binding tables read from generated thunk sources
//! - Project configuration

pub mod assigner;
pub mod asset;
pub mod bindings;
pub mod error;
pub mod path_utils;
pub mod replacer;
pub mod selection;
pub mod types;

// Re-export commonly used types
pub use assigner::{apply_items, assign_items, build_item_entries, parse_id_list, AssignOutcome};
pub use asset::{AssetDocument, AssetError};
pub use bindings::{
    AttachedScript, BindingTable, PropertyBinding, ScriptBinding, SerializedProperty, ThunkScanner,
};
pub use error::ImportError;
pub use replacer::{apply_catalog, clothing_from_catalog, replace_outfit_clothing, ReplaceOutcome};
pub use selection::{resolve_input_file, RecordKind, Selection};
pub use types::{
    parse_catalog, CatalogEntry, ClothingEntry, ConfigError, ItemEntry, ItemFieldConfig, KeyStyle,
    OutfitConfig, OutfitData, ProjectConfig, RecordKindConfig, CONFIG_FILE_NAME,
};
pub use path_utils::{has_extension, normalize_path, path_to_string};
