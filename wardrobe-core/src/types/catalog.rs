//! Catalog exports
//!
//! A catalog file is a bare JSON list of owned-item records as exported by
//! the game backend. Only the item id and the active palette are consumed.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One catalog record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub item_id: String,

    pub active_palette: i64,

    #[serde(default)]
    pub account_bound: bool,

    /// Opaque metadata (`nft_metadata`, `remote_render_metadata`, ...)
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

/// Parse a catalog file. Anything but a list of records is an error.
pub fn parse_catalog(content: &str) -> Result<Vec<CatalogEntry>, serde_json::Error> {
    serde_json::from_str(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_catalog() {
        let json = r#"[
            { "item_id": "a", "active_palette": 2, "account_bound": true, "nft_metadata": null },
            { "item_id": "b", "active_palette": 0 }
        ]"#;
        let entries = parse_catalog(json).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].account_bound);
        assert!(entries[0].metadata.contains_key("nft_metadata"));
        assert!(!entries[1].account_bound);
    }

    #[test]
    fn test_object_is_not_a_catalog() {
        let json = r#"{ "item_id": "a", "active_palette": 2 }"#;
        assert!(parse_catalog(json).is_err());
    }

    #[test]
    fn test_entry_without_item_id_rejected() {
        let json = r#"[{ "active_palette": 2 }]"#;
        assert!(parse_catalog(json).is_err());
    }
}
