//! Script binding tables
//!
//! Generated script components ("thunks") carry no logic of their own: each
//! one names a script asset and forwards its serialized fields, in order, to
//! the script's property slots. This module reads those declarations out of
//! generated sources into a static table and reproduces the forwarding rule.
//!
//! Tables are stored as TOML:
//!
//! ```toml
//! [[script]]
//! name = "ItemStore"
//! menuPath = "Lua/ItemStore"
//! registerTypeId = "0x2be55b4a46fe5fd7"
//! baseType = "LuaBehaviour"
//! scriptGuid = "90bde850f0274a540806709bbb0c9a6e"
//!
//! [[script.properties]]
//! slot = 0
//! field = "_gameSettings"
//! typeName = "UnityEngine.Object"
//! defaultLiteral = "default"
//! scriptTypeGuid = "e4857184bfb273d40b3b6f28fe01513a"
//! ```

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ImportError;
use crate::path_utils::path_to_string;

/// Extension of generated thunk sources
pub const THUNK_EXTENSION: &str = "cs";

/// All bindings known to a project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BindingTable {
    #[serde(default, rename = "script")]
    pub scripts: Vec<ScriptBinding>,
}

/// One generated component and the script it binds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptBinding {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_path: Option<String>,

    /// Registered script type id, stored as a hex string
    #[serde(with = "hex_id")]
    pub register_type_id: u64,

    pub base_type: String,

    pub script_guid: String,

    /// Forwarded fields in slot order
    #[serde(default)]
    pub properties: Vec<PropertyBinding>,
}

/// A serialized field and the property slot it feeds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyBinding {
    pub slot: usize,

    pub field: String,

    pub type_name: String,

    /// Initializer as written in the generated source (`default`, `""`, `10`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_literal: Option<String>,

    /// GUID of the script type the field expects, for script-typed fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_type_guid: Option<String>,
}

/// The script asset currently attached to a component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedScript {
    pub guid: String,

    /// Property names declared by the script, by slot
    pub property_names: Vec<String>,
}

/// A field value bound to a script property slot
#[derive(Debug, Clone, PartialEq)]
pub struct SerializedProperty {
    pub slot: usize,

    /// Name the script gives the slot, when it declares one
    pub script_property: Option<String>,

    pub field: String,

    pub value: Value,
}

impl ScriptBinding {
    /// Forward field values to script slots.
    ///
    /// Without an attached script nothing is forwarded. Otherwise every bound
    /// field yields one entry in slot order, taking its value from `values`
    /// and falling back to the field's default.
    pub fn serialize_properties(
        &self,
        script: Option<&AttachedScript>,
        values: &Map<String, Value>,
    ) -> Vec<SerializedProperty> {
        let Some(script) = script else {
            return Vec::new();
        };

        let mut properties: Vec<_> = self
            .properties
            .iter()
            .map(|binding| SerializedProperty {
                slot: binding.slot,
                script_property: script.property_names.get(binding.slot).cloned(),
                field: binding.field.clone(),
                value: values
                    .get(&binding.field)
                    .cloned()
                    .unwrap_or_else(|| binding.default_value()),
            })
            .collect();
        properties.sort_by_key(|p| p.slot);
        properties
    }

    pub fn property(&self, field: &str) -> Option<&PropertyBinding> {
        self.properties.iter().find(|p| p.field == field)
    }
}

impl PropertyBinding {
    /// The default literal as a JSON value; `default` and no initializer are null
    pub fn default_value(&self) -> Value {
        let Some(literal) = self.default_literal.as_deref().map(str::trim) else {
            return Value::Null;
        };
        match literal {
            "default" | "null" => Value::Null,
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => {
                if let Some(inner) = literal.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
                    return Value::String(unescape(inner));
                }
                let numeric = literal.trim_end_matches(['f', 'F', 'd', 'D', 'L', 'l']);
                if let Ok(int) = numeric.parse::<i64>() {
                    return Value::from(int);
                }
                if let Ok(float) = numeric.parse::<f64>() {
                    return Value::from(float);
                }
                Value::String(literal.to_string())
            }
        }
    }
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

impl BindingTable {
    pub fn from_file(path: &Path) -> Result<Self, ImportError> {
        let label = path_to_string(path);
        if !path.is_file() {
            return Err(ImportError::MissingInputFile(label));
        }
        let content = fs::read_to_string(path).map_err(|source| ImportError::Io {
            path: label.clone(),
            source,
        })?;
        toml::from_str(&content).map_err(|e| ImportError::parse(label, e))
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn write(&self, path: &Path) -> Result<(), ImportError> {
        let label = path_to_string(path);
        let content = self.to_toml().map_err(|e| ImportError::parse(label.clone(), e))?;
        fs::write(path, content).map_err(|source| ImportError::Io { path: label, source })
    }

    pub fn find_by_name(&self, name: &str) -> Option<&ScriptBinding> {
        self.scripts.iter().find(|s| s.name == name)
    }

    pub fn find_by_guid(&self, guid: &str) -> Option<&ScriptBinding> {
        self.scripts.iter().find(|s| s.script_guid.eq_ignore_ascii_case(guid))
    }

    /// Problems that would make the table ambiguous: reused type ids or
    /// script GUIDs, and fields bound to the same slot twice.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let mut type_ids = HashMap::new();
        let mut guids = HashMap::new();

        for script in &self.scripts {
            if let Some(other) = type_ids.insert(script.register_type_id, &script.name) {
                problems.push(format!(
                    "{} and {} share type id {:#x}",
                    other, script.name, script.register_type_id
                ));
            }
            if let Some(other) = guids.insert(script.script_guid.to_ascii_lowercase(), &script.name) {
                problems.push(format!(
                    "{} and {} share script GUID {}",
                    other, script.name, script.script_guid
                ));
            }

            let mut slots = HashSet::new();
            for property in &script.properties {
                if !slots.insert(property.slot) {
                    problems.push(format!("{} binds slot {} more than once", script.name, property.slot));
                }
            }
        }
        problems
    }
}

/// Extracts binding declarations from generated thunk sources
pub struct ThunkScanner {
    menu: Regex,
    register: Regex,
    class: Regex,
    guid: Regex,
    property_attribute: Regex,
    field: Regex,
    slot: Regex,
}

impl Default for ThunkScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl ThunkScanner {
    pub fn new() -> Self {
        Self {
            menu: Regex::new(r#"\[AddComponentMenu\("([^"]*)"\)\]"#).unwrap(),
            register: Regex::new(r"\[LuaRegisterType\(0x([0-9a-fA-F]+),\s*typeof\(([\w.]+)\)\)\]").unwrap(),
            class: Regex::new(r"\bclass\s+(\w+)\s*:").unwrap(),
            guid: Regex::new(r#"s_scriptGUID\s*=\s*"([0-9a-fA-F]+)""#).unwrap(),
            property_attribute: Regex::new(r#"\[LuaScriptPropertyAttribute\("([0-9a-fA-F]+)"\)\]"#).unwrap(),
            field: Regex::new(r"\[SerializeField\]\s*public\s+(.+?)\s+(\w+)\s*(?:=\s*(.+?))?\s*;").unwrap(),
            slot: Regex::new(r"GetPropertyAt\((\d+)\)\s*,\s*(\w+)\s*\)").unwrap(),
        }
    }

    /// Parse one generated source. `label` names it in errors.
    pub fn parse_source(&self, source: &str, label: &str) -> Result<ScriptBinding, ImportError> {
        let name = self
            .class
            .captures(source)
            .map(|c| c[1].to_string())
            .ok_or_else(|| ImportError::parse(label, "no class declaration"))?;
        let script_guid = self
            .guid
            .captures(source)
            .map(|c| c[1].to_string())
            .ok_or_else(|| ImportError::parse(label, "no script GUID"))?;
        let (register_type_id, base_type) = match self.register.captures(source) {
            Some(c) => {
                let id = u64::from_str_radix(&c[1], 16).map_err(|e| ImportError::parse(label, e))?;
                (id, c[2].to_string())
            }
            None => return Err(ImportError::parse(label, "no registered type id")),
        };
        let menu_path = self.menu.captures(source).map(|c| c[1].to_string());

        let mut properties = Vec::new();
        let mut pending_guid = None;
        for line in source.lines() {
            if let Some(c) = self.property_attribute.captures(line) {
                pending_guid = Some(c[1].to_string());
            }
            if let Some(c) = self.field.captures(line) {
                properties.push(PropertyBinding {
                    slot: properties.len(),
                    field: c[2].to_string(),
                    type_name: c[1].to_string(),
                    default_literal: c.get(3).map(|m| m.as_str().to_string()),
                    script_type_guid: pending_guid.take(),
                });
            }
        }

        // explicit slot indices win over declaration order
        let slots: HashMap<String, usize> = self
            .slot
            .captures_iter(source)
            .filter_map(|c| Some((c[2].to_string(), c[1].parse().ok()?)))
            .collect();
        for property in &mut properties {
            if let Some(&slot) = slots.get(&property.field) {
                property.slot = slot;
            }
        }
        properties.sort_by_key(|p| p.slot);

        Ok(ScriptBinding {
            name,
            menu_path,
            register_type_id,
            base_type,
            script_guid,
            properties,
        })
    }

    /// Parse every thunk source directly inside `dir`, sorted by file name
    pub fn scan_dir(&self, dir: &Path) -> Result<BindingTable, ImportError> {
        let label = path_to_string(dir);
        if !dir.is_dir() {
            return Err(ImportError::MissingInputFile(label));
        }

        let entries = fs::read_dir(dir).map_err(|source| ImportError::Io {
            path: label.clone(),
            source,
        })?;
        let mut paths: Vec<_> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path
                        .extension()
                        .and_then(|e| e.to_str())
                        .is_some_and(|e| e.eq_ignore_ascii_case(THUNK_EXTENSION))
            })
            .collect();
        paths.sort();

        let mut table = BindingTable::default();
        for path in paths {
            let file_label = path_to_string(&path);
            let source = fs::read_to_string(&path).map_err(|source| ImportError::Io {
                path: file_label.clone(),
                source,
            })?;
            let binding = self.parse_source(&source, &file_label)?;
            tracing::debug!(
                "Scanned {} ({} properties) from {}",
                binding.name,
                binding.properties.len(),
                file_label
            );
            table.scripts.push(binding);
        }

        tracing::info!("Scanned {} thunk(s) in {}", table.scripts.len(), label);
        Ok(table)
    }
}

mod hex_id {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(id: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{:#x}", id))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let s = String::deserialize(deserializer)?;
        let digits = s.trim_start_matches("0x").trim_start_matches("0X");
        u64::from_str_radix(digits, 16).map_err(D::Error::custom)
    }
}
