//! Engine asset documents
//!
//! Item assets are single YAML documents, usually preceded by engine
//! directives and a tagged document header:
//!
//! ```text
//! %YAML 1.1
//! %TAG !u! tag:unity3d.com,2011:
//! --- !u!114 &11400000
//! MonoBehaviour:
//!   m_Name: StarterOutfit
//!   _items:
//!   - _descriptorId: shirt-n_basic
//!     _paletteId: -1
//! ```
//!
//! The preamble (everything up to and including the `---` header) is kept
//! verbatim. A collection field is found either on the root mapping or inside
//! the single object mapping that wraps the body (`MonoBehaviour:` above).
//!
//! Replacing a collection rewrites only the lines of that field whenever the
//! splice reparses to the expected document; otherwise the body is
//! re-serialized as a whole.

use serde_yaml::{Sequence, Value};

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("collection field '{0}' not found")]
    MissingField(String),
}

/// Where a collection field lives in the body
#[derive(Debug, Clone, PartialEq, Eq)]
enum FieldLocation {
    Root,
    Nested(String),
}

/// A parsed asset document
#[derive(Debug, Clone)]
pub struct AssetDocument {
    text: String,
    body_start: usize,
    body: Value,
}

impl AssetDocument {
    pub fn parse(text: &str) -> Result<Self, AssetError> {
        let body_start = preamble_len(text);
        let body_text = &text[body_start..];
        let body = if body_text.trim().is_empty() {
            Value::Null
        } else {
            serde_yaml::from_str(body_text)?
        };

        Ok(Self {
            text: text.to_string(),
            body_start,
            body,
        })
    }

    /// Directive and header lines preceding the body
    pub fn preamble(&self) -> &str {
        &self.text[..self.body_start]
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    /// The named collection, if present and a sequence
    pub fn collection(&self, field: &str) -> Option<&Sequence> {
        let location = self.locate(field)?;
        lookup(&self.body, &location, field)?.as_sequence()
    }

    /// Full document text with `field` replaced by `entries`
    pub fn replace_collection(&self, field: &str, entries: &[Value]) -> Result<String, AssetError> {
        let location = self
            .locate(field)
            .ok_or_else(|| AssetError::MissingField(field.to_string()))?;

        let mut expected = self.body.clone();
        if let Some(target) = lookup_mut(&mut expected, &location, field) {
            *target = Value::Sequence(entries.to_vec());
        }

        if let Some(spliced) = self.splice(&location, field, entries)? {
            let reparsed = AssetDocument::parse(&spliced).ok();
            if reparsed.as_ref().map(|doc| &doc.body) == Some(&expected) {
                return Ok(spliced);
            }
            tracing::debug!("Line splice of '{}' did not reparse cleanly", field);
        }

        tracing::warn!(
            "Could not rewrite '{}' in place, re-serializing the whole document; formatting outside the field may change",
            field
        );
        Ok(format!("{}{}", self.preamble(), serde_yaml::to_string(&expected)?))
    }

    fn locate(&self, field: &str) -> Option<FieldLocation> {
        let root = self.body.as_mapping()?;
        if let Some(value) = root.get(field) {
            return value.is_sequence().then_some(FieldLocation::Root);
        }
        if root.len() != 1 {
            return None;
        }

        let (key, inner) = root.iter().next()?;
        let value = inner.as_mapping()?.get(field)?;
        if !value.is_sequence() {
            return None;
        }
        Some(FieldLocation::Nested(key.as_str()?.to_string()))
    }

    /// Rewrite only the lines of the field block. `None` when the block
    /// cannot be found textually.
    fn splice(
        &self,
        location: &FieldLocation,
        field: &str,
        entries: &[Value],
    ) -> Result<Option<String>, AssetError> {
        let body = &self.text[self.body_start..];
        let newline = if body.contains("\r\n") { "\r\n" } else { "\n" };
        let lines = line_spans(body);

        let found = match location {
            FieldLocation::Root => find_key(&lines, 0, field, 0).map(|index| (index, 0)),
            FieldLocation::Nested(wrapper) => find_key(&lines, 0, wrapper, 0).and_then(|w| {
                let child_indent = lines[w + 1..]
                    .iter()
                    .map(|(_, line)| *line)
                    .find(|line| !is_blank(line))
                    .map(indent_of)
                    .filter(|&n| n > 0)?;
                find_key(&lines, w + 1, field, child_indent).map(|index| (index, child_indent))
            }),
        };
        let Some((key_index, indent)) = found else {
            return Ok(None);
        };

        let mut last = key_index;
        for (index, (_, line)) in lines.iter().enumerate().skip(key_index + 1) {
            if is_blank(line) {
                continue;
            }
            let n = indent_of(line);
            let content = line[n..].trim_end();
            let is_item = content == "-" || content.starts_with("- ");
            if n > indent || (n == indent && is_item) {
                last = index;
            } else {
                break;
            }
        }

        let start = lines[key_index].0;
        let end = lines[last].0 + lines[last].1.len();
        let block = render_block(field, entries, indent, newline)?;

        let mut out = String::with_capacity(self.text.len() + block.len());
        out.push_str(self.preamble());
        out.push_str(&body[..start]);
        out.push_str(&block);
        out.push_str(&body[end..]);
        Ok(Some(out))
    }
}

fn lookup<'a>(body: &'a Value, location: &FieldLocation, field: &str) -> Option<&'a Value> {
    match location {
        FieldLocation::Root => body.get(field),
        FieldLocation::Nested(wrapper) => body.get(wrapper.as_str())?.get(field),
    }
}

fn lookup_mut<'a>(body: &'a mut Value, location: &FieldLocation, field: &str) -> Option<&'a mut Value> {
    match location {
        FieldLocation::Root => body.get_mut(field),
        FieldLocation::Nested(wrapper) => body.get_mut(wrapper.as_str())?.get_mut(field),
    }
}

/// Byte length of the directive/header preamble (0 when there is none)
fn preamble_len(text: &str) -> usize {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let trimmed = line.trim();
        if trimmed == "---" || trimmed.starts_with("--- ") {
            return offset + line.len();
        }
        if trimmed.is_empty() || trimmed.starts_with('%') || trimmed.starts_with('#') {
            offset += line.len();
            continue;
        }
        break;
    }
    0
}

/// `(start offset, line including terminator)` for every line
fn line_spans(text: &str) -> Vec<(usize, &str)> {
    let mut spans = Vec::new();
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        spans.push((offset, line));
        offset += line.len();
    }
    spans
}

fn is_blank(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

/// First line at or after `from` that declares `key` at exactly `indent`,
/// stopping once the enclosing block ends.
fn find_key(lines: &[(usize, &str)], from: usize, key: &str, indent: usize) -> Option<usize> {
    for (index, (_, line)) in lines.iter().enumerate().skip(from) {
        if is_blank(line) {
            continue;
        }
        let n = indent_of(line);
        if n < indent {
            return None;
        }
        if n == indent && declares_key(&line[n..], key) {
            return Some(index);
        }
    }
    None
}

fn declares_key(content: &str, key: &str) -> bool {
    content
        .strip_prefix(key)
        .and_then(|rest| rest.strip_prefix(':'))
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
}

fn render_block(
    field: &str,
    entries: &[Value],
    indent: usize,
    newline: &str,
) -> Result<String, serde_yaml::Error> {
    let pad = " ".repeat(indent);
    if entries.is_empty() {
        return Ok(format!("{pad}{field}: []{newline}"));
    }

    let mut out = format!("{pad}{field}:{newline}");
    for entry in entries {
        let rendered = serde_yaml::to_string(entry)?;
        for (i, line) in rendered.lines().enumerate() {
            out.push_str(&pad);
            out.push_str(if i == 0 { "- " } else { "  " });
            out.push_str(line);
            out.push_str(newline);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENGINE_ASSET: &str = "%YAML 1.1
%TAG !u! tag:unity3d.com,2011:
--- !u!114 &11400000
MonoBehaviour:
  m_ObjectHideFlags: 0
  m_Script: {fileID: 11500000, guid: 5f2c9a0e8d1b4c7a, type: 3}
  m_Name: StarterOutfit
  m_EditorClassIdentifier:
  _items:
  - _descriptorId: shirt-n_basic
    _paletteId: 3
  - _descriptorId: pants-n_jeans
    _paletteId: -1
  _skeleton: female
";

    fn entry(id: &str) -> Value {
        serde_yaml::from_str(&format!("_descriptorId: {id}\n_paletteId: -1\n")).unwrap()
    }

    #[test]
    fn test_preamble_split() {
        let doc = AssetDocument::parse(ENGINE_ASSET).unwrap();
        assert_eq!(
            doc.preamble(),
            "%YAML 1.1\n%TAG !u! tag:unity3d.com,2011:\n--- !u!114 &11400000\n"
        );
        assert_eq!(doc.collection("_items").unwrap().len(), 2);
    }

    #[test]
    fn test_no_preamble() {
        let doc = AssetDocument::parse("_items:\n- a\n").unwrap();
        assert_eq!(doc.preamble(), "");
        assert_eq!(doc.collection("_items").unwrap().len(), 1);
    }

    #[test]
    fn test_splice_keeps_other_lines() {
        let doc = AssetDocument::parse(ENGINE_ASSET).unwrap();
        let out = doc.replace_collection("_items", &[entry("hat-n_cap")]).unwrap();

        let expected = ENGINE_ASSET.replace(
            "  - _descriptorId: shirt-n_basic\n    _paletteId: 3\n  - _descriptorId: pants-n_jeans\n    _paletteId: -1\n",
            "  - _descriptorId: hat-n_cap\n    _paletteId: -1\n",
        );
        assert_eq!(out, expected);
        // untouched empty scalar stays as written
        assert!(out.contains("  m_EditorClassIdentifier:\n"));
    }

    #[test]
    fn test_replace_with_empty_list() {
        let doc = AssetDocument::parse(ENGINE_ASSET).unwrap();
        let out = doc.replace_collection("_items", &[]).unwrap();
        assert!(out.contains("  _items: []\n  _skeleton: female\n"));
        assert!(AssetDocument::parse(&out).unwrap().collection("_items").unwrap().is_empty());
    }

    #[test]
    fn test_replace_inline_empty_list() {
        let text = "MonoBehaviour:\n  m_Name: Empty\n  _items: []\n";
        let doc = AssetDocument::parse(text).unwrap();
        let out = doc.replace_collection("_items", &[entry("a"), entry("b")]).unwrap();
        assert_eq!(
            out,
            "MonoBehaviour:\n  m_Name: Empty\n  _items:\n  - _descriptorId: a\n    _paletteId: -1\n  - _descriptorId: b\n    _paletteId: -1\n"
        );
    }

    #[test]
    fn test_root_level_collection() {
        let text = "name: starter\n_items:\n  - _descriptorId: old\n    _paletteId: 1\nversion: 2\n";
        let doc = AssetDocument::parse(text).unwrap();
        let out = doc.replace_collection("_items", &[entry("new")]).unwrap();
        assert_eq!(
            out,
            "name: starter\n_items:\n- _descriptorId: new\n  _paletteId: -1\nversion: 2\n"
        );
    }

    #[test]
    fn test_quoted_ids_are_escaped() {
        let text = "_items: []\n";
        let doc = AssetDocument::parse(text).unwrap();
        let odd = Value::Mapping(
            [(Value::from("_descriptorId"), Value::from("a: b")), (Value::from("_paletteId"), Value::from(-1))]
                .into_iter()
                .collect(),
        );
        let out = doc.replace_collection("_items", &[odd]).unwrap();
        let reparsed = AssetDocument::parse(&out).unwrap();
        let items = reparsed.collection("_items").unwrap();
        assert_eq!(items[0]["_descriptorId"], Value::from("a: b"));
    }

    #[test]
    fn test_quoted_key_falls_back_to_reserialize() {
        let text = "--- !u!114 &11400000\nMonoBehaviour:\n  m_Name: Quoted\n  \"_items\": [old]\n";
        let doc = AssetDocument::parse(text).unwrap();
        let out = doc.replace_collection("_items", &[entry("new")]).unwrap();

        assert!(out.starts_with("--- !u!114 &11400000\n"));
        let reparsed = AssetDocument::parse(&out).unwrap();
        let items = reparsed.collection("_items").unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["_descriptorId"], Value::from("new"));
        assert_eq!(reparsed.body["MonoBehaviour"]["m_Name"], Value::from("Quoted"));
    }

    #[test]
    fn test_missing_field() {
        let doc = AssetDocument::parse("MonoBehaviour:\n  m_Name: X\n").unwrap();
        assert!(doc.collection("_items").is_none());
        assert!(matches!(
            doc.replace_collection("_items", &[]),
            Err(AssetError::MissingField(_))
        ));
    }

    #[test]
    fn test_field_that_is_not_a_list() {
        let doc = AssetDocument::parse("_items: 4\n").unwrap();
        assert!(doc.collection("_items").is_none());
        assert!(doc.replace_collection("_items", &[]).is_err());
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(matches!(
            AssetDocument::parse("_items: [unclosed\n"),
            Err(AssetError::Yaml(_))
        ));
    }

    #[test]
    fn test_crlf_line_endings() {
        let text = "MonoBehaviour:\r\n  _items:\r\n  - _descriptorId: a\r\n    _paletteId: 1\r\n  m_Name: X\r\n";
        let doc = AssetDocument::parse(text).unwrap();
        let out = doc.replace_collection("_items", &[entry("b")]).unwrap();
        assert_eq!(
            out,
            "MonoBehaviour:\r\n  _items:\r\n  - _descriptorId: b\r\n    _paletteId: -1\r\n  m_Name: X\r\n"
        );
    }
}
