//! Record selection
//!
//! The operator points a command at a record on disk. A selection is only
//! handed to a transform once it exists and is of the kind the transform
//! edits.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ImportError;
use crate::path_utils::{has_extension, path_to_string};
use crate::types::RecordKindConfig;

/// Kinds of record a command can be pointed at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// Serialized data asset with an item collection
    ItemAsset,
    /// Outfit JSON record
    Outfit,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::ItemAsset => write!(f, "an item asset"),
            RecordKind::Outfit => write!(f, "an outfit"),
        }
    }
}

/// A record on disk that has been checked against the expected kind
#[derive(Debug, Clone)]
pub struct Selection {
    path: PathBuf,
    kind: RecordKind,
}

impl Selection {
    /// Check the operator's selection.
    ///
    /// No path is `MissingSelection`, a path that does not exist is
    /// `MissingInputFile`, and a directory or an unregistered extension is
    /// `WrongRecordKind`.
    pub fn resolve(
        path: Option<&Path>,
        kind: RecordKind,
        kinds: &RecordKindConfig,
    ) -> Result<Self, ImportError> {
        let path = path.ok_or(ImportError::MissingSelection)?;
        if !path.exists() {
            return Err(ImportError::MissingInputFile(path_to_string(path)));
        }

        let extensions = match kind {
            RecordKind::ItemAsset => &kinds.item_asset,
            RecordKind::Outfit => &kinds.outfit,
        };
        if !path.is_file() || !has_extension(path, extensions) {
            return Err(ImportError::WrongRecordKind {
                path: path_to_string(path),
                expected: kind,
            });
        }

        Ok(Self {
            path: path.to_path_buf(),
            kind,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// Normalized path for messages
    pub fn display(&self) -> String {
        path_to_string(&self.path)
    }

    pub fn read(&self) -> Result<String, ImportError> {
        fs::read_to_string(&self.path).map_err(|source| ImportError::Io {
            path: self.display(),
            source,
        })
    }

    /// Replace the record's contents
    pub fn overwrite(&self, contents: &str) -> Result<(), ImportError> {
        fs::write(&self.path, contents).map_err(|source| ImportError::Io {
            path: self.display(),
            source,
        })
    }
}

/// Check a picked input file (e.g. a catalog export). Not picking one, or
/// picking one that does not exist, is `MissingInputFile`.
pub fn resolve_input_file(path: Option<&Path>) -> Result<PathBuf, ImportError> {
    match path {
        Some(path) if path.is_file() => Ok(path.to_path_buf()),
        Some(path) => Err(ImportError::MissingInputFile(path_to_string(path))),
        None => Err(ImportError::MissingInputFile("<none selected>".to_string())),
    }
}
