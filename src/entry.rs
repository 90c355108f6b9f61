use std::fs::FileType;
use std::path::PathBuf;

#[cfg(feature = "json_schema")]
use schemars::JsonSchema;
use serde::Deserialize;
use serde::Serialize;

/// Classifies a resolved filesystem node.
///
/// A symlink is classified as itself, not as its target, unless the
/// walker was told to follow links.
#[cfg_attr(feature = "json_schema", derive(JsonSchema))]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Hash, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// A regular file.
    File,
    /// A directory.
    Directory,
    /// A symbolic link that has not been followed.
    Symlink,
}

impl From<FileType> for EntryKind {
    /// Classify from a `FileType` obtained without following links.
    fn from(file_type: FileType) -> Self {
        if file_type.is_symlink() {
            EntryKind::Symlink
        } else if file_type.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        }
    }
}

/// A resolved filesystem node: its native absolute path and its kind.
#[cfg_attr(feature = "json_schema", derive(JsonSchema))]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Hash, Eq)]
pub struct Entry {
    /// Absolute path of the node.
    pub path: PathBuf,
    /// Kind of the node.
    pub kind: EntryKind,
}

/// An entry as emitted by the walker, paired with its component path
/// relative to the root it was emitted under. The root itself carries an
/// empty component list.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WalkEntry {
    pub entry: Entry,
    pub rel: Vec<String>,
}

impl WalkEntry {
    /// The node's name inside its parent directory. Empty for a root.
    pub fn name(&self) -> &str {
        self.rel.last().map(String::as_str).unwrap_or("")
    }

    /// Renders the structure-mode relative name: the literal `"."` for a
    /// root, otherwise the components joined with the platform separator
    /// under the `"."` marker.
    pub fn relative_name(&self) -> String {
        relative_name(&self.rel)
    }
}

/// Renders a component path as a structure-mode relative name.
pub(crate) fn relative_name(rel: &[String]) -> String {
    if rel.is_empty() {
        ".".to_string()
    } else {
        let sep = std::path::MAIN_SEPARATOR_STR;
        format!(".{sep}{}", rel.join(sep))
    }
}
