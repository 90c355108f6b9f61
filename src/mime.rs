use std::collections::HashMap;
use std::path::Path as StdPath;

/// Maps a file path to a mimetype string.
///
/// Consulted once per non-directory entry when a mimetype filter is
/// active. Hosts with a richer classification source can provide their
/// own implementation.
pub trait MimeClassifier: Send + Sync {
    /// Returns the mimetype for `path`, or `None` when it cannot be
    /// classified.
    fn classify(&self, path: &StdPath) -> Option<String>;
}

/// The built-in classification table, keyed by lowercased file extension.
static EXTENSION_TABLE: &[(&str, &str)] = &[
    ("bmp", "image/bmp"),
    ("css", "text/css"),
    ("csv", "text/csv"),
    ("gif", "image/gif"),
    ("gz", "application/gzip"),
    ("htm", "text/html"),
    ("html", "text/html"),
    ("jpeg", "image/jpeg"),
    ("jpg", "image/jpeg"),
    ("js", "text/javascript"),
    ("json", "application/json"),
    ("md", "text/markdown"),
    ("mov", "video/quicktime"),
    ("mp3", "audio/mpeg"),
    ("mp4", "video/mp4"),
    ("pdf", "application/pdf"),
    ("png", "image/png"),
    ("svg", "image/svg+xml"),
    ("tar", "application/x-tar"),
    ("text", "text/plain"),
    ("tiff", "image/tiff"),
    ("txt", "text/plain"),
    ("wav", "audio/wav"),
    ("webp", "image/webp"),
    ("xml", "application/xml"),
    ("zip", "application/zip"),
];

/// An extension-keyed [`MimeClassifier`].
///
/// Starts from the built-in table; additional mappings can be layered on
/// with [`ExtensionTable::insert`].
#[derive(Debug, Clone)]
pub struct ExtensionTable {
    table: HashMap<String, String>,
}

impl Default for ExtensionTable {
    fn default() -> Self {
        Self {
            table: EXTENSION_TABLE
                .iter()
                .map(|(ext, mime)| (ext.to_string(), mime.to_string()))
                .collect(),
        }
    }
}

impl ExtensionTable {
    /// Creates a classifier holding the built-in table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or overrides a mapping. Extensions match case-insensitively.
    pub fn insert(&mut self, extension: &str, mimetype: &str) {
        self.table
            .insert(extension.to_lowercase(), mimetype.to_string());
    }
}

impl MimeClassifier for ExtensionTable {
    fn classify(&self, path: &StdPath) -> Option<String> {
        let ext = path.extension()?.to_str()?;
        self.table.get(&ext.to_lowercase()).cloned()
    }
}
