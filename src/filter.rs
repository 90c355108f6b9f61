use std::collections::HashSet;

use crate::Entry;
use crate::EntryKind;
use crate::mime::MimeClassifier;

/// The retention rule applied to walker output.
///
/// With no filter configured every entry is retained. With a filter, an
/// entry is retained iff it is not a directory and its classified
/// mimetype is a member of the configured set. Directories only reach
/// structured output through their retained descendants.
#[derive(Debug, Clone, Default)]
pub(crate) struct MimeFilter {
    allowed: Option<HashSet<String>>,
}

impl MimeFilter {
    /// Builds the filter; `None` disables filtering entirely.
    pub fn new(mimetypes: Option<&[String]>) -> Self {
        Self {
            allowed: mimetypes.map(|m| m.iter().cloned().collect()),
        }
    }

    /// Applies the retention rule to one entry.
    pub fn retain(&self, entry: &Entry, classifier: &dyn MimeClassifier) -> bool {
        let Some(allowed) = &self.allowed else {
            return true;
        };
        if entry.kind == EntryKind::Directory {
            return false;
        }
        classifier
            .classify(&entry.path)
            .map(|mimetype| allowed.contains(&mimetype))
            .unwrap_or(false)
    }
}
