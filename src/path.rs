use std::fmt::Display;
use std::path::Path as StdPath;
use std::path::PathBuf;

#[cfg(feature = "json_schema")]
use schemars::JsonSchema;
use serde::Deserialize;
use serde::Serialize;

use crate::Entry;
use crate::errors::Error;

/// The fixed URI scheme prefix accepted for path references.
pub const SCHEME: &str = "path://";

/// An opaque wrapper around a native absolute filesystem path,
/// constructed from a `path://` reference string. Immutable once built.
#[cfg_attr(feature = "json_schema", derive(JsonSchema))]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Hash, Eq)]
pub struct PathReference {
    path: PathBuf,
}

impl Display for PathReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

impl PathReference {
    /// Parses a raw reference string.
    ///
    /// The string must carry the [`SCHEME`] prefix and wrap an absolute
    /// native path; anything else is an `Error::InvalidArgument`. The
    /// target is not touched at parse time.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let Some(rest) = raw.strip_prefix(SCHEME) else {
            return Err(Error::InvalidArgument(format!(
                "missing '{SCHEME}' scheme in reference: {raw}"
            )));
        };
        let path = PathBuf::from(rest);
        if !path.is_absolute() {
            return Err(Error::InvalidArgument(format!(
                "reference must wrap an absolute path: {raw}"
            )));
        }
        Ok(Self { path })
    }

    /// Returns the wrapped native path.
    pub fn as_path(&self) -> &StdPath {
        &self.path
    }

    /// Renders the reference back to its `path://` string form.
    pub fn to_uri(&self) -> String {
        format!("{SCHEME}{}", self.path.display())
    }

    /// Validates that the target exists and classifies its kind.
    ///
    /// Classification looks at the link itself, not its target; following
    /// is the walker's decision. A missing target is `Error::NotFound`,
    /// an unreadable one `Error::AccessDenied`.
    pub async fn resolve(&self) -> Result<Entry, Error> {
        let metadata = tokio::fs::symlink_metadata(&self.path)
            .await
            .map_err(|e| Error::from_io(&self.path, &e))?;
        Ok(Entry {
            path: self.path.clone(),
            kind: metadata.file_type().into(),
        })
    }
}

impl TryFrom<&str> for PathReference {
    type Error = Error;

    fn try_from(raw: &str) -> Result<Self, Self::Error> {
        Self::parse(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EntryKind;
    use crate::TestRoot;

    #[test]
    fn parse_accepts_scheme_over_absolute_path() {
        let reference = PathReference::parse("path:///tmp/somewhere").unwrap();
        assert_eq!(reference.as_path(), StdPath::new("/tmp/somewhere"));
        assert_eq!(reference.to_uri(), "path:///tmp/somewhere");
    }

    #[test]
    fn parse_rejects_missing_scheme() {
        let err = PathReference::parse("/tmp/somewhere").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn parse_rejects_other_schemes() {
        let err = PathReference::parse("file:///tmp/somewhere").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn parse_rejects_relative_remainder() {
        let err = PathReference::parse("path://some/relative").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn resolve_classifies_file_and_directory() {
        let fixture = TestRoot::new().unwrap();
        let dir = PathReference::parse(&fixture.uri("test_directory"))
            .unwrap()
            .resolve()
            .await
            .unwrap();
        assert_eq!(dir.kind, EntryKind::Directory);

        let file = PathReference::parse(&fixture.uri("test_directory/foo1.txt"))
            .unwrap()
            .resolve()
            .await
            .unwrap();
        assert_eq!(file.kind, EntryKind::File);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn resolve_classifies_symlink_as_itself() {
        let fixture = TestRoot::new().unwrap();
        let link = PathReference::parse(&fixture.uri("test_directory/sym_link"))
            .unwrap()
            .resolve()
            .await
            .unwrap();
        assert_eq!(link.kind, EntryKind::Symlink);
    }

    #[tokio::test]
    async fn resolve_of_missing_target_is_not_found() {
        let fixture = TestRoot::new().unwrap();
        let err = PathReference::parse(&fixture.uri("test_directory/ghost"))
            .unwrap()
            .resolve()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }
}
