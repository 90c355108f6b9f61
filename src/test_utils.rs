use std::fs;
use std::fs::create_dir_all;
use std::path::Path as StdPath;
use std::path::PathBuf;

use tempdir::TempDir;

use crate::Error;

/// File paths to create in the temporary fixture tree. The layout mirrors
/// the canonical listing fixture: a directory with three text files, a
/// symlink whose target lives outside the walked subtree, and one
/// subdirectory with three more text files.
pub(crate) static TEMP_FILES: &[(&str, bool)] = &[
    ("test_directory", true),
    ("test_directory/foo1.txt", false),
    ("test_directory/foo2.txt", false),
    ("test_directory/foo3.txt", false),
    ("test_directory/test_directory_1", true),
    ("test_directory/test_directory_1/bar1.txt", false),
    ("test_directory/test_directory_1/bar2.txt", false),
    ("test_directory/test_directory_1/bar3.txt", false),
    ("sym_link_target", true),
    ("sym_link_target/sym1.txt", false),
];

/// Utility structure for managing a temporary fixture directory.
///
/// On Unix the fixture additionally carries
/// `test_directory/sym_link -> sym_link_target`; tests exercising link
/// behavior are gated accordingly.
#[derive(Debug)]
pub struct TestRoot {
    /// Root of the temporary fixture directory.
    pub root: TempDir,
    root_path: PathBuf,
}

impl TestRoot {
    /// Creates the fixture tree in a fresh temporary directory.
    pub fn new() -> Result<Self, Error> {
        let root = TempDir::new("dirlist").map_err(|e| Error::Read {
            what: "temporary directory".into(),
            how: e.to_string(),
        })?;
        // Canonicalized so expected paths line up with walker output even
        // when the temp location itself sits behind a symlink.
        let root_path = root.path().canonicalize().map_err(|e| Error::Read {
            what: root.path().display().to_string(),
            how: e.to_string(),
        })?;
        let ret = Self { root, root_path };
        for (relative_path, is_dir) in TEMP_FILES {
            if *is_dir {
                ret.create_dir(relative_path).map_err(|e| Error::Read {
                    what: relative_path.to_string(),
                    how: e.to_string(),
                })?;
            } else {
                ret.create_file(relative_path, relative_path)
                    .map_err(|e| Error::Read {
                        what: relative_path.to_string(),
                        how: e.to_string(),
                    })?;
            }
        }
        #[cfg(unix)]
        std::os::unix::fs::symlink(
            ret.join("sym_link_target"),
            ret.join("test_directory/sym_link"),
        )
        .map_err(|e| Error::Read {
            what: "sym_link".into(),
            how: e.to_string(),
        })?;
        Ok(ret)
    }

    /// The canonical fixture root path.
    pub fn path(&self) -> &StdPath {
        &self.root_path
    }

    /// Joins a `/`-separated relative path onto the fixture root using
    /// native components.
    pub fn join(&self, relative: &str) -> PathBuf {
        let mut ret = self.root_path.clone();
        for comp in relative.split('/') {
            ret.push(comp);
        }
        ret
    }

    /// The absolute path string of a fixture member.
    pub fn abs(&self, relative: &str) -> String {
        self.join(relative).display().to_string()
    }

    /// The `path://` reference of a fixture member.
    pub fn uri(&self, relative: &str) -> String {
        format!("path://{}", self.abs(relative))
    }

    /// Creates a file (and any missing parents) under the fixture root.
    pub fn create_file(&self, relative: &str, contents: &str) -> Result<(), std::io::Error> {
        let full_path = self.join(relative);
        if let Some(parent) = full_path.parent() {
            create_dir_all(parent)?;
        }
        fs::write(&full_path, contents)
    }

    /// Creates a directory (and any missing parents) under the fixture
    /// root.
    pub fn create_dir(&self, relative: &str) -> Result<(), std::io::Error> {
        create_dir_all(self.join(relative))
    }
}

// The functions in this mod are intentionally written with an
// alternative approach so the main traversal logic is checked against an
// independent enumeration.
pub(crate) mod cross_check {
    use std::path::Path as StdPath;

    use async_walkdir::WalkDir;
    use futures_lite::StreamExt;

    use crate::Error;

    /// Recursively enumerates every path under `dir` (links as leaves),
    /// sorted, excluding `dir` itself.
    pub(crate) async fn recursive_paths(dir: &StdPath) -> Result<Vec<String>, Error> {
        let mut entries = WalkDir::new(dir);
        let mut ret = Vec::new();
        loop {
            match entries.next().await {
                Some(Ok(entry)) => ret.push(entry.path().display().to_string()),
                Some(Err(e)) => {
                    return Err(Error::Read {
                        what: dir.display().to_string(),
                        how: e.to_string(),
                    });
                }
                None => break,
            }
        }
        ret.sort();
        Ok(ret)
    }
}
