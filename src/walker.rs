use std::collections::HashSet;
use std::io;
use std::path::Path as StdPath;
use std::path::PathBuf;

use futures_lite::StreamExt;
#[cfg(feature = "json_schema")]
use schemars::JsonSchema;
use serde::Deserialize;
use serde::Serialize;

use crate::Entry;
use crate::EntryKind;
use crate::entry::WalkEntry;
use crate::errors::Error;

/// How a followed symlink is presented in the output.
///
/// Platforms legitimately differ here: POSIX hosts report the link's
/// canonicalized target path, which may lie outside the walked subtree,
/// while Windows hosts retain the link's own contextual path and still
/// descend into the target. The choice is a policy of the filesystem
/// adapter, not of the walker.
#[cfg_attr(feature = "json_schema", derive(JsonSchema))]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Hash, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LinkStyle {
    /// Emit the canonicalized real target path.
    Canonical,
    /// Keep the link's own path while descending through it.
    Contextual,
}

impl Default for LinkStyle {
    /// The presentation native to the compile target.
    fn default() -> Self {
        if cfg!(windows) {
            LinkStyle::Contextual
        } else {
            LinkStyle::Canonical
        }
    }
}

/// A lazy pre-order traversal of one root.
///
/// The walker is an explicit-stack, pull-based sequence: nothing is read
/// from the filesystem until [`DirWalker::next`] is called, and listing a
/// directory's children is deferred to the call after the directory's own
/// emission. Stopping the pull therefore stops all filesystem work, and
/// every `.await` between sibling visits is a natural cancellation
/// checkpoint.
///
/// Siblings are emitted in ascending name order. In non-recursive mode
/// only the root's immediate children are produced and the root itself is
/// not emitted; a link root that resolves to a directory while following
/// links is listed like one.
pub(crate) struct DirWalker {
    recursive: bool,
    follow_links: bool,
    link_style: LinkStyle,
    /// Pending entries, kept reverse-sorted so `pop()` yields ascending.
    stack: Vec<WalkEntry>,
    /// A directory emitted by the previous call, not yet listed.
    pending_descend: Option<(PathBuf, Vec<String>)>,
    /// Canonical paths of directories already descended into. Guards
    /// against cyclic links; only consulted while following links.
    visited: HashSet<PathBuf>,
}

impl DirWalker {
    pub fn new(root: Entry, recursive: bool, follow_links: bool, link_style: LinkStyle) -> Self {
        let mut walker = Self {
            recursive,
            follow_links,
            link_style,
            stack: Vec::new(),
            pending_descend: None,
            visited: HashSet::new(),
        };
        if recursive || root.kind != EntryKind::Directory {
            // The root itself is the first emission; a file root yields
            // just that one entry.
            walker.stack.push(WalkEntry {
                entry: root,
                rel: vec![],
            });
        } else {
            walker.pending_descend = Some((root.path, vec![]));
        }
        walker
    }

    /// Produces the next entry of the traversal, or `None` when done.
    ///
    /// Any I/O failure is surfaced as an error; the caller is expected to
    /// abort the whole operation on it.
    pub async fn next(&mut self) -> Option<Result<WalkEntry, Error>> {
        loop {
            if let Some((dir, rel)) = self.pending_descend.take() {
                if let Err(e) = self.push_children(&dir, rel).await {
                    return Some(Err(e));
                }
            }
            let mut item = self.stack.pop()?;
            if self.follow_links && item.entry.kind == EntryKind::Symlink {
                if let Err(e) = self.resolve_link(&mut item).await {
                    return Some(Err(e));
                }
            }
            if item.entry.kind == EntryKind::Directory {
                if self.recursive {
                    match self.can_descend(&item.entry.path).await {
                        Ok(true) => {
                            self.pending_descend =
                                Some((item.entry.path.clone(), item.rel.clone()));
                        }
                        Ok(false) => {
                            log::debug!(
                                "skipping already-visited directory: {}",
                                item.entry.path.display()
                            );
                        }
                        Err(e) => return Some(Err(e)),
                    }
                } else if item.rel.is_empty() {
                    // A root only reaches the stack in shallow mode as an
                    // unresolved link; now that it resolved to a directory
                    // its children are listed instead of the root itself.
                    self.pending_descend = Some((item.entry.path, item.rel));
                    continue;
                }
            }
            return Some(Ok(item));
        }
    }

    /// Re-points a symlink entry at its target.
    ///
    /// The kind becomes the target's kind; under `LinkStyle::Canonical`
    /// the path is swapped to the canonicalized target as well. A
    /// dangling link stays a leaf at its own path.
    async fn resolve_link(&self, item: &mut WalkEntry) -> Result<(), Error> {
        let path = &item.entry.path;
        let metadata = match tokio::fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(Error::from_io(path, &e)),
        };
        item.entry.kind = if metadata.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        if self.link_style == LinkStyle::Canonical {
            item.entry.path = tokio::fs::canonicalize(path)
                .await
                .map_err(|e| Error::from_io(path, &e))?;
        }
        Ok(())
    }

    /// Whether descent into `dir` is allowed.
    ///
    /// While following links, directories are tracked by canonical path
    /// and a revisit is refused so cyclic links cannot recurse
    /// unboundedly; the revisited directory itself has already been
    /// emitted once.
    async fn can_descend(&mut self, dir: &StdPath) -> Result<bool, Error> {
        if !self.follow_links {
            return Ok(true);
        }
        let canonical = tokio::fs::canonicalize(dir)
            .await
            .map_err(|e| Error::from_io(dir, &e))?;
        Ok(self.visited.insert(canonical))
    }

    /// Lists `dir`, sorts the children ascending by name and stages them
    /// for emission.
    async fn push_children(&mut self, dir: &StdPath, rel: Vec<String>) -> Result<(), Error> {
        log::trace!("listing {}", dir.display());
        let mut entries = async_fs::read_dir(dir)
            .await
            .map_err(|e| Error::from_io(dir, &e))?;
        let mut children = Vec::new();
        while let Some(entry) = entries.next().await {
            let entry = entry.map_err(|e| Error::from_io(dir, &e))?;
            let entry_path = entry.path();
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| Error::from_io(&entry_path, &e))?;
            let mut child_rel = rel.clone();
            child_rel.push(entry.file_name().to_string_lossy().into_owned());
            children.push(WalkEntry {
                entry: Entry {
                    path: entry_path,
                    kind: file_type.into(),
                },
                rel: child_rel,
            });
        }
        children.sort_by(|a, b| a.name().cmp(b.name()));
        for child in children.into_iter().rev() {
            self.stack.push(child);
        }
        Ok(())
    }
}
