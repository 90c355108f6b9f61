#[cfg(feature = "json_schema")]
use schemars::JsonSchema;
use serde::Deserialize;
use serde::Serialize;

use crate::EntryKind;
use crate::entry::WalkEntry;

/// One node of a structured listing.
#[cfg_attr(feature = "json_schema", derive(JsonSchema))]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Hash, Eq)]
pub struct ResultNode {
    /// Absolute path of the node.
    pub handle: String,
    /// The node's path relative to the root it was emitted under, with
    /// the literal `"."` marking the root itself.
    #[serde(rename = "relativeName")]
    pub relative_name: String,
    /// Child nodes, present only for directory nodes that survived
    /// pruning. Files and unfollowed symlinks carry no `children` key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<ResultNode>>,
}

/// A directory on the rightmost spine of the tree under construction.
///
/// Its node is materialized lazily, only once a retained entry needs it
/// as an ancestor; that is what makes bottom-up pruning emergent.
struct SpineDir {
    handle: String,
    relative_name: String,
    materialized: bool,
}

/// Assembles a structured tree for one root from the walker's pre-order
/// sequence.
///
/// Every emitted entry is observed, retained or not; a retained entry is
/// inserted along with any of its not-yet-materialized ancestor
/// directories. Because the sequence is a depth-first pre-order, the
/// ancestor chain of the current entry is always the rightmost spine of
/// the tree built so far, so sibling order is preserved by plain
/// appends.
pub(crate) struct TreeBuilder {
    nodes: Vec<ResultNode>,
    spine: Vec<SpineDir>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            spine: Vec::new(),
        }
    }

    /// Observes the next entry of the pre-order sequence.
    pub fn observe(&mut self, item: &WalkEntry, retained: bool) {
        let depth = item.rel.len();
        self.spine.truncate(depth);
        let is_dir = item.entry.kind == EntryKind::Directory;
        if is_dir {
            self.spine.push(SpineDir {
                handle: item.entry.path.display().to_string(),
                relative_name: item.relative_name(),
                materialized: false,
            });
        }
        if !retained {
            return;
        }
        self.materialize_spine();
        if !is_dir {
            let leaf = ResultNode {
                handle: item.entry.path.display().to_string(),
                relative_name: item.relative_name(),
                children: None,
            };
            self.children_at(depth).push(leaf);
        }
    }

    /// Creates nodes for every spine directory that is not yet part of
    /// the tree, parents first.
    fn materialize_spine(&mut self) {
        for i in 0..self.spine.len() {
            if self.spine[i].materialized {
                continue;
            }
            let node = ResultNode {
                handle: self.spine[i].handle.clone(),
                relative_name: self.spine[i].relative_name.clone(),
                children: Some(Vec::new()),
            };
            self.children_at(i).push(node);
            self.spine[i].materialized = true;
        }
    }

    /// The child list a node at `depth` is appended to, reached by
    /// walking the rightmost spine of the tree.
    fn children_at(&mut self, depth: usize) -> &mut Vec<ResultNode> {
        let mut current = &mut self.nodes;
        for _ in 0..depth {
            // Ancestors are materialized before their descendants and sit
            // last in their sibling list.
            current = current
                .last_mut()
                .and_then(|node| node.children.as_mut())
                .unwrap();
        }
        current
    }

    /// Finishes the tree; empty when nothing was retained under this
    /// root.
    pub fn finish(self) -> Vec<ResultNode> {
        self.nodes
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::Entry;

    fn item(path: &str, rel: &[&str], kind: EntryKind) -> WalkEntry {
        WalkEntry {
            entry: Entry {
                path: PathBuf::from(path),
                kind,
            },
            rel: rel.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn sep() -> String {
        std::path::MAIN_SEPARATOR_STR.to_string()
    }

    #[test]
    fn unfiltered_walk_keeps_every_directory() {
        let mut builder = TreeBuilder::new();
        builder.observe(&item("/r", &[], EntryKind::Directory), true);
        builder.observe(&item("/r/a.txt", &["a.txt"], EntryKind::File), true);
        builder.observe(&item("/r/empty", &["empty"], EntryKind::Directory), true);
        let tree = builder.finish();

        assert_eq!(tree.len(), 1);
        let root = &tree[0];
        assert_eq!(root.relative_name, ".");
        assert_eq!(root.handle, "/r");
        let children = root.children.as_ref().unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].relative_name, format!(".{}a.txt", sep()));
        assert!(children[0].children.is_none());
        // A retained empty directory keeps an empty children list.
        assert_eq!(children[1].children, Some(vec![]));
    }

    #[test]
    fn filtered_walk_materializes_only_matched_chains() {
        let mut builder = TreeBuilder::new();
        // Active filter: directories themselves are never retained.
        builder.observe(&item("/r", &[], EntryKind::Directory), false);
        builder.observe(&item("/r/dead", &["dead"], EntryKind::Directory), false);
        builder.observe(
            &item("/r/dead/x.jpg", &["dead", "x.jpg"], EntryKind::File),
            false,
        );
        builder.observe(&item("/r/live", &["live"], EntryKind::Directory), false);
        builder.observe(
            &item("/r/live/y.txt", &["live", "y.txt"], EntryKind::File),
            true,
        );
        let tree = builder.finish();

        assert_eq!(tree.len(), 1);
        let root = &tree[0];
        let children = root.children.as_ref().unwrap();
        // "dead" had no retained descendant and was pruned entirely.
        assert_eq!(children.len(), 1);
        let live = &children[0];
        assert_eq!(live.relative_name, format!(".{}live", sep()));
        let grand = live.children.as_ref().unwrap();
        assert_eq!(grand[0].relative_name, format!(".{0}live{0}y.txt", sep()));
    }

    #[test]
    fn nothing_retained_yields_no_nodes() {
        let mut builder = TreeBuilder::new();
        builder.observe(&item("/r", &[], EntryKind::Directory), false);
        builder.observe(&item("/r/a.bin", &["a.bin"], EntryKind::File), false);
        assert!(builder.finish().is_empty());
    }

    #[test]
    fn unfollowed_symlink_node_has_no_children_key() {
        let mut builder = TreeBuilder::new();
        builder.observe(&item("/r", &[], EntryKind::Directory), true);
        builder.observe(&item("/r/link", &["link"], EntryKind::Symlink), true);
        let tree = builder.finish();
        let link = &tree[0].children.as_ref().unwrap()[0];
        assert!(link.children.is_none());

        let wire = serde_json::to_value(link).unwrap();
        assert_eq!(wire["handle"], "/r/link");
        assert!(wire.get("children").is_none());
        assert!(wire.get("relativeName").is_some());
    }

    #[test]
    fn siblings_arrive_in_walker_order() {
        let mut builder = TreeBuilder::new();
        builder.observe(&item("/r", &[], EntryKind::Directory), true);
        builder.observe(&item("/r/a", &["a"], EntryKind::File), true);
        builder.observe(&item("/r/b", &["b"], EntryKind::Directory), true);
        builder.observe(&item("/r/b/c", &["b", "c"], EntryKind::File), true);
        builder.observe(&item("/r/d", &["d"], EntryKind::File), true);
        let tree = builder.finish();

        let names: Vec<&str> = tree[0]
            .children
            .as_ref()
            .unwrap()
            .iter()
            .map(|n| n.handle.as_str())
            .collect();
        assert_eq!(names, vec!["/r/a", "/r/b", "/r/d"]);
    }
}
