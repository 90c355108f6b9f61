#[cfg(feature = "json_schema")]
use schemars::JsonSchema;
use serde::Deserialize;
use serde::Serialize;

use crate::PathReference;
use crate::errors::Error;
use crate::filter::MimeFilter;
use crate::mime::ExtensionTable;
use crate::mime::MimeClassifier;
use crate::tree::ResultNode;
use crate::tree::TreeBuilder;
use crate::walker::DirWalker;
use crate::walker::LinkStyle;

/// One listing request, transient and scoped to a single call.
///
/// The wire field names match the host protocol (`files`, `followLinks`,
/// `mimetypes`, `limit`).
#[cfg_attr(feature = "json_schema", derive(JsonSchema))]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Hash, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ListRequest {
    /// Path references (`path://` over native absolute paths) to
    /// traverse, processed in order and not deduplicated.
    pub files: Vec<String>,
    /// Whether symbolic links are followed. Default is false.
    #[serde(default)]
    pub follow_links: bool,
    /// Optional mimetype filters to apply, e.g. `["image/jpeg"]`. Absent
    /// means no filtering; an empty list filters everything out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mimetypes: Option<Vec<String>>,
    /// Maximum number of nodes to visit across the whole operation.
    /// Absent means unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl ListRequest {
    /// A request over `files` with every option at its default.
    pub fn new(files: Vec<String>) -> Self {
        Self {
            files,
            follow_links: false,
            mimetypes: None,
            limit: None,
        }
    }
}

/// The `files` payload of a successful listing.
#[cfg_attr(feature = "json_schema", derive(JsonSchema))]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Hash, Eq)]
#[serde(untagged)]
pub enum Files {
    /// Flat list of absolute path strings, in walker order.
    Flat(Vec<String>),
    /// Nested per-root trees.
    Tree(Vec<ResultNode>),
}

/// A successful listing response. Failures are an [`Error`], never a
/// `success: false` envelope, and never carry partial results.
#[cfg_attr(feature = "json_schema", derive(JsonSchema))]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Hash, Eq)]
pub struct Envelope {
    /// Always true; present for wire compatibility.
    pub success: bool,
    /// The listing payload in the requested shape.
    pub files: Files,
}

/// An optional completion observer.
///
/// Notified exactly once per call, with the same result the call returns
/// synchronously, so callers may use either consumption mode without
/// behavioral divergence.
pub trait CompletionObserver: Send + Sync {
    /// Called once when the operation completes.
    fn on_complete(&self, result: &Result<Envelope, Error>);
}

/// Engine-level policy, fixed per lister rather than per request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListerConfig {
    /// How followed symlinks are presented. Defaults to the style native
    /// to the compile target.
    pub link_style: LinkStyle,
}

/// The remaining global node budget of one call.
struct Budget {
    remaining: Option<usize>,
}

impl Budget {
    fn new(limit: Option<usize>) -> Self {
        Self { remaining: limit }
    }

    fn is_exhausted(&self) -> bool {
        self.remaining == Some(0)
    }

    fn charge(&mut self) {
        if let Some(remaining) = &mut self.remaining {
            *remaining -= 1;
        }
    }
}

/// The directory-listing engine.
///
/// Each operation is one self-contained depth-first traversal; nothing is
/// parallelized and no state persists between calls, so one lister can
/// serve concurrent calls without external locking. Awaited filesystem
/// operations are the only suspension points; a host that drops the
/// future mid-call gets no envelope, like a failure.
pub struct DirectoryLister {
    config: ListerConfig,
    classifier: Box<dyn MimeClassifier>,
}

impl Default for DirectoryLister {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectoryLister {
    /// A lister with platform-default policy and the built-in
    /// extension-table classifier.
    pub fn new() -> Self {
        Self::with_config(ListerConfig::default())
    }

    /// A lister with explicit policy and the built-in classifier.
    pub fn with_config(config: ListerConfig) -> Self {
        Self {
            config,
            classifier: Box::new(ExtensionTable::new()),
        }
    }

    /// A lister with explicit policy and a host-provided classifier.
    pub fn with_classifier(config: ListerConfig, classifier: Box<dyn MimeClassifier>) -> Self {
        Self { config, classifier }
    }

    /// Returns the retained immediate children of each root, sorted by
    /// name, as a flat list. Roots themselves are not included.
    pub async fn list(
        &self,
        request: &ListRequest,
        observer: Option<&dyn CompletionObserver>,
    ) -> Result<Envelope, Error> {
        self.run(request, false, true, observer).await
    }

    /// Returns the retained entries of a full pre-order traversal of each
    /// root as a flat list. Each directory root is emitted before its
    /// descendants.
    pub async fn recursive_list(
        &self,
        request: &ListRequest,
        observer: Option<&dyn CompletionObserver>,
    ) -> Result<Envelope, Error> {
        self.run(request, true, true, observer).await
    }

    /// Returns one pruned nested tree per root. Directory nodes carry a
    /// `children` list; a directory with no retained descendant under an
    /// active filter is omitted entirely.
    pub async fn recursive_list_with_structure(
        &self,
        request: &ListRequest,
        observer: Option<&dyn CompletionObserver>,
    ) -> Result<Envelope, Error> {
        self.run(request, true, false, observer).await
    }

    async fn run(
        &self,
        request: &ListRequest,
        recursive: bool,
        flat: bool,
        observer: Option<&dyn CompletionObserver>,
    ) -> Result<Envelope, Error> {
        let result = self.do_list(request, recursive, flat).await;
        if let Err(e) = &result {
            log::debug!("listing aborted: {e}");
        }
        if let Some(observer) = observer {
            observer.on_complete(&result);
        }
        result
    }

    async fn do_list(
        &self,
        request: &ListRequest,
        recursive: bool,
        flat: bool,
    ) -> Result<Envelope, Error> {
        log::debug!(
            "listing {} root(s), recursive: {recursive}, flat: {flat}",
            request.files.len()
        );

        // Every root is validated before any traversal begins; a bad root
        // fails the call before work is done for the good ones.
        let mut roots = Vec::with_capacity(request.files.len());
        for raw in &request.files {
            roots.push(PathReference::parse(raw)?.resolve().await?);
        }

        let filter = MimeFilter::new(request.mimetypes.as_deref());
        let mut budget = Budget::new(request.limit);
        let mut flat_files = Vec::new();
        let mut tree_files = Vec::new();

        for root in roots {
            let mut walker =
                DirWalker::new(root, recursive, request.follow_links, self.config.link_style);
            let mut builder = TreeBuilder::new();
            while !budget.is_exhausted() {
                let Some(item) = walker.next().await else {
                    break;
                };
                let item = item?;
                budget.charge();
                let retained = filter.retain(&item.entry, self.classifier.as_ref());
                if flat {
                    if retained {
                        flat_files.push(item.entry.path.display().to_string());
                    }
                } else {
                    builder.observe(&item, retained);
                }
            }
            if !flat {
                tree_files.extend(builder.finish());
            }
            if budget.is_exhausted() {
                break;
            }
        }

        let files = if flat {
            Files::Flat(flat_files)
        } else {
            Files::Tree(tree_files)
        };
        Ok(Envelope {
            success: true,
            files,
        })
    }
}
