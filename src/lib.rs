//! A directory-listing engine.
//!
//! Given one or more `path://` references, the engine enumerates their
//! contents under configurable policies (recursion, symlink following,
//! mimetype filtering, result-size limiting) and returns either a flat
//! list or a nested tree of entries.
//!
//! ```rust
//! # tokio_test::block_on(async {
//! # use dirlist::DirectoryLister;
//! # use dirlist::ListRequest;
//! let cwd = std::env::current_dir().unwrap();
//! let request = ListRequest::new(vec![format!("path://{}", cwd.display())]);
//! let lister = DirectoryLister::new();
//! let envelope = lister.list(&request, None).await.unwrap();
//! assert!(envelope.success);
//! println!("{}", serde_json::to_string_pretty(&envelope).unwrap());
//! # })
//! ```
//!
//! A structured listing might serialize as
//! ```json
//! {
//!   "success": true,
//!   "files": [
//!     {
//!       "handle": "/project/src",
//!       "relativeName": ".",
//!       "children": [
//!         {
//!           "handle": "/project/src/lib.rs",
//!           "relativeName": "./lib.rs"
//!         }
//!       ]
//!     }
//!   ]
//! }
//! ```

mod entry;
mod errors;
mod filter;
mod lister;
mod mime;
mod path;
mod tree;
mod walker;

pub use entry::Entry;
pub use entry::EntryKind;
pub use errors::Error;
pub use lister::CompletionObserver;
pub use lister::DirectoryLister;
pub use lister::Envelope;
pub use lister::Files;
pub use lister::ListRequest;
pub use lister::ListerConfig;
pub use mime::ExtensionTable;
pub use mime::MimeClassifier;
pub use path::PathReference;
pub use path::SCHEME;
pub use tree::ResultNode;
pub use walker::LinkStyle;

#[cfg(feature = "test_utils")]
pub(crate) mod test_utils;
#[cfg(feature = "test_utils")]
pub use test_utils::TestRoot;
