use std::io;
use std::path::Path as StdPath;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Represents all possible errors in the dirlist crate.
///
/// Any error aborts the whole listing call; there is no partial-success
/// mode. Either every requested root is fully processed or the call fails
/// as a whole.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Hash, Eq)]
pub enum Error {
    /// Error indicating an invalid argument was provided.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Error indicating that a requested root does not exist.
    #[error("Not found: {what}")]
    NotFound {
        /// The path that could not be found.
        what: String,
    },

    /// Error indicating a permission failure during resolution or listing.
    #[error("Access denied: {what}")]
    AccessDenied {
        /// The path that could not be accessed.
        what: String,
    },

    /// Error indicating a symlink cycle detected while following links.
    ///
    /// The default walker skips the revisited directory instead of
    /// raising this; the kind is part of the vocabulary for hosts that
    /// opt into strict cycle handling.
    #[error("Cyclic link: {what}")]
    CyclicLink {
        /// The path at which the cycle was detected.
        what: String,
    },

    /// Error indicating a failure to read data.
    #[error("Failed to read {what}: {how}")]
    Read {
        /// The item that failed to be read.
        what: String,
        /// The reason for the failure.
        how: String,
    },
}

impl Error {
    /// Maps an I/O error encountered at `path` to the matching error kind.
    ///
    /// `NotFound` and `PermissionDenied` keep their identity; everything
    /// else is reported as a read failure.
    pub(crate) fn from_io(path: &StdPath, err: &io::Error) -> Self {
        let what = path.display().to_string();
        match err.kind() {
            io::ErrorKind::NotFound => Error::NotFound { what },
            io::ErrorKind::PermissionDenied => Error::AccessDenied { what },
            _ => Error::Read {
                what,
                how: err.to_string(),
            },
        }
    }
}
