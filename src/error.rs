use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Dataset errors
// ---------------------------------------------------------------------------

/// Errors raised while bringing a dataset into memory.
///
/// Both variants are fatal at startup: nothing can be filtered without the
/// `magnitude` and `depth_km` columns.
#[derive(Error, Debug)]
pub enum DataError {
    /// File missing, unreadable, or structurally malformed.
    #[error("Failed to load {}: {reason}", .path.display())]
    Load { path: PathBuf, reason: String },

    /// A required column is absent from the header.
    #[error("{} is missing required column '{column}'", .path.display())]
    Schema { path: PathBuf, column: &'static str },
}

impl DataError {
    /// Wrap a reader failure, keeping the full context chain in the message.
    pub fn load(path: impl Into<PathBuf>, err: &anyhow::Error) -> Self {
        Self::Load {
            path: path.into(),
            reason: format!("{err:#}"),
        }
    }
}
