//! Error taxonomy for catalog operations.
//!
//! Load and write failures are fatal: the caller must see them because memory
//! and disk no longer agree. Bad arguments are recoverable and leave state
//! untouched.

use crate::catalog::BookId;
use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The backing file exists but does not hold valid catalog state.
    #[error("malformed catalog file {}: {reason}", .path.display())]
    MalformedStorage { path: PathBuf, reason: String },

    /// The backing file exists but could not be read.
    #[error("reading catalog file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing the full-state snapshot failed; the in-memory catalog already
    /// holds the change.
    #[error("writing catalog file {}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid status '{0}', expected 'available' or 'checked_out'")]
    InvalidStatus(String),

    #[error("no book with id {0}")]
    NotFound(BookId),
}

impl CatalogError {
    /// True for errors that leave the catalog unusable or out of sync with disk.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CatalogError::MalformedStorage { .. }
                | CatalogError::Read { .. }
                | CatalogError::Persistence { .. }
        )
    }
}
