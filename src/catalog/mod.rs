//! Book catalog core.
//!
//! `Catalog` owns the records and the id counter and mirrors both to a JSON
//! file after every mutation. `model` holds the record types, `storage` the
//! on-disk snapshot format, and `error` the failure taxonomy shared by both.

pub mod error;
pub mod model;
mod storage;
pub mod store;

pub use error::{CatalogError, Result};
pub use model::{Book, BookId, NewBook, Status};
pub use store::{Catalog, RemoveOutcome, StatusOutcome};

/// Backing file used when neither `--file` nor the environment picks one.
pub const DEFAULT_CATALOG_PATH: &str = "library.json";
