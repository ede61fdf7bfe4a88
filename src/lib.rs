pub mod catalog;
pub mod menu;

pub use catalog::{
    Book, BookId, Catalog, CatalogError, DEFAULT_CATALOG_PATH, NewBook, RemoveOutcome, Status,
    StatusOutcome,
};
pub use menu::Menu;

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

/// Environment variable naming the backing file when `--file` is absent.
pub const CATALOG_PATH_ENV: &str = "BOOKSHELF_FILE";

/// Pick the backing file: explicit flag, then `BOOKSHELF_FILE`, then
/// `library.json` in the working directory.
pub fn resolve_catalog_path(flag: Option<PathBuf>) -> PathBuf {
    resolve_with_env(flag, env::var_os(CATALOG_PATH_ENV))
}

fn resolve_with_env(flag: Option<PathBuf>, env_value: Option<OsString>) -> PathBuf {
    if let Some(path) = flag {
        return path;
    }
    match env_value {
        Some(value) if !value.is_empty() => PathBuf::from(value),
        _ => PathBuf::from(DEFAULT_CATALOG_PATH),
    }
}
