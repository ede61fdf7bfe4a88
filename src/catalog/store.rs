//! The catalog: in-memory records mirrored to a backing file.
//!
//! State is hydrated once in [`Catalog::open`]; afterwards memory is the
//! source of truth and every successful mutation rewrites the whole file.
//! Lookups that miss and statuses outside the enumerated set come back as
//! outcome values and never touch the file.

use crate::catalog::storage;
use crate::catalog::{Book, BookId, CatalogError, NewBook, Result, Status};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug)]
pub struct Catalog {
    path: PathBuf,
    books: BTreeMap<BookId, Book>,
    next_id: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed(Book),
    NotFound,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatusOutcome {
    Updated { previous: Status },
    NotFound,
    InvalidStatus(String),
}

impl Catalog {
    /// Bind a catalog to `path`, loading any state already stored there.
    ///
    /// A missing or empty file yields an empty catalog whose first id is 1.
    /// The file is not created until the first mutation.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let snapshot = storage::load(&path)?.unwrap_or_else(|| storage::Snapshot {
            books: BTreeMap::new(),
            next_id: 1,
        });
        debug!(
            path = %path.display(),
            books = snapshot.books.len(),
            next_id = snapshot.next_id,
            "catalog loaded"
        );
        Ok(Self {
            path,
            books: snapshot.books,
            next_id: snapshot.next_id,
        })
    }

    /// Insert a new record as `available` and return its id.
    pub fn add(&mut self, book: NewBook) -> Result<BookId> {
        let following = self.next_id.checked_add(1).ok_or_else(|| {
            CatalogError::InvalidArgument("book id space exhausted".to_string())
        })?;
        let id = BookId(self.next_id);
        self.books.insert(id, book.into_book(id));
        self.next_id = following;
        info!(%id, "book added");
        self.save()?;
        Ok(id)
    }

    /// Validate raw fields and add them as a new record.
    pub fn add_book(&mut self, title: &str, author: &str, year: i32) -> Result<BookId> {
        self.add(NewBook::new(title, author, year)?)
    }

    /// Delete a record. Its id is retired, not recycled.
    pub fn remove(&mut self, id: BookId) -> Result<RemoveOutcome> {
        let Some(book) = self.books.remove(&id) else {
            warn!(%id, "remove: no such book");
            return Ok(RemoveOutcome::NotFound);
        };
        info!(%id, "book removed");
        self.save()?;
        Ok(RemoveOutcome::Removed(book))
    }

    /// Change a record's status from caller-supplied text.
    ///
    /// The status is validated before the id is looked up.
    pub fn update_status(&mut self, id: BookId, status: &str) -> Result<StatusOutcome> {
        match status.parse::<Status>() {
            Ok(status) => self.set_status(id, status),
            Err(CatalogError::InvalidStatus(raw)) => {
                warn!(%id, status = %raw, "update_status: invalid status");
                Ok(StatusOutcome::InvalidStatus(raw))
            }
            Err(other) => Err(other),
        }
    }

    pub fn set_status(&mut self, id: BookId, status: Status) -> Result<StatusOutcome> {
        let Some(book) = self.books.get_mut(&id) else {
            warn!(%id, "update_status: no such book");
            return Ok(StatusOutcome::NotFound);
        };
        let previous = std::mem::replace(&mut book.status, status);
        info!(%id, from = %previous, to = %status, "status updated");
        self.save()?;
        Ok(StatusOutcome::Updated { previous })
    }

    /// Records whose title or author contains `query` (ignoring case), or
    /// whose year is exactly `query`.
    pub fn search(&self, query: &str) -> Vec<&Book> {
        let hits: Vec<&Book> = self.books.values().filter(|book| book.matches(query)).collect();
        debug!(query, hits = hits.len(), "search");
        hits
    }

    /// Every record, in ascending id order.
    pub fn list_all(&self) -> Vec<&Book> {
        self.books.values().collect()
    }

    pub fn get(&self, id: BookId) -> Option<&Book> {
        self.books.get(&id)
    }

    pub fn book_or_err(&self, id: BookId) -> Result<&Book> {
        self.get(id).ok_or(CatalogError::NotFound(id))
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// The id the next `add` will assign.
    pub fn next_id(&self) -> BookId {
        BookId(self.next_id)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the full current state to the backing file.
    ///
    /// Mutations call this themselves; call it directly to retry after a
    /// [`CatalogError::Persistence`] failure.
    pub fn save(&self) -> Result<()> {
        storage::save(&self.path, &self.books, self.next_id)
    }
}
