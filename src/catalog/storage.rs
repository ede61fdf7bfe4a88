//! Full-state snapshots of the catalog on disk.
//!
//! The file is pretty-printed JSON (four-space indent, non-ASCII kept as is)
//! so it stays readable and hand-editable:
//!
//! ```text
//! { "books": { "1": { "title": ..., "author": ..., "year": 1965, "status": "available" } },
//!   "id_counter": 2 }
//! ```
//!
//! Saves go through a temp file in the same directory followed by a rename,
//! so a crash mid-write leaves the previous snapshot intact.

use crate::catalog::{Book, BookId, CatalogError, Result, Status};
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

const INDENT: &[u8] = b"    ";

/// Hydrated catalog state.
#[derive(Debug)]
pub(crate) struct Snapshot {
    pub books: BTreeMap<BookId, Book>,
    pub next_id: u64,
}

#[derive(Deserialize)]
struct StoredState {
    #[serde(default, deserialize_with = "books_by_id")]
    books: BTreeMap<BookId, StoredBook>,
    #[serde(default)]
    id_counter: Option<u64>,
}

#[derive(Deserialize)]
struct StoredBook {
    title: String,
    author: String,
    #[serde(deserialize_with = "year_from_number_or_text")]
    year: i32,
    status: Status,
}

#[derive(Serialize)]
struct StateRef<'a> {
    books: BTreeMap<BookId, BookRef<'a>>,
    id_counter: u64,
}

#[derive(Serialize)]
struct BookRef<'a> {
    title: &'a str,
    author: &'a str,
    year: i32,
    status: Status,
}

impl<'a> From<&'a Book> for BookRef<'a> {
    fn from(book: &'a Book) -> Self {
        Self {
            title: &book.title,
            author: &book.author,
            year: book.year,
            status: book.status,
        }
    }
}

/// Read the snapshot at `path`.
///
/// Returns `None` when the file is missing or holds only whitespace; any
/// other content must parse and pass the consistency checks.
pub(crate) fn load(path: &Path) -> Result<Option<Snapshot>> {
    let raw = match fs::read(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(CatalogError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let state: StoredState =
        serde_json::from_slice(&raw).map_err(|err| malformed(path, err.to_string()))?;
    validate_state(path, state).map(Some)
}

fn validate_state(path: &Path, state: StoredState) -> Result<Snapshot> {
    let highest = state.books.keys().next_back().map(|id| id.0).unwrap_or(0);
    if state.books.contains_key(&BookId(0)) {
        return Err(malformed(path, "book ids must be positive".to_string()));
    }

    let next_id = match state.id_counter {
        Some(counter) if counter <= highest => {
            return Err(malformed(
                path,
                format!("id_counter {counter} must be greater than the largest book id {highest}"),
            ));
        }
        Some(counter) => counter,
        None => highest + 1,
    };

    let books = state
        .books
        .into_iter()
        .map(|(id, stored)| {
            let book = Book {
                id,
                title: stored.title,
                author: stored.author,
                year: stored.year,
                status: stored.status,
            };
            (id, book)
        })
        .collect();

    Ok(Snapshot { books, next_id })
}

/// Overwrite `path` with the full catalog state.
pub(crate) fn save(path: &Path, books: &BTreeMap<BookId, Book>, next_id: u64) -> Result<()> {
    let state = StateRef {
        books: books.iter().map(|(id, book)| (*id, BookRef::from(book))).collect(),
        id_counter: next_id,
    };

    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    state
        .serialize(&mut serializer)
        .map_err(|err| persistence(path, io::Error::other(err)))?;
    buf.push(b'\n');

    write_atomically(path, &buf).map_err(|source| persistence(path, source))
}

// A symlinked catalog is replaced at the link's destination, and an existing
// file keeps its permissions.
fn write_atomically(path: &Path, contents: &[u8]) -> io::Result<()> {
    let target = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let existing = fs::metadata(&target).ok();
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir)?;
    if let Some(meta) = existing {
        temp.as_file().set_permissions(meta.permissions())?;
    }
    temp.write_all(contents)?;
    temp.as_file().sync_all()?;
    temp.persist(&target).map_err(|err| err.error)?;
    Ok(())
}

// Keys are parsed here rather than by the map deserializer so that "1" and
// "01" are reported as the same id.
fn books_by_id<'de, D>(
    deserializer: D,
) -> std::result::Result<BTreeMap<BookId, StoredBook>, D::Error>
where
    D: Deserializer<'de>,
{
    struct BooksVisitor;

    impl<'de> Visitor<'de> for BooksVisitor {
        type Value = BTreeMap<BookId, StoredBook>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map from book id to book")
        }

        fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut books = BTreeMap::new();
            while let Some((key, book)) = map.next_entry::<String, StoredBook>()? {
                let id = key.parse::<u64>().map(BookId).map_err(|_| {
                    de::Error::custom(format!("book id '{key}' is not an integer"))
                })?;
                if books.insert(id, book).is_some() {
                    return Err(de::Error::custom(format!("duplicate book id {id}")));
                }
            }
            Ok(books)
        }
    }

    deserializer.deserialize_map(BooksVisitor)
}

// Older files stored the year exactly as typed, so accept numeric strings.
fn year_from_number_or_text<'de, D>(deserializer: D) -> std::result::Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawYear {
        Number(i32),
        Text(String),
    }

    match RawYear::deserialize(deserializer)? {
        RawYear::Number(year) => Ok(year),
        RawYear::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("year '{text}' is not an integer"))),
    }
}

fn malformed(path: &Path, reason: String) -> CatalogError {
    CatalogError::MalformedStorage {
        path: path.to_path_buf(),
        reason,
    }
}

fn persistence(path: &Path, source: io::Error) -> CatalogError {
    CatalogError::Persistence {
        path: path.to_path_buf(),
        source,
    }
}
