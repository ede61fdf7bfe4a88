//! Book records and their identifiers.

use crate::catalog::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
/// Catalog-assigned identifier; never reused once issued.
pub struct BookId(pub u64);

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BookId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse().map(BookId)
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    // Aliases cover files written by the earlier localized tool.
    #[default]
    #[serde(alias = "в наличии")]
    Available,
    #[serde(alias = "выдана")]
    CheckedOut,
}

impl Status {
    pub const ALL: [Status; 2] = [Status::Available, Status::CheckedOut];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Available => "available",
            Status::CheckedOut => "checked_out",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == trimmed)
            .ok_or_else(|| CatalogError::InvalidStatus(trimmed.to_string()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub status: Status,
}

impl Book {
    /// Case-insensitive substring match on title or author, or exact textual
    /// match on year.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.author.to_lowercase().contains(&needle)
            || query == self.year.to_string()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Validated input for a new record.
///
/// Title and author are trimmed and must not be blank. The year is kept as
/// given; historical and placeholder years are both legitimate.
pub struct NewBook {
    title: String,
    author: String,
    year: i32,
}

impl NewBook {
    pub fn new(title: &str, author: &str, year: i32) -> Result<Self> {
        Ok(Self {
            title: non_blank("title", title)?,
            author: non_blank("author", author)?,
            year,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub(crate) fn into_book(self, id: BookId) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            year: self.year,
            status: Status::Available,
        }
    }
}

fn non_blank(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::InvalidArgument(format!(
            "{field} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}
