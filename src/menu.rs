//! Interactive text menu over a [`Catalog`].
//!
//! The menu only parses user text into typed arguments, calls one catalog
//! operation per action, and renders the outcome. Recoverable problems are
//! printed and the loop continues; fatal catalog errors end the loop.

use crate::catalog::{self, Book, BookId, Catalog, RemoveOutcome, StatusOutcome};
use anyhow::{Context, Result};
use std::io::{BufRead, Write};

const MENU: &str = "\nMenu:\n\
1. Add a book\n\
2. Remove a book\n\
3. Search books\n\
4. List all books\n\
5. Change book status\n\
0. Exit";

enum Step {
    Continue,
    Quit,
}

pub struct Menu<'c, R, W> {
    catalog: &'c mut Catalog,
    input: R,
    output: W,
}

impl<'c, R: BufRead, W: Write> Menu<'c, R, W> {
    pub fn new(catalog: &'c mut Catalog, input: R, output: W) -> Self {
        Self {
            catalog,
            input,
            output,
        }
    }

    /// Serve menu choices until `0` or end of input.
    pub fn run(&mut self) -> Result<()> {
        loop {
            writeln!(self.output, "{MENU}")?;
            let Some(choice) = self.prompt("Choose an option: ")? else {
                break;
            };
            let step = match choice.as_str() {
                "1" => self.add()?,
                "2" => self.remove()?,
                "3" => self.search()?,
                "4" => self.list()?,
                "5" => self.change_status()?,
                "0" => {
                    writeln!(self.output, "Goodbye.")?;
                    Step::Quit
                }
                _ => {
                    writeln!(self.output, "Error: unknown option, try again.")?;
                    Step::Continue
                }
            };
            if let Step::Quit = step {
                break;
            }
        }
        Ok(())
    }

    fn add(&mut self) -> Result<Step> {
        let Some(title) = self.prompt("Title: ")? else {
            return Ok(Step::Quit);
        };
        let Some(author) = self.prompt("Author: ")? else {
            return Ok(Step::Quit);
        };
        let Some(raw_year) = self.prompt("Year: ")? else {
            return Ok(Step::Quit);
        };
        let Ok(year) = raw_year.parse::<i32>() else {
            writeln!(self.output, "Error: year must be an integer, got '{raw_year}'.")?;
            return Ok(Step::Continue);
        };

        let added = self.catalog.add_book(&title, &author, year);
        if let Some(id) = self.report(added)? {
            writeln!(self.output, "Book added: ID {id}, {title}.")?;
        }
        Ok(Step::Continue)
    }

    fn remove(&mut self) -> Result<Step> {
        let Some(id) = self.prompt_id("ID of the book to remove: ")? else {
            return Ok(Step::Quit);
        };
        let Some(id) = id else {
            return Ok(Step::Continue);
        };
        let removed = self.catalog.remove(id);
        match self.report(removed)? {
            Some(RemoveOutcome::Removed(_)) => {
                writeln!(self.output, "Book with ID {id} removed.")?
            }
            Some(RemoveOutcome::NotFound) => {
                writeln!(self.output, "Error: no book with ID {id}.")?
            }
            None => {}
        }
        Ok(Step::Continue)
    }

    fn search(&mut self) -> Result<Step> {
        let Some(query) = self.prompt_untrimmed("Title, author or year to search for: ")? else {
            return Ok(Step::Quit);
        };
        let hits = self.catalog.search(&query);
        if hits.is_empty() {
            writeln!(self.output, "No books found.")?;
        } else {
            writeln!(self.output, "Found books:")?;
            for book in hits {
                writeln!(self.output, "{}", describe(book))?;
            }
        }
        Ok(Step::Continue)
    }

    fn list(&mut self) -> Result<Step> {
        let table = render_table(&self.catalog.list_all());
        write!(self.output, "{table}")?;
        Ok(Step::Continue)
    }

    fn change_status(&mut self) -> Result<Step> {
        let Some(id) = self.prompt_id("ID of the book: ")? else {
            return Ok(Step::Quit);
        };
        let Some(id) = id else {
            return Ok(Step::Continue);
        };
        let Some(status) = self.prompt("New status (available/checked_out): ")? else {
            return Ok(Step::Quit);
        };
        let updated = self.catalog.update_status(id, &status);
        match self.report(updated)? {
            Some(StatusOutcome::Updated { .. }) => writeln!(
                self.output,
                "Status of book with ID {id} changed to '{status}'."
            )?,
            Some(StatusOutcome::NotFound) => {
                writeln!(self.output, "Error: no book with ID {id}.")?
            }
            Some(StatusOutcome::InvalidStatus(raw)) => writeln!(
                self.output,
                "Error: invalid status '{raw}', expected available or checked_out."
            )?,
            None => {}
        }
        Ok(Step::Continue)
    }

    /// Print a prompt and read one trimmed line; `None` at end of input.
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        Ok(self
            .prompt_untrimmed(label)?
            .map(|line| line.trim().to_string()))
    }

    /// Like `prompt`, but only the line ending is stripped.
    fn prompt_untrimmed(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("reading menu input")?;
        if read == 0 {
            return Ok(None);
        }
        let content = line.strip_suffix('\n').unwrap_or(&line);
        let content = content.strip_suffix('\r').unwrap_or(content);
        Ok(Some(content.to_string()))
    }

    /// Outer `None` is end of input; inner `None` means the text was not an id.
    fn prompt_id(&mut self, label: &str) -> Result<Option<Option<BookId>>> {
        let Some(raw) = self.prompt(label)? else {
            return Ok(None);
        };
        match raw.parse::<BookId>() {
            Ok(id) => Ok(Some(Some(id))),
            Err(_) => {
                writeln!(self.output, "Error: ID must be a positive integer, got '{raw}'.")?;
                Ok(Some(None))
            }
        }
    }

    fn report<T>(&mut self, result: catalog::Result<T>) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(err) if !err.is_fatal() => {
                writeln!(self.output, "Error: {err}.")?;
                Ok(None)
            }
            Err(err) => Err(anyhow::Error::from(err).context("catalog operation failed")),
        }
    }
}

/// One-line summary used for search results.
pub fn describe(book: &Book) -> String {
    format!(
        "ID: {}, Title: {}, Author: {}, Year: {}, Status: {}",
        book.id, book.title, book.author, book.year, book.status
    )
}

/// Fixed-width table of `books`, or a notice when there are none.
pub fn render_table(books: &[&Book]) -> String {
    if books.is_empty() {
        return "No books in the catalog.\n".to_string();
    }
    let mut out = format!(
        "{:<5} {:<30} {:<25} {:<10} {:<12}\n{}\n",
        "ID",
        "Title",
        "Author",
        "Year",
        "Status",
        "=".repeat(86)
    );
    for book in books {
        out.push_str(&format!(
            "{:<5} {:<30} {:<25} {:<10} {:<12}\n",
            book.id.to_string(),
            book.title,
            book.author,
            book.year,
            book.status.as_str()
        ));
    }
    out
}
