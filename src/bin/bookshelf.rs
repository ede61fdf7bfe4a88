//! Book catalog CLI.
//!
//! With no subcommand this runs the interactive menu against the backing
//! file. The subcommands expose the same operations one shot at a time for
//! scripting:
//!
//!   bookshelf --file shelf.json add "Dune" "Frank Herbert" 1965
//!   bookshelf status 1 checked_out
//!   bookshelf search herbert

use anyhow::{Context, Result, bail};
use bookshelf::menu::{describe, render_table};
use bookshelf::{BookId, Catalog, Menu, RemoveOutcome, StatusOutcome, resolve_catalog_path};
use clap::{Parser, Subcommand};
use std::io::{stdin, stdout};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "bookshelf")]
#[command(about = "Manage a book catalog stored in a JSON file")]
struct Cli {
    /// Backing catalog file (defaults to $BOOKSHELF_FILE, then library.json).
    #[arg(long, short)]
    file: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a book; prints the assigned id.
    Add {
        title: String,
        author: String,
        #[arg(allow_negative_numbers = true)]
        year: i32,
    },
    /// Remove a book by id.
    Remove { id: u64 },
    /// Search titles and authors (case-insensitive) or an exact year.
    Search { query: String },
    /// List every book.
    List,
    /// Set a book's status to available or checked_out.
    Status { id: u64, status: String },
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let path = resolve_catalog_path(cli.file);
    let mut catalog =
        Catalog::open(&path).with_context(|| format!("opening catalog {}", path.display()))?;

    let Some(command) = cli.command else {
        let mut menu = Menu::new(&mut catalog, stdin().lock(), stdout().lock());
        return menu.run();
    };

    match command {
        Command::Add {
            title,
            author,
            year,
        } => {
            let id = catalog.add_book(&title, &author, year)?;
            println!("{id}");
        }
        Command::Remove { id } => match catalog.remove(BookId(id))? {
            RemoveOutcome::Removed(book) => println!("removed {}: {}", book.id, book.title),
            RemoveOutcome::NotFound => bail!("no book with id {id}"),
        },
        Command::Search { query } => {
            for book in catalog.search(&query) {
                println!("{}", describe(book));
            }
        }
        Command::List => print!("{}", render_table(&catalog.list_all())),
        Command::Status { id, status } => match catalog.update_status(BookId(id), &status)? {
            StatusOutcome::Updated { previous } => {
                println!("{id}: {previous} -> {}", status.trim())
            }
            StatusOutcome::NotFound => bail!("no book with id {id}"),
            StatusOutcome::InvalidStatus(raw) => {
                bail!("invalid status '{raw}', expected available or checked_out")
            }
        },
    }
    Ok(())
}
