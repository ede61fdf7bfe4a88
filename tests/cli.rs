// The bookshelf binary: interactive menu and one-shot subcommands.
mod support;

use anyhow::Result;
use serde_json::{Value, json};
use std::fs;

use support::{TempShelf, bookshelf, run_command, run_menu};

#[test]
fn menu_session_persists_changes() -> Result<()> {
    let shelf = TempShelf::new()?;
    let output = run_menu(
        &shelf.path,
        "1\nDune\nFrank Herbert\n1965\n1\nSolaris\nLem\n1961\n5\n2\nchecked_out\n2\n1\n4\n0\n",
    )?;
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Book added: ID 1, Dune."));
    assert!(stdout.contains("Book added: ID 2, Solaris."));
    assert!(stdout.contains("Book with ID 1 removed."));
    assert!(stdout.contains("Goodbye."));

    assert_eq!(
        shelf.read_json()?,
        json!({
            "books": {
                "2": {"title": "Solaris", "author": "Lem", "year": 1961, "status": "checked_out"}
            },
            "id_counter": 3
        })
    );
    Ok(())
}

#[test]
fn menu_survives_bad_numbers() -> Result<()> {
    let shelf = TempShelf::new()?;
    let output = run_menu(&shelf.path, "1\nDune\nHerbert\nsoon\n2\nfirst\n0\n")?;
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("year must be an integer"));
    assert!(stdout.contains("ID must be a positive integer"));
    assert!(!shelf.path.exists());
    Ok(())
}

#[test]
fn menu_exits_at_end_of_input() -> Result<()> {
    let shelf = TempShelf::new()?;
    let output = run_menu(&shelf.path, "4\n")?;
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("No books in the catalog."));
    Ok(())
}

#[test]
fn subcommands_cover_the_operation_surface() -> Result<()> {
    let shelf = TempShelf::new()?;

    let mut add = bookshelf(&shelf.path);
    add.args(["add", "Dune", "Frank Herbert", "1965"]);
    assert_eq!(String::from_utf8(run_command(add)?.stdout)?.trim(), "1");

    let mut status = bookshelf(&shelf.path);
    status.args(["status", "1", "checked_out"]);
    let out = String::from_utf8(run_command(status)?.stdout)?;
    assert!(out.contains("available -> checked_out"));

    let mut search = bookshelf(&shelf.path);
    search.args(["search", "1965"]);
    let out = String::from_utf8(run_command(search)?.stdout)?;
    assert!(out.contains("ID: 1, Title: Dune"));
    assert!(out.contains("Status: checked_out"));

    let mut list = bookshelf(&shelf.path);
    list.arg("list");
    let out = String::from_utf8(run_command(list)?.stdout)?;
    assert_eq!(out.lines().count(), 3);

    let mut remove = bookshelf(&shelf.path);
    remove.args(["remove", "1"]);
    run_command(remove)?;

    let state: Value = shelf.read_json()?;
    assert_eq!(state, json!({"books": {}, "id_counter": 2}));
    Ok(())
}

#[test]
fn subcommand_failures_exit_non_zero() -> Result<()> {
    let shelf = TempShelf::new()?;
    let mut add = bookshelf(&shelf.path);
    add.args(["add", "Dune", "Herbert", "1965"]);
    run_command(add)?;

    for args in [
        vec!["remove", "9"],
        vec!["status", "1", "lost"],
        vec!["status", "9", "available"],
        vec!["add", "", "Herbert", "1965"],
    ] {
        let output = bookshelf(&shelf.path).args(&args).output()?;
        assert!(!output.status.success(), "{args:?} should fail");
        assert!(!output.stderr.is_empty());
    }

    let stderr = String::from_utf8(bookshelf(&shelf.path).args(["status", "1", "lost"]).output()?.stderr)?;
    assert!(stderr.contains("invalid status 'lost'"));
    Ok(())
}

#[test]
fn malformed_catalog_is_reported() -> Result<()> {
    let shelf = TempShelf::new()?;
    fs::write(&shelf.path, "not json")?;
    let output = bookshelf(&shelf.path).arg("list").output()?;
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("opening catalog"));
    assert!(stderr.contains("malformed catalog file"));
    assert_eq!(fs::read_to_string(&shelf.path)?, "not json");
    Ok(())
}

#[test]
fn env_var_selects_catalog_file() -> Result<()> {
    let shelf = TempShelf::new()?;
    let mut cmd = std::process::Command::new(support::bookshelf_binary());
    cmd.args(["add", "Dune", "Herbert", "1965"])
        .env("BOOKSHELF_FILE", &shelf.path);
    run_command(cmd)?;
    assert_eq!(shelf.read_json()?["id_counter"], json!(2));
    Ok(())
}
