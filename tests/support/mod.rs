#![allow(dead_code)]

use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

// A scratch directory holding one catalog file, removed on drop.
pub struct TempShelf {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl TempShelf {
    pub fn new() -> Result<Self> {
        let dir = TempDir::new().context("creating temp dir")?;
        let path = dir.path().join("library.json");
        Ok(Self { dir, path })
    }

    pub fn write_json(&self, value: &Value) -> Result<()> {
        fs::write(&self.path, serde_json::to_vec_pretty(value)?)
            .with_context(|| format!("writing fixture {}", self.path.display()))
    }

    pub fn read_json(&self) -> Result<Value> {
        let raw = fs::read(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        Ok(serde_json::from_slice(&raw)?)
    }
}

pub fn bookshelf_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_bookshelf"))
}

pub fn bookshelf(path: &Path) -> Command {
    let mut cmd = Command::new(bookshelf_binary());
    cmd.arg("--file").arg(path).env_remove("BOOKSHELF_FILE");
    cmd
}

/// Run the interactive menu with `script` on stdin.
pub fn run_menu(path: &Path, script: &str) -> Result<Output> {
    let mut child = bookshelf(path)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .context("spawning bookshelf")?;
    child
        .stdin
        .take()
        .context("stdin not captured")?
        .write_all(script.as_bytes())?;
    Ok(child.wait_with_output()?)
}

pub fn run_command(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run {:?}", cmd.get_program()))?;
    if !output.status.success() {
        bail!(
            "command {:?} exited with {:?}\nstdout:\n{}\nstderr:\n{}",
            cmd.get_program(),
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok(output)
}
