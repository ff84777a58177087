use std::env;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use git2::{Repository, RepositoryOpenFlags as Flags};

// Does not go through Filesystem: removing the hook must work even when the
// dotkit-hook binary is no longer next to the executable.
pub fn run() -> Result<()> {
  let current_dir = env::current_dir().context("Failed to get current directory")?;
  let repo = Repository::open_ext(&current_dir, Flags::empty(), Vec::<&Path>::new())
    .with_context(|| format!("Failed to open repository at {}", current_dir.display()))?;

  let hook_file = repo.path().join("hooks").join("prepare-commit-msg");
  if !hook_file.exists() {
    bail!("No hook installed at {}", hook_file.display());
  }

  fs::remove_file(&hook_file).with_context(|| format!("Failed to remove {}", hook_file.display()))?;

  let shown = hook_file.strip_prefix(&current_dir).unwrap_or(&hook_file);
  println!("Hook removed from {}", shown.display().to_string().italic());

  Ok(())
}
