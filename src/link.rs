use std::env;

use anyhow::{Context, Result};
use dotkit::linker::{FolderMapping, Linker};
use dotkit::repo_root;

const MAPPING_FILE: &str = "folders.json";

pub fn run() -> Result<()> {
  let current_dir = env::current_dir().context("Failed to get current directory")?;

  // Resolve symlinks in the root so the created links point at the real
  // location of the repository.
  let repo_root = repo_root::from_dir(&current_dir)?
    .canonicalize()
    .context("Failed to resolve repository root")?;

  let home = dirs::home_dir().context("Failed to determine home directory")?;

  let mapping = FolderMapping::load(&repo_root.join(MAPPING_FILE))?;
  Linker::new(repo_root, home).link_all(&mapping)?;

  Ok(())
}
