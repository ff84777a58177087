use std::io::ErrorKind;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};
use std::fs;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::profile;

// Companion schema document next to the mapping; see FolderMapping::load.
const SCHEMA_FILE: &str = "folders.schema.json";

/// Static declaration of which files from which repository folders get
/// linked into the home directory, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FolderMapping {
  entries: Vec<(String, Vec<String>)>
}

impl FolderMapping {
  /// Reads the mapping from a JSON file.
  ///
  /// The typed parse is the validation: any entry that is not an array of
  /// strings is a configuration error. When a companion schema document
  /// exists it is not evaluated, and a warning says so.
  pub fn load(path: &Path) -> Result<Self> {
    profile!("Load folder mapping");

    let data = fs::read_to_string(path).with_context(|| format!("Failed to read folder mapping at {}", path.display()))?;

    let schema = path.with_file_name(SCHEMA_FILE);
    if schema.exists() {
      log::warn!(
        "{} present but schema validation is unavailable; relying on the typed parse",
        schema.display()
      );
    }

    Self::from_json(&data)
  }

  pub fn from_json(data: &str) -> Result<Self> {
    let map: serde_json::Map<String, Value> = serde_json::from_str(data).context("Folder mapping is not a JSON object")?;

    let mut entries = Vec::with_capacity(map.len());
    for (folder, files) in map {
      let files = files
        .as_array()
        .with_context(|| format!("Entry \"{folder}\" is not an array of file names"))?
        .iter()
        .map(|file| {
          file
            .as_str()
            .map(str::to_string)
            .with_context(|| format!("Entry \"{folder}\" contains a non-string file name"))
        })
        .collect::<Result<Vec<_>>>()?;

      entries.push((folder, files));
    }

    Ok(Self { entries })
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
    self
      .entries
      .iter()
      .map(|(folder, files)| (folder.as_str(), files.as_slice()))
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

/// Outcome of clearing a link destination.
///
/// A missing destination is the steady state on first run, so it gets its
/// own variant instead of disappearing into a catch-all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlinkOutcome {
  Removed,
  NotPresent
}

/// Symlinks declared dotfiles from the repository into the home directory.
#[derive(Debug, Clone)]
pub struct Linker {
  repo_root: PathBuf,
  home:      PathBuf
}

impl Linker {
  pub fn new(repo_root: PathBuf, home: PathBuf) -> Self {
    Self { repo_root, home }
  }

  /// Links every declared file as `<home>/.<file>`, replacing whatever was
  /// there. No transactionality across entries; reruns converge on the same
  /// end state.
  pub fn link_all(&self, mapping: &FolderMapping) -> Result<()> {
    profile!("Link dotfiles");

    for (folder, files) in mapping.iter() {
      for file in files {
        let src = self.repo_root.join(folder).join(file);
        let dest = self.home.join(format!(".{file}"));

        unlink(&dest)?;
        symlink(&src, &dest).with_context(|| format!("Failed to symlink {} to {}", src.display(), dest.display()))?;
        println!("{} -> {}", src.display(), dest.display());
      }
    }

    Ok(())
  }
}

/// Removes the file or link at `dest` if there is one.
pub fn unlink(dest: &Path) -> Result<UnlinkOutcome> {
  match fs::remove_file(dest) {
    Ok(()) => Ok(UnlinkOutcome::Removed),
    Err(err) if err.kind() == ErrorKind::NotFound => Ok(UnlinkOutcome::NotPresent),
    Err(err) => Err(err).with_context(|| format!("Failed to remove {}", dest.display()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn test_from_json_preserves_declaration_order() {
    let mapping = FolderMapping::from_json(
      r#"{
        "zsh": ["zshrc", "zprofile"],
        "git": ["gitconfig"],
        "vim": ["vimrc"]
      }"#
    )
    .unwrap();

    let folders: Vec<&str> = mapping.iter().map(|(folder, _)| folder).collect();
    assert_eq!(folders, vec!["zsh", "git", "vim"]);
    assert_eq!(mapping.len(), 3);
  }

  #[test]
  fn test_from_json_rejects_non_array_entry() {
    let result = FolderMapping::from_json(r#"{"zsh": "zshrc"}"#);
    assert!(result.is_err());
  }

  #[test]
  fn test_from_json_rejects_non_string_file_name() {
    let result = FolderMapping::from_json(r#"{"zsh": ["zshrc", 3]}"#);
    assert!(result.is_err());
  }

  #[test]
  fn test_from_json_rejects_non_object_document() {
    let result = FolderMapping::from_json(r#"["zshrc"]"#);
    assert!(result.is_err());
  }

  #[test]
  fn test_unlink_missing_destination_is_a_named_noop() {
    let dir = TempDir::new().unwrap();
    let outcome = unlink(&dir.path().join("absent")).unwrap();
    assert_eq!(outcome, UnlinkOutcome::NotPresent);
  }

  #[test]
  fn test_unlink_removes_existing_file() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("present");
    fs::write(&target, "x").unwrap();

    let outcome = unlink(&target).unwrap();
    assert_eq!(outcome, UnlinkOutcome::Removed);
    assert!(!target.exists());
  }

  #[test]
  fn test_unlink_removes_dangling_symlink() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("dangling");
    symlink(dir.path().join("nowhere"), &target).unwrap();

    let outcome = unlink(&target).unwrap();
    assert_eq!(outcome, UnlinkOutcome::Removed);
  }
}
