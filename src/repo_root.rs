//! Locates the root of the dotfiles repository that owns the hook.
//!
//! The hook binary is symlinked into `.git/hooks` (or shipped inside a
//! `git-template`), so its own invocation path tells us where to start
//! looking. The root itself is recognized by a marker rather than a
//! directory name: a `README.md` whose first line is `# dotfiles`.

use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::profile;

// First README line that identifies the root of a dotfiles repository.
// Matched case-insensitively, surrounding whitespace ignored.
const ROOT_MARKER: &str = "# dotfiles";

#[derive(Error, Debug)]
pub enum RepoRootError {
  #[error("hook at {0} is not inside a directory named \"hooks\"")]
  NotInHooksDir(PathBuf),

  #[error("hooks directory at {0} is not inside \".git\" or \"git-template\"")]
  NotInGitDir(PathBuf),

  #[error("no README.md starting with \"# dotfiles\" found above {0}")]
  MarkerNotFound(PathBuf),

  #[error(transparent)]
  Io(#[from] std::io::Error)
}

/// Checks whether `dir` holds a `README.md` whose first line is the dotfiles
/// marker.
pub fn is_dotfiles_root(dir: &Path) -> bool {
  let Ok(readme) = File::open(dir.join("README.md")) else {
    return false;
  };

  let mut first_line = String::new();
  if BufReader::new(readme).read_line(&mut first_line).is_err() {
    return false;
  }

  first_line.trim().eq_ignore_ascii_case(ROOT_MARKER)
}

/// Resolves the dotfiles repository root from the hook's own invocation path.
///
/// Verifies the structural expectations first: the hook must sit in a
/// directory named `hooks`, which itself must sit in `.git` or
/// `git-template`. Anything else means the hook is installed incorrectly.
pub fn from_hook(hook_path: &Path) -> Result<PathBuf, RepoRootError> {
  profile!("Locate repo root from hook path");

  // argv[0] may be relative; absolutize without resolving the symlink, since
  // the structural checks are about where the link lives.
  let hook_path = std::path::absolute(hook_path)?;

  let hooks_dir = hook_path
    .parent()
    .filter(|dir| dir.file_name() == Some(OsStr::new("hooks")))
    .ok_or_else(|| RepoRootError::NotInHooksDir(hook_path.clone()))?;

  let meta_dir = hooks_dir
    .parent()
    .filter(|dir| {
      matches!(
        dir.file_name().and_then(OsStr::to_str),
        Some(".git") | Some("git-template")
      )
    })
    .ok_or_else(|| RepoRootError::NotInGitDir(hooks_dir.to_path_buf()))?;

  from_dir(meta_dir)
}

/// Walks upward from `start` until a directory carrying the marker README is
/// found, or the filesystem root is reached.
pub fn from_dir(start: &Path) -> Result<PathBuf, RepoRootError> {
  profile!("Walk upward to repo root");

  let mut dir = std::path::absolute(start)?;
  loop {
    if is_dotfiles_root(&dir) {
      return Ok(dir);
    }
    if !dir.pop() {
      return Err(RepoRootError::MarkerNotFound(start.to_path_buf()));
    }
  }
}
