use std::process::Command;

use colored::Colorize;
use thiserror::Error;

use crate::profile;

// Constants
const EXCLUDED_LOCKFILES: [&str; 2] = ["package-lock.json", "yarn.lock"];
const TRUNCATION_MARKER: &str = "\n...(truncated)";

/// Hard cap on the diff text handed to the prompt, in characters.
pub const MAX_DIFF_CHARS: usize = 9000;

// Error definitions
#[derive(Error, Debug)]
pub enum VcsError {
  #[error("`git {0}` exited with status {1}")]
  CommandFailed(String, i32),

  #[error("Failed to run git: {0}")]
  Spawn(#[from] std::io::Error)
}

// String conversion traits
pub trait Utf8String {
  fn to_utf8(&self) -> String;
}

impl Utf8String for Vec<u8> {
  fn to_utf8(&self) -> String {
    String::from_utf8_lossy(self).into_owned()
  }
}

impl Utf8String for [u8] {
  fn to_utf8(&self) -> String {
    String::from_utf8_lossy(self).into_owned()
  }
}

/// Interface to the version-control system.
///
/// The hook orchestrator only ever needs these two read-only views of the
/// staged state, so tests can substitute a fake without spawning processes.
pub trait Vcs {
  /// Short-format status of staged paths, untracked files excluded.
  fn status(&self) -> Result<String, VcsError>;

  /// Zero-context unified diff of the staged changes, lockfiles excluded.
  fn diff(&self) -> Result<String, VcsError>;
}

/// Status and diff text for the staged changes, gathered once per hook run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitContext {
  pub status_text: String,
  pub diff_text:   String
}

impl CommitContext {
  pub fn gather(vcs: &impl Vcs, max_diff_chars: usize) -> Result<Self, VcsError> {
    profile!("Gather commit context");
    let status_text = vcs.status()?;
    let diff_text = truncate_diff(vcs.diff()?, max_diff_chars);
    Ok(Self { status_text, diff_text })
  }
}

/// Runs `git` as a subprocess and captures its output.
#[derive(Debug, Default)]
pub struct GitCli;

impl GitCli {
  fn run(&self, args: &[&str]) -> Result<String, VcsError> {
    profile!("Run git subcommand");
    let output = Command::new("git").args(args).output()?;

    // stderr is a warning channel even on success
    let stderr = output.stderr.to_utf8();
    if !stderr.is_empty() {
      eprintln!("{}", stderr.trim_end().red());
    }

    if !output.status.success() {
      return Err(VcsError::CommandFailed(args.join(" "), output.status.code().unwrap_or(-1)));
    }

    Ok(output.stdout.to_utf8())
  }

  fn staged_files(&self) -> Result<Vec<String>, VcsError> {
    let listing = self.run(&["diff", "--cached", "--name-only", "--diff-filter=ACMRTUXB"])?;
    Ok(filter_lockfiles(&listing))
  }
}

impl Vcs for GitCli {
  fn status(&self) -> Result<String, VcsError> {
    self.run(&["status", "--short", "--untracked-files=no"])
  }

  fn diff(&self) -> Result<String, VcsError> {
    let files = self.staged_files()?;
    let mut args = vec!["diff", "--cached", "--no-color", "--no-ext-diff", "--unified=0", "--no-prefix"];
    args.extend(files.iter().map(String::as_str));
    self.run(&args)
  }
}

fn filter_lockfiles(listing: &str) -> Vec<String> {
  listing
    .lines()
    .filter(|name| !EXCLUDED_LOCKFILES.contains(name))
    .map(str::to_string)
    .collect()
}

/// Caps `diff` at `max_chars` characters, appending a truncation marker when
/// anything was cut. The cap counts characters, never splitting a UTF-8
/// sequence.
pub fn truncate_diff(diff: String, max_chars: usize) -> String {
  if diff.chars().count() <= max_chars {
    return diff;
  }

  let mut capped: String = diff.chars().take(max_chars).collect();
  capped.push_str(TRUNCATION_MARKER);
  capped
}

#[cfg(test)]
mod tests {
  use super::*;

  struct FakeVcs {
    status: &'static str,
    diff:   String
  }

  impl Vcs for FakeVcs {
    fn status(&self) -> Result<String, VcsError> {
      Ok(self.status.to_string())
    }

    fn diff(&self) -> Result<String, VcsError> {
      Ok(self.diff.clone())
    }
  }

  #[test]
  fn test_filter_lockfiles() {
    let listing = "src/main.rs\npackage-lock.json\nyarn.lock\nREADME.md\n";
    assert_eq!(filter_lockfiles(listing), vec!["src/main.rs", "README.md"]);
  }

  #[test]
  fn test_filter_keeps_nested_lockfile_paths() {
    // Only exact names are excluded, matching the staged-file listing git
    // produces at the repository root.
    let listing = "vendor/package-lock.json\n";
    assert_eq!(filter_lockfiles(listing), vec!["vendor/package-lock.json"]);
  }

  #[test]
  fn test_truncate_diff_below_cap_is_untouched() {
    let diff = "@@ -1 +1 @@\n-foo\n+bar".to_string();
    assert_eq!(truncate_diff(diff.clone(), MAX_DIFF_CHARS), diff);
  }

  #[test]
  fn test_truncate_diff_at_cap_is_untouched() {
    let diff = "a".repeat(10);
    assert_eq!(truncate_diff(diff.clone(), 10), diff);
  }

  #[test]
  fn test_truncate_diff_past_cap_appends_marker() {
    let diff = "abcdefgh".to_string();
    assert_eq!(truncate_diff(diff, 3), format!("abc{TRUNCATION_MARKER}"));
  }

  #[test]
  fn test_truncate_diff_counts_characters_not_bytes() {
    let diff = "ééééé".to_string();
    assert_eq!(truncate_diff(diff, 3), format!("ééé{TRUNCATION_MARKER}"));
  }

  #[test]
  fn test_gather_applies_cap() {
    let vcs = FakeVcs { status: "M file.go", diff: "x".repeat(20) };
    let context = CommitContext::gather(&vcs, 10).unwrap();

    assert_eq!(context.status_text, "M file.go");
    assert_eq!(context.diff_text, format!("{}{TRUNCATION_MARKER}", "x".repeat(10)));
  }
}
