// Hook: prepare-commit-msg

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::fs::File;
use std::fs;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use thiserror::Error;

use crate::openai::{CommitMessage, Generator};
use crate::vcs::{CommitContext, Vcs, VcsError};
use crate::{profile, prompt};

/// Name of the debug artifact holding the last rendered prompt, written at
/// the toolkit root and overwritten each run.
pub const PROMPT_DEBUG_FILE: &str = ".prompt";

// CLI Arguments
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
  /// File that holds the commit message, edited in place.
  pub commit_msg_file: PathBuf,

  /// Source of the commit message: message, template, merge, squash or commit.
  #[clap(required = false)]
  pub source: Option<String>,

  /// Commit object name, present when amending.
  #[clap(required = false)]
  pub commit: Option<String>
}

// Error definitions
#[derive(Error, Debug)]
pub enum HookError {
  #[error("{}", "OpenAI suggestion failed: OPENAI_API_KEY not set".red())]
  MissingApiKey,

  #[error(transparent)]
  Vcs(#[from] VcsError),

  #[error(transparent)]
  Anyhow(#[from] anyhow::Error)
}

/// Terminal states of a hook run that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
  /// The suggested message was written into the commit-message file.
  MessageWritten,

  /// The assistant is not opted in; nothing was touched.
  SkippedDisabled,

  /// The operator already supplied a message; nothing was touched.
  SkippedExistingMessage
}

/// Everything the orchestrator needs, resolved once at process start and
/// passed by parameter. The library never reads the environment itself.
#[derive(Debug, Clone)]
pub struct HookConfig {
  pub enabled:        bool,
  pub api_key:        Option<String>,
  pub model:          String,
  pub max_diff_chars: usize,
  pub toolkit_root:   PathBuf
}

// File operations traits
pub trait FilePath {
  fn is_empty(&self) -> Result<bool> {
    self.read().map(|s| s.is_empty())
  }

  fn write(&self, msg: String) -> Result<()>;
  fn read(&self) -> Result<String>;
}

impl FilePath for PathBuf {
  fn write(&self, msg: String) -> Result<()> {
    File::create(self)?
      .write_all(msg.as_bytes())
      .map_err(Into::into)
  }

  fn read(&self) -> Result<String> {
    let mut contents = String::new();
    File::open(self)?.read_to_string(&mut contents)?;
    Ok(contents)
  }
}

/// A commit message counts as present when the file's first line is
/// non-blank. Template comments start with a blank line, so they do not
/// count; a `-m`/`-F`-supplied message does.
fn has_operator_message(contents: &str) -> bool {
  contents
    .lines()
    .next()
    .is_some_and(|line| !line.trim().is_empty())
}

pub async fn run(cfg: &HookConfig, args: &Args, vcs: &impl Vcs, generator: &impl Generator) -> Result<HookOutcome, HookError> {
  profile!("prepare-commit-msg hook");

  // The assistant is opt-in; anything but the literal "true" disables it.
  if !cfg.enabled {
    println!("{} is not \"true\", exiting", crate::config::ENABLE_ENV_VAR);
    return Ok(HookOutcome::SkippedDisabled);
  }

  // Never replace a message the operator already supplied. A missing file
  // counts as empty.
  if args.commit_msg_file.exists() {
    let contents = args
      .commit_msg_file
      .read()
      .context("Failed to read commit message file")?;

    if has_operator_message(&contents) {
      println!("Commit message already specified earlier in the commit process");
      println!("Message is in {}", args.commit_msg_file.display());
      return Ok(HookOutcome::SkippedExistingMessage);
    }
  }

  if cfg.api_key.as_deref().map_or(true, str::is_empty) {
    return Err(HookError::MissingApiKey);
  }

  let context = CommitContext::gather(vcs, cfg.max_diff_chars)?;

  let prompt_text = prompt::render(&cfg.model, &context.status_text, &context.diff_text);
  cfg
    .toolkit_root
    .join(PROMPT_DEBUG_FILE)
    .write(prompt_text.clone())
    .context("Failed to write prompt debug file")?;

  let CommitMessage { text } = generator.suggest(&prompt_text, &cfg.model).await?;

  replace_message_file(&args.commit_msg_file, &text)?;

  println!();
  println!("Wrote suggested commit message to {}", args.commit_msg_file.display());
  println!();
  for line in text.lines() {
    println!("> {}", line.dimmed());
  }
  println!();

  Ok(HookOutcome::MessageWritten)
}

/// Deletes the confirmed-empty commit-message file and writes the suggested
/// text in its place.
fn replace_message_file(path: &Path, text: &str) -> Result<()> {
  if path.exists() {
    fs::remove_file(path).with_context(|| format!("Failed to remove commit message file at {}", path.display()))?;
  }
  path
    .to_path_buf()
    .write(text.to_string())
    .context("Failed to write commit message")
}
