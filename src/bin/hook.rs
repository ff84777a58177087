// Hook: prepare-commit-msg

use std::env;
use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::time::Duration;
use anyhow::{Context, Result};
use clap::Parser;

use dotkit::config;
use dotkit::hook::{self, Args, HookConfig};
use dotkit::openai::OpenAiClient;
use dotkit::repo_root;
use dotkit::vcs::{self, GitCli};

#[tokio::main]
async fn main() -> Result<()> {
  env_logger::init();
  dotenv::dotenv().ok();

  let args = Args::parse();

  // The hook's own invocation path anchors everything; failing to resolve
  // the toolkit root means the hook is installed incorrectly.
  let hook_path = PathBuf::from(env::args().next().context("argv[0] missing")?);
  let toolkit_root = repo_root::from_hook(&hook_path)?;

  let api_key = env::var(config::API_KEY_ENV_VAR)
    .ok()
    .filter(|key| !key.is_empty())
    .or_else(|| config::APP.openai_api_key.clone());

  let cfg = HookConfig {
    enabled: env::var(config::ENABLE_ENV_VAR).map(|value| value == "true").unwrap_or(false),
    api_key: api_key.clone(),
    model: config::APP.model.clone().unwrap_or_else(|| config::DEFAULT_MODEL.to_string()),
    max_diff_chars: config::APP.max_diff_chars.unwrap_or(vcs::MAX_DIFF_CHARS),
    toolkit_root
  };

  // Loading bar to indicate that the program is running
  let style = ProgressStyle::default_spinner()
    .tick_strings(&["-", "\\", "|", "/"])
    .template("{spinner:.blue} {msg}")
    .context("Failed to create progress bar style")?;

  let pb = ProgressBar::new_spinner();
  pb.set_style(style);
  pb.set_message("Generating commit message...");
  pb.enable_steady_tick(Duration::from_millis(150));

  let generator = OpenAiClient::new(api_key.unwrap_or_default());
  let result = hook::run(&cfg, &args, &GitCli, &generator).await;
  pb.finish_and_clear();

  if let Err(err) = result {
    eprintln!("{err}");
    std::process::exit(1);
  }

  Ok(())
}
