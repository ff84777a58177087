use async_openai::types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs};
use async_openai::config::OpenAIConfig;
use async_openai::Client;
use async_openai::error::OpenAIError;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use colored::*;

use crate::profile;

const MAX_COMPLETION_TOKENS: u16 = 512;

/// Suggested commit message as returned by the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMessage {
  pub text: String
}

/// Produces a commit message for a rendered prompt.
///
/// Exactly one request per invocation; no caching, no retries, no streaming.
#[async_trait]
pub trait Generator {
  async fn suggest(&self, prompt: &str, model: &str) -> Result<CommitMessage>;
}

/// OpenAI chat-completion client.
pub struct OpenAiClient {
  api_key: String
}

impl OpenAiClient {
  pub fn new(api_key: String) -> Self {
    Self { api_key }
  }
}

#[async_trait]
impl Generator for OpenAiClient {
  async fn suggest(&self, prompt: &str, model: &str) -> Result<CommitMessage> {
    profile!("OpenAI API call");

    let config = OpenAIConfig::new().with_api_key(self.api_key.clone());
    let client = Client::with_config(config);

    let request = CreateChatCompletionRequestArgs::default()
      .max_tokens(MAX_COMPLETION_TOKENS)
      .model(model)
      .messages([ChatCompletionRequestUserMessageArgs::default()
        .content(prompt)
        .build()?
        .into()])
      .build()?;

    let response = match client.chat().create(request).await {
      Ok(response) => response,
      Err(err) => {
        let error_msg = match err {
          OpenAIError::ApiError(e) =>
            format!(
              "{} {}\n    {}\n\nDetails:\n    {}\n\nSuggested Actions:\n    1. {}\n    2. {}\n    3. {}",
              "ERROR:".bold().bright_red(),
              "OpenAI API error:".bright_white(),
              e.message.dimmed(),
              "Failed to create chat completion.".dimmed(),
              "Ensure your OpenAI API key is valid".yellow(),
              "Check your account credits".yellow(),
              "Verify OpenAI service availability".yellow()
            ),
          OpenAIError::Reqwest(e) =>
            format!(
              "{} {}\n    {}\n\nDetails:\n    {}\n\nSuggested Actions:\n    1. {}\n    2. {}",
              "ERROR:".bold().bright_red(),
              "Network error:".bright_white(),
              e.to_string().dimmed(),
              "Failed to connect to OpenAI service.".dimmed(),
              "Check your internet connection".yellow(),
              "Verify OpenAI service is not experiencing downtime".yellow()
            ),
          _ =>
            format!(
              "{} {}\n    {}\n\nDetails:\n    {}",
              "ERROR:".bold().bright_red(),
              "Unexpected error:".bright_white(),
              err.to_string().dimmed(),
              "An unexpected error occurred while communicating with OpenAI.".dimmed()
            ),
        };
        return Err(anyhow!(error_msg));
      }
    };

    let text = response
      .choices
      .first()
      .context("No choices returned")?
      .message
      .content
      .clone()
      .context("No content returned")?;

    Ok(CommitMessage { text })
  }
}
