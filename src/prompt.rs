use crate::profile;

/// Renders the instructional prompt for a commit-message request.
///
/// Pure function of its inputs: the same model, status and diff always
/// produce byte-identical output.
pub fn render(model: &str, status_text: &str, diff_text: &str) -> String {
  profile!("Render prompt");

  format!(
    "You are an expert software engineer who writes excellent git commit messages. \
Draft a commit message for the staged changes listed below. Please adhere to the following guidelines:

  - Present tense, imperative mood. (e.g., 'Add x to y' instead of 'Added x to y')
  - Subject line of 50 characters or fewer, summarizing the change.
  - Body wrapped at 72 columns, explaining what changed and why.
  - After the body, leave two blank lines and close with this exact footer:
    (commit message written by OpenAI {model})

## Output:

Your output should be the commit message and nothing else.

## Staged files (short status):

{status_text}

## Staged diff (unified, zero context):

{diff_text}"
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_render_is_deterministic() {
    let first = render("model-x", "M file.go", "@@ -1 +1 @@\n-foo\n+bar");
    let second = render("model-x", "M file.go", "@@ -1 +1 @@\n-foo\n+bar");
    assert_eq!(first, second);
  }

  #[test]
  fn test_render_contains_fragments_verbatim() {
    let prompt = render("model-x", "M file.go", "@@ -1 +1 @@\n-foo\n+bar");

    assert!(prompt.contains("M file.go"));
    assert!(prompt.contains("@@ -1 +1 @@\n-foo\n+bar"));
  }

  #[test]
  fn test_render_names_the_model_in_the_footer() {
    let prompt = render("model-x", "", "");
    assert!(prompt.contains("(commit message written by OpenAI model-x)"));
  }

  #[test]
  fn test_render_differs_per_model() {
    assert_ne!(render("model-x", "s", "d"), render("model-y", "s", "d"));
  }
}
