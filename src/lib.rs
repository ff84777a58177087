#[macro_export]
macro_rules! profile {
  ($name:expr) => {{
    let _span = tracing::span!(tracing::Level::DEBUG, $name);
    let _enter = _span.enter();
  }};
}

pub mod config;
pub mod filesystem;
pub mod hook;
pub mod linker;
pub mod openai;
pub mod prompt;
pub mod repo_root;
pub mod vcs;
