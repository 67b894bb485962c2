//! Persisted session state.
//!
//! The dashboard treats the presence of a saved auth token as "already
//! signed in": the bootstrap priming fetch only runs when a token is
//! found, and the token is attached to backend requests when present.

use std::fs;
use std::path::{Path, PathBuf};

/// Saved session state, read once at startup.
#[derive(Debug, Clone)]
pub struct Session {
  token: Option<String>,
}

impl Session {
  /// Load session state from the environment or the saved token file.
  ///
  /// Checks MATTERDESK_TOKEN first, then MATTERDESK_SESSION_TOKEN, then
  /// the token file under the user data directory.
  pub fn load() -> Self {
    let token = std::env::var("MATTERDESK_TOKEN")
      .or_else(|_| std::env::var("MATTERDESK_SESSION_TOKEN"))
      .ok()
      .filter(|t| !t.trim().is_empty())
      .or_else(|| default_token_path().as_deref().and_then(read_token_file));

    Self { token }
  }

  /// Create a session with an explicit token (or none).
  #[allow(dead_code)]
  pub fn with_token(token: Option<String>) -> Self {
    Self { token }
  }

  /// The saved auth token, if the user is signed in.
  pub fn auth_token(&self) -> Option<&str> {
    self.token.as_deref()
  }
}

/// Default location of the saved token: `<data>/matterdesk/token`.
fn default_token_path() -> Option<PathBuf> {
  dirs::data_dir()
    .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
    .map(|dir| dir.join("matterdesk").join("token"))
}

fn read_token_file(path: &Path) -> Option<String> {
  let contents = fs::read_to_string(path).ok()?;
  let token = contents.trim();
  if token.is_empty() {
    None
  } else {
    Some(token.to_string())
  }
}
