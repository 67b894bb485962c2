//! One-shot priming of the cached collections at startup.

use std::sync::atomic::{AtomicU8, Ordering};
use tracing::debug;

use crate::records::cache::DataCache;
use crate::session::Session;

/// Lifecycle of the priming fetch. Never reverts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BootstrapState {
  NotStarted = 0,
  Started = 1,
}

impl From<u8> for BootstrapState {
  fn from(v: u8) -> Self {
    match v {
      1 => BootstrapState::Started,
      _ => BootstrapState::NotStarted,
    }
  }
}

/// What a `run` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
  /// Both collections were primed.
  Primed,
  /// No session token was present; nothing was fetched.
  SkippedNoToken,
  /// Bootstrap had already run (or been skipped) this session.
  AlreadyStarted,
}

/// Primes both collections exactly once per session.
///
/// The session token is checked once, on the first call. A token that
/// appears later in the same session does not re-arm the trigger; the
/// next process start picks it up.
pub struct Bootstrap {
  state: AtomicU8,
}

impl Bootstrap {
  pub fn new() -> Self {
    Self {
      state: AtomicU8::new(BootstrapState::NotStarted as u8),
    }
  }

  #[allow(dead_code)]
  pub fn state(&self) -> BootstrapState {
    self.state.load(Ordering::SeqCst).into()
  }

  /// Run the priming fetch if this is the first call and the user is
  /// signed in. Staleness rules still apply to the fetches, which is
  /// moot at startup since both collections begin empty.
  pub async fn run(&self, session: &Session, cache: &DataCache) -> BootstrapOutcome {
    if self
      .state
      .compare_exchange(
        BootstrapState::NotStarted as u8,
        BootstrapState::Started as u8,
        Ordering::SeqCst,
        Ordering::SeqCst,
      )
      .is_err()
    {
      return BootstrapOutcome::AlreadyStarted;
    }

    if session.auth_token().is_none() {
      debug!("no session token at startup, skipping priming fetch");
      return BootstrapOutcome::SkippedNoToken;
    }

    let (matters, assignees) =
      tokio::join!(cache.fetch_matters(false), cache.fetch_assignees(false));
    debug!(
      matters = matters.data.len(),
      assignees = assignees.data.len(),
      "primed caches"
    );
    BootstrapOutcome::Primed
  }
}
