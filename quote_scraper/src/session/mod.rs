//! Session resources owned by workers.
//!
//! A *session* is the expensive per-worker handle (a browser engine, or an
//! HTTP client with its connection pool). It is launched once per worker and
//! lives until the worker drops it. A *context* is the cheap isolated scope a
//! session opens for a single code; it is released when dropped, so release
//! happens on every exit path.
//!
//! - `http`: `reqwest` blocking client sessions used in production.
use std::time::Duration;

use quote_common::error::{FetchFatalError, StartupError};

use crate::consts::{DEFAULT_CONNECT_TIMEOUT_SECS, USER_AGENT_PREFIX};

pub mod http;

pub use http::{HttpContext, HttpSession, HttpSessionProvider};

/// Launches the session a worker keeps for its lifetime.
pub trait SessionProvider: Sync {
    /// Session type handed to workers.
    type Session: Session;

    /// Creates the session for worker slot `worker_id`.
    fn launch(&self, worker_id: usize) -> Result<Self::Session, StartupError>;
}

/// Long-lived resource that opens one isolated context per code.
pub trait Session: Send {
    /// Per-code sub-session.
    type Context;

    /// Opens a fresh context; failure means the session itself is unusable.
    fn open_context(&mut self) -> Result<Self::Context, FetchFatalError>;
}

/// Context type produced by a provider's sessions.
pub type ContextOf<P> = <<P as SessionProvider>::Session as Session>::Context;

/// Settings for launching sessions.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// User agent prefix; the worker id is appended.
    pub user_agent_prefix: String,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
    /// Honour `HTTP_PROXY`-style environment settings.
    pub use_system_proxy: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            user_agent_prefix: USER_AGENT_PREFIX.to_string(),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            use_system_proxy: true,
        }
    }
}

impl SessionConfig {
    /// User agent for one worker.
    pub fn user_agent(&self, worker_id: usize) -> String {
        format!("{} Worker-{}", self.user_agent_prefix, worker_id)
    }
}
