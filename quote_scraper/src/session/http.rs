//! HTTP sessions backed by `reqwest::blocking::Client`.
//!
//! The client (and its connection pool) is the per-worker session. It keeps
//! no cookie store, so nothing set while loading one code is visible when
//! loading the next.
use std::time::Duration;

use log::debug;
use quote_common::error::{FetchFatalError, StartupError};
use reqwest::blocking::{Client, Response};

use super::{Session, SessionConfig, SessionProvider};

/// Builds one HTTP client per worker.
#[derive(Debug, Clone, Default)]
pub struct HttpSessionProvider {
    config: SessionConfig,
}

impl HttpSessionProvider {
    /// Provider using `config` for every launched session.
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }
}

impl SessionProvider for HttpSessionProvider {
    type Session = HttpSession;

    fn launch(&self, worker_id: usize) -> Result<HttpSession, StartupError> {
        let user_agent = self.config.user_agent(worker_id);
        let mut builder = Client::builder()
            .user_agent(user_agent.clone())
            .connect_timeout(self.config.connect_timeout);
        if !self.config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| StartupError::Launch {
                worker_id,
                reason: e.to_string(),
            })?;
        debug!("Worker {} session launched ({})", worker_id, user_agent);
        Ok(HttpSession { worker_id, client })
    }
}

/// One worker's HTTP client.
pub struct HttpSession {
    worker_id: usize,
    client: Client,
}

impl Session for HttpSession {
    type Context = HttpContext;

    fn open_context(&mut self) -> Result<HttpContext, FetchFatalError> {
        Ok(HttpContext {
            worker_id: self.worker_id,
            client: self.client.clone(),
        })
    }
}

impl Drop for HttpSession {
    fn drop(&mut self) {
        debug!("Worker {} session closed", self.worker_id);
    }
}

/// Request scope for a single code.
pub struct HttpContext {
    worker_id: usize,
    client: Client,
}

impl HttpContext {
    /// Worker that opened this context.
    pub fn worker_id(&self) -> usize {
        self.worker_id
    }

    /// Issues a GET bounded by `timeout` (connect, headers and body).
    pub fn get(&self, url: &str, timeout: Duration) -> reqwest::Result<Response> {
        self.client.get(url).timeout(timeout).send()
    }
}
