//! Session lifecycle and the shared HTTP connection pool.
//!
//! A [`Session`] owns the one `reqwest::Client` every other component talks
//! through. The lifecycle is a one-shot state machine: created, opened once,
//! closed once. Components borrow a cheap clone of the pooled client via
//! [`Session::handle`], which fails once the session is closed, so no request
//! can outlive the pool it belongs to.
//!
//! Closing is also wired into `Drop`: a session that goes out of scope on any
//! path (early return, error, panic, task cancellation) releases its pool
//! without the caller having to remember an explicit `close()`.

use std::sync::RwLock;
use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::user_agent;

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (5 minutes for large streams).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Default catalog provider base URL.
pub const DEFAULT_BASE_URL: &str = "https://tv532.ru";

/// Errors raised by session lifecycle misuse or setup failure.
#[derive(Debug, Error)]
pub enum SessionError {
    /// `open()` was called on a session that is already open.
    #[error("session is already open")]
    AlreadyOpen,

    /// The session was closed; no further requests are possible.
    #[error("session is closed")]
    Closed,

    /// The configured provider base URL is not a valid absolute URL.
    #[error("invalid provider base URL: {url}")]
    InvalidBaseUrl {
        /// The rejected base URL string.
        url: String,
    },

    /// The underlying HTTP client could not be constructed.
    #[error("failed to initialize HTTP session: {source}")]
    Init {
        /// The builder error from the HTTP stack.
        #[source]
        source: reqwest::Error,
    },
}

/// Session configuration: provider location and per-request timeouts.
///
/// Timeouts are configured here and only here; a timed-out request surfaces
/// from the operation that issued it as a transport error, never as a silent
/// empty result.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Base URL of the catalog provider (scheme + host, no trailing slash
    /// required).
    pub base_url: String,
    /// TCP/TLS connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Per-request read timeout in seconds.
    pub read_timeout_secs: u64,
}

impl SessionConfig {
    /// Creates a configuration for the given provider base URL with default
    /// timeouts.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            read_timeout_secs: READ_TIMEOUT_SECS,
        }
    }
}

/// Lifecycle states. `Open` is the only state holding a live pool.
enum SessionState {
    Pending,
    Open(Client),
    Closed,
}

/// One network session: connection reuse, cookies, and per-request timeouts.
///
/// All library operations for a client share this session; the pool (not the
/// caller) serializes connection reuse, so concurrently issued requests are
/// safe by construction.
pub struct Session {
    config: SessionConfig,
    state: RwLock<SessionState>,
}

impl Session {
    /// Creates an unopened session with the given configuration.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            state: RwLock::new(SessionState::Pending),
        }
    }

    /// Establishes the underlying network session (connection pool, cookie
    /// store, timeouts, shared User-Agent).
    ///
    /// The lifecycle is one-shot: opening an open session fails with
    /// [`SessionError::AlreadyOpen`], and a closed session cannot be reopened
    /// ([`SessionError::Closed`]); create a new session to reconnect.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidBaseUrl`] when the configured base URL
    /// does not parse, and [`SessionError::Init`] when client construction
    /// fails.
    pub fn open(&self) -> Result<(), SessionError> {
        let mut state = self
            .state
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        match *state {
            SessionState::Open(_) => Err(SessionError::AlreadyOpen),
            SessionState::Closed => Err(SessionError::Closed),
            SessionState::Pending => {
                Url::parse(&self.config.base_url).map_err(|_| SessionError::InvalidBaseUrl {
                    url: self.config.base_url.clone(),
                })?;
                let client = Client::builder()
                    .connect_timeout(Duration::from_secs(self.config.connect_timeout_secs))
                    .timeout(Duration::from_secs(self.config.read_timeout_secs))
                    .gzip(true)
                    .cookie_store(true)
                    .user_agent(user_agent::default_user_agent())
                    .build()
                    .map_err(|source| SessionError::Init { source })?;
                debug!(base_url = %self.config.base_url, "session opened");
                *state = SessionState::Open(client);
                Ok(())
            }
        }
    }

    /// Releases the network session. Idempotent; pending requests already
    /// holding a pool handle run to completion, new requests fail with
    /// [`SessionError::Closed`].
    pub fn close(&self) {
        let mut state = self
            .state
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if matches!(*state, SessionState::Open(_)) {
            debug!("session closed");
        }
        *state = SessionState::Closed;
    }

    /// Returns true while the session is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(
            *self
                .state
                .read()
                .unwrap_or_else(std::sync::PoisonError::into_inner),
            SessionState::Open(_)
        )
    }

    /// Returns the session configuration.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Hands out a clone of the pooled client (cheap: the pool is shared).
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] when the session was never opened or
    /// has been closed.
    pub(crate) fn handle(&self) -> Result<Client, SessionError> {
        match &*self
            .state
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
        {
            SessionState::Open(client) => Ok(client.clone()),
            SessionState::Pending | SessionState::Closed => Err(SessionError::Closed),
        }
    }

    /// Fails with [`SessionError::Closed`] unless the session is open.
    pub(crate) fn ensure_open(&self) -> Result<(), SessionError> {
        self.handle().map(|_| ())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.config.base_url)
            .field("open", &self.is_open())
            .finish_non_exhaustive()
    }
}
