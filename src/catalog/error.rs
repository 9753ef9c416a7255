//! Error types for catalog resolution.
//!
//! The taxonomy separates two caller-facing classes: "the provider is
//! broken" (transport/parse failures, retryable by the caller) and "the
//! requested entity does not exist" (expected, catchable, drives fallback
//! logic like trying the next episode). The library itself never retries or
//! falls back on either class.

use thiserror::Error;

use crate::session::SessionError;

/// Errors raised while resolving catalog entities.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Network-level failure (DNS, connection refused, TLS, interrupted
    /// body) talking to the provider.
    #[error("network error contacting {url}: {source}")]
    Network {
        /// The endpoint that failed.
        url: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The provider did not answer within the session's request timeout.
    #[error("timeout contacting {url}")]
    Timeout {
        /// The endpoint that timed out.
        url: String,
    },

    /// The provider answered with a non-success HTTP status.
    #[error("HTTP {status} from {url}")]
    Status {
        /// The endpoint that errored.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The provider answered, but the payload could not be parsed.
    #[error("malformed provider payload from {url}: {reason}")]
    Payload {
        /// The endpoint whose payload was rejected.
        url: String,
        /// What was wrong with the payload.
        reason: String,
    },

    /// The requested entity does not exist at this addressing level.
    ///
    /// Expected control-flow signal: callers branch on this (try another
    /// episode/voice) instead of treating it as fatal.
    #[error("video not found: {detail}")]
    VideoNotFound {
        /// Which lookup missed, in display terms.
        detail: String,
    },

    /// The (episode, voice) stream exists but no encoded quality is
    /// currently servable.
    #[error("no servable quality for player {player_id} s{season}e{episode} voice {voice_id}")]
    QualityUnavailable {
        /// Show identifier.
        player_id: String,
        /// Season number.
        season: u32,
        /// Episode number.
        episode: u32,
        /// Voice track id.
        voice_id: String,
    },

    /// Session lifecycle misuse surfaced through a catalog operation.
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl CatalogError {
    /// Creates a network error for an endpoint.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates a timeout error for an endpoint.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an HTTP status error.
    pub fn status(url: impl Into<String>, status: u16) -> Self {
        Self::Status {
            url: url.into(),
            status,
        }
    }

    /// Creates a malformed payload error.
    pub fn payload(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Payload {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates a not-found error with a lookup description.
    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::VideoNotFound {
            detail: detail.into(),
        }
    }

    /// Creates a quality-unavailable error for a resolved (episode, voice).
    pub fn quality_unavailable(
        player_id: impl Into<String>,
        season: u32,
        episode: u32,
        voice_id: impl Into<String>,
    ) -> Self {
        Self::QualityUnavailable {
            player_id: player_id.into(),
            season,
            episode,
            voice_id: voice_id.into(),
        }
    }

    /// True for the expected "entity absent" signal callers branch on.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::VideoNotFound { .. })
    }

    /// True for transport/parse failures the caller may retry; never true
    /// for not-found, quality-unavailable, or lifecycle errors.
    #[must_use]
    pub fn is_provider_unavailable(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::Timeout { .. } | Self::Status { .. } | Self::Payload { .. }
        )
    }
}

// Note on From trait implementations:
// No blanket `From<reqwest::Error>`: the variants need the endpoint context
// the source error does not carry, so the helper constructors are the
// conversion surface.
