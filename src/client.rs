//! The caller-facing client: session lifecycle plus the full resolution
//! pipeline (query → title → series structure → episode → voice → quality →
//! stream) and downloads.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use tvgrab::{SessionConfig, TvClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = TvClient::new(SessionConfig::default());
//! client.open()?;
//!
//! let results = client.search("one piece").await?;
//! if let Some(show) = results.first() {
//!     let series = client.get_series_data(&show.player_id).await?;
//!     println!("seasons: {}", series.seasons.len());
//!
//!     let episodes = client.get_episode_data(&show.player_id, "1", "1").await?;
//!     let voice = &episodes[0].voice_id;
//!     let qualities = client
//!         .get_available_qualities(&show.player_id, "1", "1", voice)
//!         .await?;
//!     let path = client
//!         .download_video(
//!             &show.player_id,
//!             "1",
//!             "1",
//!             voice,
//!             qualities[0].quality,
//!             Path::new("./downloads"),
//!         )
//!         .await?;
//!     println!("saved to {}", path.display());
//! }
//!
//! client.close();
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::instrument;

use crate::catalog::{CatalogError, CatalogGateway, CatalogProvider, HttpCatalogProvider};
use crate::download::{self, DownloadError, DownloadOptions, DownloadRequest};
use crate::model::{EpisodeData, NextEpisodeInfo, Quality, SearchResult, SeriesData, TvShow};
use crate::session::{Session, SessionConfig, SessionError};
use crate::{episode, navigation, series};

/// Asynchronous client for the streaming-TV catalog.
///
/// One client owns one network session; all methods take `&self` and may be
/// called concurrently; unrelated lookups run fully in parallel over the
/// shared connection pool. Every returned entity is an immutable snapshot
/// fetched fresh for that call.
///
/// The session closes when the client is dropped, so scoped use (create,
/// open, work, drop) releases the pool on every exit path; `close()` exists
/// for callers that want the release to be explicit and observable.
#[derive(Debug)]
pub struct TvClient {
    session: Arc<Session>,
    gateway: CatalogGateway,
}

impl TvClient {
    /// Creates a client for the configured provider. The session starts
    /// unopened; call [`open`](Self::open) before issuing requests.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        let session = Arc::new(Session::new(config));
        let provider = Arc::new(HttpCatalogProvider::new(Arc::clone(&session)));
        Self {
            gateway: CatalogGateway::new(provider),
            session,
        }
    }

    /// Creates a client over a custom provider implementation. The session
    /// still gates every call, but network specifics belong to `provider`.
    #[must_use]
    pub fn with_provider(config: SessionConfig, provider: Arc<dyn CatalogProvider>) -> Self {
        Self {
            session: Arc::new(Session::new(config)),
            gateway: CatalogGateway::new(provider),
        }
    }

    /// Establishes the network session.
    ///
    /// # Errors
    ///
    /// [`SessionError::AlreadyOpen`] on re-entrant open,
    /// [`SessionError::Closed`] once closed, [`SessionError::Init`] /
    /// [`SessionError::InvalidBaseUrl`] when setup fails.
    pub fn open(&self) -> Result<(), SessionError> {
        self.session.open()
    }

    /// Releases the network session. Idempotent. Every method called after
    /// this fails with a closed-session error.
    pub fn close(&self) {
        self.session.close();
    }

    /// Searches the catalog for shows matching a free-text query.
    ///
    /// An empty vector means "no matches" and is not an error.
    ///
    /// # Errors
    ///
    /// Provider-unavailable [`CatalogError`] variants on transport/payload
    /// failure; [`CatalogError::Session`] on lifecycle misuse.
    #[instrument(level = "debug", skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, CatalogError> {
        self.session.ensure_open()?;
        self.gateway.search(query).await
    }

    /// Fetches show metadata for a player id found under `query`.
    ///
    /// # Errors
    ///
    /// [`CatalogError::VideoNotFound`] when the player id is unknown under
    /// that query context; provider-unavailable variants otherwise.
    #[instrument(level = "debug", skip(self))]
    pub async fn get_tv_show(&self, query: &str, player_id: &str) -> Result<TvShow, CatalogError> {
        self.session.ensure_open()?;
        self.gateway.get_tv_show(query, player_id).await
    }

    /// Resolves the full season/episode/voice structure of a show.
    ///
    /// # Errors
    ///
    /// [`CatalogError::VideoNotFound`] for an unknown player id;
    /// provider-unavailable variants on transport/payload failure.
    #[instrument(level = "debug", skip(self))]
    pub async fn get_series_data(&self, player_id: &str) -> Result<SeriesData, CatalogError> {
        self.session.ensure_open()?;
        let entries = self.gateway.series_entries(player_id).await?;
        Ok(series::build_series_data(&entries))
    }

    /// Resolves one episode to its playable voice variants. Season and
    /// episode are display-form digit strings.
    ///
    /// # Errors
    ///
    /// [`CatalogError::VideoNotFound`] when no voice offers the pair, the
    /// expected signal for "try another episode" fallback logic.
    #[instrument(level = "debug", skip(self))]
    pub async fn get_episode_data(
        &self,
        player_id: &str,
        season: &str,
        episode: &str,
    ) -> Result<Vec<EpisodeData>, CatalogError> {
        self.session.ensure_open()?;
        episode::episode_data(&self.gateway, player_id, season, episode).await
    }

    /// Resolves the encoded quality options of an (episode, voice) stream,
    /// deduplicated and sorted descending by resolution.
    ///
    /// # Errors
    ///
    /// [`CatalogError::VideoNotFound`] when the (episode, voice) pair yields
    /// no stream; [`CatalogError::QualityUnavailable`] when the stream
    /// exists but nothing is servable.
    #[instrument(level = "debug", skip(self))]
    pub async fn get_available_qualities(
        &self,
        player_id: &str,
        season: &str,
        episode: &str,
        voice_id: &str,
    ) -> Result<Vec<Quality>, CatalogError> {
        self.session.ensure_open()?;
        episode::available_qualities(&self.gateway, player_id, season, episode, voice_id).await
    }

    /// Computes the episode after (season, episode) in the show's resolved
    /// structure. "No next episode" is `exists=false`, never an error.
    ///
    /// # Errors
    ///
    /// Only transport/parse failures while resolving the structure.
    #[instrument(level = "debug", skip(self))]
    pub async fn get_next_episode(
        &self,
        player_id: &str,
        season: u32,
        episode: u32,
    ) -> Result<NextEpisodeInfo, CatalogError> {
        self.session.ensure_open()?;
        let entries = self.gateway.series_entries(player_id).await?;
        let data = series::build_series_data(&entries);
        Ok(navigation::next_episode(&data, season, episode))
    }

    /// Downloads one episode variant into `output_dir` (created if absent)
    /// and returns the final file path. Naming is deterministic over the
    /// request, so repeating a download overwrites the same file.
    ///
    /// # Errors
    ///
    /// [`DownloadError::Resolve`] when the (episode, voice, quality) no
    /// longer resolves ([`DownloadError::is_not_found`]) or the provider is
    /// unavailable; [`DownloadError::Stream`]/[`DownloadError::Io`] on
    /// mid-transfer failure.
    #[instrument(level = "debug", skip(self, output_dir))]
    pub async fn download_video(
        &self,
        player_id: &str,
        season: &str,
        episode: &str,
        voice_id: &str,
        quality: u32,
        output_dir: &Path,
    ) -> Result<PathBuf, DownloadError> {
        let request = DownloadRequest::new(player_id, season, episode, voice_id, quality);
        self.download_video_with(&request, output_dir, &DownloadOptions::default())
            .await
    }

    /// [`download_video`](Self::download_video) with progress reporting
    /// and/or cooperative cancellation.
    ///
    /// Cancelling mid-transfer aborts the network read, discards the
    /// temporary file, and returns [`DownloadError::Cancelled`]; nothing
    /// ever appears at the final path.
    ///
    /// # Errors
    ///
    /// As [`download_video`](Self::download_video), plus
    /// [`DownloadError::Cancelled`].
    #[instrument(level = "debug", skip(self, output_dir, options))]
    pub async fn download_video_with(
        &self,
        request: &DownloadRequest,
        output_dir: &Path,
        options: &DownloadOptions,
    ) -> Result<PathBuf, DownloadError> {
        self.session.ensure_open().map_err(CatalogError::from)?;
        download::download_video(&self.gateway, request, output_dir, options).await
    }
}
