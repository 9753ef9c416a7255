//! Catalog gateway: typed access to the upstream provider.
//!
//! This module is the only place provider protocol is spoken or parsed.
//! It translates library-level requests into provider requests and parses
//! provider payloads into the entities of [`crate::model`].
//!
//! # Architecture
//!
//! - [`CatalogProvider`] - Async trait the upstream is accessed through
//! - [`HttpCatalogProvider`] - reqwest implementation over a [`crate::session::Session`]
//! - [`CatalogGateway`] - Parsing and search-context rules on top of a provider
//! - [`CatalogError`] - Transport/not-found/quality taxonomy

mod error;
mod http;
mod provider;
mod wire;

pub use error::CatalogError;
pub use http::HttpCatalogProvider;
pub use provider::{ByteStream, CatalogProvider, StreamHandle};

pub(crate) use wire::{StructureEntry, WireVariant};

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::model::{SearchResult, TvShow};

/// Typed front of the catalog provider.
///
/// Stateless beyond the provider handle; every call fetches fresh data.
#[derive(Clone)]
pub struct CatalogGateway {
    provider: Arc<dyn CatalogProvider>,
}

impl CatalogGateway {
    /// Creates a gateway over any provider implementation.
    #[must_use]
    pub fn new(provider: Arc<dyn CatalogProvider>) -> Self {
        Self { provider }
    }

    /// Searches the catalog. An empty result list is a valid non-error
    /// outcome (no matches); duplicated player ids are dropped first-seen.
    ///
    /// # Errors
    ///
    /// Returns a provider-unavailable class [`CatalogError`] on transport or
    /// payload failure.
    #[instrument(level = "debug", skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, CatalogError> {
        let body = self.provider.search_raw(query).await?;
        let entries = wire::parse_search("catalog/search", &body)?;

        let mut results: Vec<SearchResult> = Vec::with_capacity(entries.len());
        for entry in entries {
            if results.iter().any(|r| r.player_id == entry.player_id) {
                continue;
            }
            results.push(SearchResult {
                name: entry.name,
                player_id: entry.player_id,
            });
        }
        debug!(count = results.len(), "search completed");
        Ok(results)
    }

    /// Fetches show metadata for a player id under its originating search
    /// context. The provider's show lookup is scoped by query, not globally
    /// addressable, so the id must appear in that query's results.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::VideoNotFound`] when the player id is not
    /// among the query's results, and provider-unavailable errors on
    /// transport/payload failure.
    #[instrument(level = "debug", skip(self))]
    pub async fn get_tv_show(&self, query: &str, player_id: &str) -> Result<TvShow, CatalogError> {
        let results = self.search(query).await?;
        if !results.iter().any(|r| r.player_id == player_id) {
            return Err(CatalogError::not_found(format!(
                "player {player_id} not found in search results for {query:?}"
            )));
        }

        let body = self.provider.fetch_show(player_id).await?;
        let show = wire::parse_show(&format!("show/{player_id}"), &body)?;
        Ok(TvShow {
            name: show.name,
            description: show.description,
            image_url: show.image_url,
            player_id: show.player_id,
        })
    }

    /// Fetches and parses the flat structure entries for a show, provider
    /// order preserved.
    pub(crate) async fn series_entries(
        &self,
        player_id: &str,
    ) -> Result<Vec<StructureEntry>, CatalogError> {
        let body = self.provider.fetch_series_structure(player_id).await?;
        wire::parse_structure(&format!("player/{player_id}"), &body)
    }

    /// Fetches and parses the quality variants of a stream locator.
    pub(crate) async fn variants(&self, locator: &str) -> Result<Vec<WireVariant>, CatalogError> {
        let body = self.provider.fetch_variants(locator).await?;
        wire::parse_variants(&format!("video/{locator}"), &body)
    }

    /// Opens the media stream for a locator at a quality.
    pub(crate) async fn open_stream(
        &self,
        locator: &str,
        quality: u32,
    ) -> Result<StreamHandle, CatalogError> {
        self.provider.fetch_stream(locator, quality).await
    }
}

impl std::fmt::Debug for CatalogGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogGateway").finish_non_exhaustive()
    }
}
