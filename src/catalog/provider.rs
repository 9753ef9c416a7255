//! The provider seam: the one interface the upstream catalog is spoken
//! through.
//!
//! Everything above this trait works with typed entities; everything below
//! it is provider protocol. Implementations return raw payload text (the
//! gateway owns parsing), except for [`CatalogProvider::fetch_stream`],
//! which hands back a byte stream for the download engine.

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;

use super::error::CatalogError;

/// Ordered chunk stream of a media download.
pub type ByteStream = BoxStream<'static, Result<Bytes, CatalogError>>;

/// An open media stream plus the metadata the download engine needs.
pub struct StreamHandle {
    /// Total stream size in bytes when the provider reports it.
    pub content_length: Option<u64>,
    /// The chunk stream itself.
    pub stream: ByteStream,
}

impl std::fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamHandle")
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Upstream catalog operations, as the core depends on them.
///
/// # Object Safety
///
/// This trait uses `async_trait` to support dynamic dispatch via
/// `Arc<dyn CatalogProvider>`. Rust 2024 native async traits are not
/// object-safe, so `async_trait` is required for the gateway seam.
///
/// # Error contract
///
/// Transport and protocol failures map to the provider-unavailable class of
/// [`CatalogError`]. A 404 on an addressable entity (show, structure,
/// variants, stream) maps to [`CatalogError::VideoNotFound`]: the address
/// space is live but this address is not, including the race where a
/// stream resolved moments ago is gone at download time.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Runs a free-text search and returns the raw results payload.
    async fn search_raw(&self, query: &str) -> Result<String, CatalogError>;

    /// Fetches the raw metadata payload for one show.
    async fn fetch_show(&self, player_id: &str) -> Result<String, CatalogError>;

    /// Fetches the raw season/episode/voice structure payload for one show.
    async fn fetch_series_structure(&self, player_id: &str) -> Result<String, CatalogError>;

    /// Fetches the raw quality-variant manifest for one stream locator.
    async fn fetch_variants(&self, locator: &str) -> Result<String, CatalogError>;

    /// Opens the media stream for a locator at a specific quality.
    async fn fetch_stream(&self, locator: &str, quality: u32)
    -> Result<StreamHandle, CatalogError>;
}
