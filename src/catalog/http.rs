//! HTTP implementation of the provider seam.
//!
//! Endpoint layout (JSON wire format):
//! - `POST {base}/catalog/search` with `{"query": ...}` → search payload
//! - `GET {base}/show/{player_id}` → show payload
//! - `GET {base}/player/{player_id}` → series structure payload
//! - `GET {base}/video/{locator}` → quality variants payload
//! - `GET {base}/video/{locator}/stream?quality={q}` → media bytes
//!
//! All requests go through the owning [`Session`]'s pooled client, so a
//! closed session fails every call with a lifecycle error before any I/O.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::StreamExt;
use serde_json::json;
use tracing::{debug, instrument};

use crate::session::Session;

use super::error::CatalogError;
use super::provider::{CatalogProvider, StreamHandle};

/// reqwest-backed catalog provider.
pub struct HttpCatalogProvider {
    session: Arc<Session>,
    base_url: String,
}

impl HttpCatalogProvider {
    /// Creates a provider speaking to the session's configured base URL.
    #[must_use]
    pub fn new(session: Arc<Session>) -> Self {
        let base_url = session.config().base_url.trim_end_matches('/').to_string();
        Self { session, base_url }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Issues a GET for an addressable entity; 404 means the address does
    /// not exist, any other non-success status means the provider is broken.
    async fn get_entity(&self, url: &str, entity: &str) -> Result<String, CatalogError> {
        let client = self.session.handle()?;
        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| map_send_error(url, e))?;
        let status = response.status();
        if status.as_u16() == 404 {
            return Err(CatalogError::not_found(format!(
                "{entity} is unknown to the provider"
            )));
        }
        if !status.is_success() {
            return Err(CatalogError::status(url, status.as_u16()));
        }
        response
            .text()
            .await
            .map_err(|e| CatalogError::network(url, e))
    }
}

impl std::fmt::Debug for HttpCatalogProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCatalogProvider")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CatalogProvider for HttpCatalogProvider {
    #[instrument(level = "debug", skip(self))]
    async fn search_raw(&self, query: &str) -> Result<String, CatalogError> {
        let url = self.endpoint("catalog/search");
        let client = self.session.handle()?;
        let response = client
            .post(&url)
            .json(&json!({ "query": query }))
            .send()
            .await
            .map_err(|e| map_send_error(&url, e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::status(&url, status.as_u16()));
        }
        response
            .text()
            .await
            .map_err(|e| CatalogError::network(&url, e))
    }

    #[instrument(level = "debug", skip(self))]
    async fn fetch_show(&self, player_id: &str) -> Result<String, CatalogError> {
        let url = self.endpoint(&format!("show/{player_id}"));
        self.get_entity(&url, &format!("show {player_id}")).await
    }

    #[instrument(level = "debug", skip(self))]
    async fn fetch_series_structure(&self, player_id: &str) -> Result<String, CatalogError> {
        let url = self.endpoint(&format!("player/{player_id}"));
        self.get_entity(&url, &format!("series structure of {player_id}"))
            .await
    }

    #[instrument(level = "debug", skip(self))]
    async fn fetch_variants(&self, locator: &str) -> Result<String, CatalogError> {
        let url = self.endpoint(&format!("video/{locator}"));
        self.get_entity(&url, &format!("stream {locator}")).await
    }

    #[instrument(level = "debug", skip(self))]
    async fn fetch_stream(
        &self,
        locator: &str,
        quality: u32,
    ) -> Result<StreamHandle, CatalogError> {
        let url = self.endpoint(&format!("video/{locator}/stream?quality={quality}"));
        let client = self.session.handle()?;
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| map_send_error(&url, e))?;
        let status = response.status();
        if status.as_u16() == 404 {
            return Err(CatalogError::not_found(format!(
                "stream {locator} at {quality}p no longer resolves"
            )));
        }
        if !status.is_success() {
            return Err(CatalogError::status(&url, status.as_u16()));
        }

        let content_length = response.content_length();
        debug!(url = %url, content_length = ?content_length, "stream opened");

        let chunk_url = url.clone();
        let stream = response
            .bytes_stream()
            .map(move |chunk| chunk.map_err(|e| map_send_error(&chunk_url, e)))
            .boxed();

        Ok(StreamHandle {
            content_length,
            stream,
        })
    }
}

/// Maps a reqwest send/body error to the transport taxonomy.
fn map_send_error(url: &str, error: reqwest::Error) -> CatalogError {
    if error.is_timeout() {
        CatalogError::timeout(url)
    } else {
        CatalogError::network(url, error)
    }
}
