//! Streaming download of a resolved episode to local storage.
//!
//! The write path is temp-file-then-rename: bytes stream into
//! `<final>.part` and the final name appears only after the last byte is
//! flushed, so a failed or cancelled download never leaves a
//! partially-named final file. Final names are deterministic over
//! (player, season, episode, voice, quality), making re-downloads
//! overwrite instead of accumulate.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::StreamExt;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::catalog::{CatalogGateway, StreamHandle};
use crate::episode;

use super::error::DownloadError;

/// Receives opportunistic progress reports during a download.
///
/// `bytes_downloaded` is cumulative; `total_bytes` is present when the
/// provider reports a content length. Implementations must not block.
pub trait ProgressObserver: Send + Sync {
    /// Called after each chunk is written.
    fn on_progress(&self, bytes_downloaded: u64, total_bytes: Option<u64>);
}

/// What to download: one (episode, voice, quality) address.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    /// Show identifier from search.
    pub player_id: String,
    /// Season in display form (digit string).
    pub season: String,
    /// Episode in display form (digit string).
    pub episode: String,
    /// Voice track id, previously resolved.
    pub voice_id: String,
    /// Vertical resolution to fetch.
    pub quality: u32,
}

impl DownloadRequest {
    /// Creates a request for one episode variant.
    #[must_use]
    pub fn new(
        player_id: impl Into<String>,
        season: impl Into<String>,
        episode: impl Into<String>,
        voice_id: impl Into<String>,
        quality: u32,
    ) -> Self {
        Self {
            player_id: player_id.into(),
            season: season.into(),
            episode: episode.into(),
            voice_id: voice_id.into(),
            quality,
        }
    }
}

/// Optional download behavior: progress reporting and cancellation.
///
/// The defaults change nothing: no observer, a token that never fires.
#[derive(Default, Clone)]
pub struct DownloadOptions {
    /// Progress sink, if any.
    pub observer: Option<Arc<dyn ProgressObserver>>,
    /// Cooperative cancellation token, if the caller wants to abort.
    pub cancel: Option<CancellationToken>,
}

impl std::fmt::Debug for DownloadOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadOptions")
            .field("has_observer", &self.observer.is_some())
            .field("has_cancel", &self.cancel.is_some())
            .finish()
    }
}

/// Downloads the requested stream into `output_dir`, creating the directory
/// if absent, and returns the final file path.
#[instrument(level = "debug", skip(gateway, options), fields(player_id = %request.player_id))]
pub(crate) async fn download_video(
    gateway: &CatalogGateway,
    request: &DownloadRequest,
    output_dir: &Path,
    options: &DownloadOptions,
) -> Result<PathBuf, DownloadError> {
    let season = episode::parse_address("season", &request.season)?;
    let episode_number = episode::parse_address("episode", &request.episode)?;

    let video_id = episode::resolve_stream_source(
        gateway,
        &request.player_id,
        season,
        episode_number,
        &request.voice_id,
    )
    .await?;

    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|e| DownloadError::io(output_dir, e))?;

    let final_path = output_dir.join(video_filename(
        &request.player_id,
        season,
        episode_number,
        &request.voice_id,
        request.quality,
    ));
    let temp_path = temp_path_for(&final_path);
    let cancel = options.cancel.clone().unwrap_or_default();

    let handle = tokio::select! {
        biased;
        () = cancel.cancelled() => return Err(DownloadError::Cancelled),
        handle = gateway.open_stream(&video_id, request.quality) => handle?,
    };
    debug!(path = %final_path.display(), video_id = %video_id, "download starting");

    let mut file = File::create(&temp_path)
        .await
        .map_err(|e| DownloadError::io(temp_path.clone(), e))?;

    let stream_result = stream_to_file(
        &mut file,
        handle,
        &temp_path,
        options.observer.as_deref(),
        &cancel,
    )
    .await;

    let bytes_written = match stream_result {
        Ok(bytes) => bytes,
        Err(error) => {
            // Never leave a partial artifact behind, whatever the failure.
            drop(file);
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(error);
        }
    };

    drop(file);
    tokio::fs::rename(&temp_path, &final_path)
        .await
        .map_err(|e| DownloadError::io(final_path.clone(), e))?;

    info!(
        path = %final_path.display(),
        bytes = bytes_written,
        "download complete"
    );
    Ok(final_path)
}

/// Streams all chunks into the file in arrival order, returning bytes
/// written. Chunk N is written only after chunk N is fully read; the
/// cancellation token is polled between chunks and aborts the network read.
async fn stream_to_file(
    file: &mut File,
    handle: StreamHandle,
    temp_path: &Path,
    observer: Option<&dyn ProgressObserver>,
    cancel: &CancellationToken,
) -> Result<u64, DownloadError> {
    let total_bytes = handle.content_length;
    let mut stream = handle.stream;
    let mut writer = BufWriter::new(file);
    let mut bytes_written: u64 = 0;

    loop {
        let next_chunk = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!(path = %temp_path.display(), "download cancelled mid-stream");
                return Err(DownloadError::Cancelled);
            }
            chunk = stream.next() => chunk,
        };

        let Some(chunk_result) = next_chunk else {
            break;
        };
        let chunk = chunk_result.map_err(DownloadError::stream)?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(temp_path, e))?;

        bytes_written += chunk.len() as u64;
        if let Some(observer) = observer {
            observer.on_progress(bytes_written, total_bytes);
        }
    }

    // Ensure all data is flushed to disk before the rename makes it visible.
    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(temp_path, e))?;

    Ok(bytes_written)
}

/// Deterministic final filename for one episode variant.
pub(crate) fn video_filename(
    player_id: &str,
    season: u32,
    episode: u32,
    voice_id: &str,
    quality: u32,
) -> String {
    format!(
        "{}_s{:02}e{:02}_{}_{}p.mp4",
        sanitize_component(player_id),
        season,
        episode,
        sanitize_component(voice_id),
        quality
    )
}

/// The in-progress sibling of a final path.
fn temp_path_for(final_path: &Path) -> PathBuf {
    let mut name = final_path.as_os_str().to_os_string();
    name.push(".part");
    PathBuf::from(name)
}

/// Keeps opaque ids filesystem-safe: alphanumerics, `-` and `_` pass
/// through, everything else becomes `-`.
fn sanitize_component(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}
