//! Episode and quality resolution.
//!
//! Addresses arrive in display form (digit strings) and are normalized to
//! the numeric key domain here; a string that cannot address anything fails
//! as not-found, the same signal as a missing episode, and never as a
//! transport error.

use tracing::debug;

use crate::catalog::{CatalogError, CatalogGateway};
use crate::model::{EpisodeData, Quality};

/// Parses a display-form season/episode address (decimal digits, optional
/// surrounding whitespace) into the canonical numeric form.
pub(crate) fn parse_address(field: &str, value: &str) -> Result<u32, CatalogError> {
    value.trim().parse::<u32>().map_err(|_| {
        CatalogError::not_found(format!("{field} {value:?} does not address any episode"))
    })
}

/// Resolves the playable variants of one episode: one [`EpisodeData`] per
/// voice offering it, in provider order.
///
/// # Errors
///
/// [`CatalogError::VideoNotFound`] when no voice offers the pair, the
/// expected "episode absent" signal callers branch on.
pub(crate) async fn episode_data(
    gateway: &CatalogGateway,
    player_id: &str,
    season: &str,
    episode: &str,
) -> Result<Vec<EpisodeData>, CatalogError> {
    let season = parse_address("season", season)?;
    let episode = parse_address("episode", episode)?;

    let entries = gateway.series_entries(player_id).await?;
    let mut variants: Vec<EpisodeData> = Vec::new();
    for entry in &entries {
        if entry.season != season || entry.episode != episode {
            continue;
        }
        if variants.iter().any(|v| v.voice_id == entry.voice_id) {
            continue;
        }
        variants.push(EpisodeData {
            voice_id: entry.voice_id.clone(),
            voice_name: entry.voice_name.clone(),
            video_id: entry.video_id.clone(),
            duration_seconds: entry.duration_seconds,
            season,
            episode,
        });
    }

    if variants.is_empty() {
        return Err(CatalogError::not_found(format!(
            "episode s{season}e{episode} of player {player_id} is not offered by any voice"
        )));
    }
    debug!(
        player_id,
        season,
        episode,
        voices = variants.len(),
        "episode resolved"
    );
    Ok(variants)
}

/// Resolves the stream locator for a (season, episode, voice) triple.
///
/// # Errors
///
/// [`CatalogError::VideoNotFound`] when the pair exists under no voice, or
/// under other voices but not the requested one.
pub(crate) async fn resolve_stream_source(
    gateway: &CatalogGateway,
    player_id: &str,
    season: u32,
    episode: u32,
    voice_id: &str,
) -> Result<String, CatalogError> {
    let entries = gateway.series_entries(player_id).await?;
    let mut pair_offered = false;
    for entry in &entries {
        if entry.season != season || entry.episode != episode {
            continue;
        }
        pair_offered = true;
        if entry.voice_id == voice_id {
            return Ok(entry.video_id.clone());
        }
    }

    Err(if pair_offered {
        CatalogError::not_found(format!(
            "voice {voice_id} does not offer episode s{season}e{episode} of player {player_id}"
        ))
    } else {
        CatalogError::not_found(format!(
            "episode s{season}e{episode} of player {player_id} is not offered by any voice"
        ))
    })
}

/// Resolves the encoded quality options of a (season, episode, voice)
/// stream, deduplicated by resolution and sorted descending.
///
/// # Errors
///
/// [`CatalogError::VideoNotFound`] when the triple yields no stream;
/// [`CatalogError::QualityUnavailable`] when the stream exists but nothing
/// is currently servable.
pub(crate) async fn available_qualities(
    gateway: &CatalogGateway,
    player_id: &str,
    season: &str,
    episode: &str,
    voice_id: &str,
) -> Result<Vec<Quality>, CatalogError> {
    let season = parse_address("season", season)?;
    let episode = parse_address("episode", episode)?;

    let video_id = resolve_stream_source(gateway, player_id, season, episode, voice_id).await?;
    let variants = gateway.variants(&video_id).await?;
    if variants.is_empty() {
        return Err(CatalogError::quality_unavailable(
            player_id, season, episode, voice_id,
        ));
    }

    let mut qualities: Vec<Quality> = Vec::with_capacity(variants.len());
    for variant in &variants {
        if qualities.iter().any(|q| q.quality == variant.quality) {
            continue;
        }
        qualities.push(Quality {
            quality: variant.quality,
        });
    }
    qualities.sort_by(|a, b| b.quality.cmp(&a.quality));
    Ok(qualities)
}
