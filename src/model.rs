//! Catalog domain entities.
//!
//! Every type here is an immutable value object: created fresh per call,
//! identity is its fields, freely shareable across concurrent callers. None
//! of them hold a reference back to the client or the session.

use std::collections::BTreeMap;

use serde::Serialize;

/// One show match produced by a catalog search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    /// Display name of the show as the provider lists it.
    pub name: String,
    /// Opaque provider-assigned identifier; required for all per-show calls.
    pub player_id: String,
}

/// Snapshot of a show's public metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TvShow {
    /// Show title.
    pub name: String,
    /// Catalog description text.
    pub description: String,
    /// Absolute URL of the cover image.
    pub image_url: String,
    /// The identifier this snapshot was fetched for.
    pub player_id: String,
}

/// Full season/episode/voice structure of a show.
///
/// Seasons and voices absent upstream are absent here, never null placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesData {
    /// Season number → per-season episode/voice entries.
    pub seasons: BTreeMap<u32, SeasonInfo>,
    /// Voice id → voice display name, across the whole show.
    pub available_voices: BTreeMap<String, String>,
}

/// Episode/voice entries of a single season, in first-seen provider order.
///
/// An entry exists per (episode, voice) combination actually offered, so the
/// same episode number repeats once per voice track. Deduplicating by episode
/// number recovers the true episode count; grouping by voice id recovers the
/// voice count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonInfo {
    /// Ordered (episode, voice) offerings; never renumbered.
    pub episodes: Vec<EpisodeVoiceEntry>,
}

/// One (episode, voice) offering inside a season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EpisodeVoiceEntry {
    /// Episode number in the provider's display numbering.
    pub episode: u32,
    /// Voice track offering this episode.
    pub voice_id: String,
}

/// One playable (episode, voice) variant with its stream locator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EpisodeData {
    /// Voice track id.
    pub voice_id: String,
    /// Voice track display name.
    pub voice_name: String,
    /// Opaque stream locator consumed by quality resolution and download.
    pub video_id: String,
    /// Episode duration in seconds (0 when the provider omits it).
    pub duration_seconds: u64,
    /// Season this variant belongs to.
    pub season: u32,
    /// Episode this variant belongs to.
    pub episode: u32,
}

/// An encoded resolution variant of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quality {
    /// Vertical resolution, e.g. 720.
    pub quality: u32,
}

/// Successor of a (season, episode) pair in a show's structure.
///
/// `season`/`episode` carry no meaning while `exists` is false.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NextEpisodeInfo {
    /// Whether a next episode exists.
    pub exists: bool,
    /// Season of the next episode.
    pub season: u32,
    /// Episode number of the next episode.
    pub episode: u32,
}

impl NextEpisodeInfo {
    /// A successor at the given address.
    #[must_use]
    pub fn found(season: u32, episode: u32) -> Self {
        Self {
            exists: true,
            season,
            episode,
        }
    }

    /// End of series, or the current address did not resolve.
    #[must_use]
    pub fn none() -> Self {
        Self {
            exists: false,
            season: 0,
            episode: 0,
        }
    }
}

impl SeriesData {
    /// Number of distinct episodes in a season (entries deduplicated by
    /// episode number), or 0 for an unknown season.
    #[must_use]
    pub fn unique_episode_count(&self, season: u32) -> usize {
        self.seasons.get(&season).map_or(0, |info| {
            let mut seen: Vec<u32> = Vec::new();
            for entry in &info.episodes {
                if !seen.contains(&entry.episode) {
                    seen.push(entry.episode);
                }
            }
            seen.len()
        })
    }
}
