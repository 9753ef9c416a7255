//! Provider payload shapes and parsing.
//!
//! The provider addresses seasons, episodes, and voices loosely: numbers
//! arrive as JSON numbers or digit strings depending on endpoint age, voice
//! names and durations are sometimes omitted. The deserializers here
//! normalize all of that into one typed form so the rest of the crate never
//! sees the looseness: season/episode land in the `u32` key domain, ids
//! land in `String`.

use serde::{Deserialize, Deserializer};

use super::error::CatalogError;

/// One search hit as the provider reports it.
#[derive(Debug, Deserialize)]
pub(crate) struct WireSearchEntry {
    pub name: String,
    #[serde(deserialize_with = "string_or_number")]
    pub player_id: String,
}

#[derive(Debug, Deserialize)]
struct SearchPayload {
    results: Vec<WireSearchEntry>,
}

/// Show metadata payload.
#[derive(Debug, Deserialize)]
pub(crate) struct WireShow {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(deserialize_with = "string_or_number")]
    pub player_id: String,
}

/// One (season, episode, voice) offering, flattened from the structure
/// payload in provider order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StructureEntry {
    pub season: u32,
    pub episode: u32,
    pub voice_id: String,
    pub voice_name: String,
    pub video_id: String,
    pub duration_seconds: u64,
}

#[derive(Debug, Deserialize)]
struct StructurePayload {
    seasons: Vec<WireSeason>,
}

#[derive(Debug, Deserialize)]
struct WireSeason {
    #[serde(deserialize_with = "numeric_address")]
    season: u32,
    episodes: Vec<WireEpisode>,
}

#[derive(Debug, Deserialize)]
struct WireEpisode {
    #[serde(deserialize_with = "numeric_address")]
    episode: u32,
    #[serde(deserialize_with = "string_or_number")]
    voice_id: String,
    #[serde(default)]
    voice_name: String,
    #[serde(deserialize_with = "string_or_number")]
    video_id: String,
    #[serde(default)]
    duration: u64,
}

/// One encoded quality variant of a stream.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireVariant {
    pub quality: u32,
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct VariantsPayload {
    variants: Vec<WireVariant>,
}

/// Accepts `"123"` or `123` and yields the canonical string form.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }
    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}

/// Accepts `7` or `"7"` and yields the canonical numeric form. Non-numeric
/// strings are a payload defect, not a missing entity.
fn numeric_address<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
    }
    match Raw::deserialize(deserializer)? {
        Raw::Number(number) => Ok(number),
        Raw::Text(text) => text.trim().parse::<u32>().map_err(|_| {
            serde::de::Error::custom(format!("non-numeric season/episode address: {text:?}"))
        }),
    }
}

/// Parses a search payload into entries (provider order preserved).
pub(crate) fn parse_search(url: &str, body: &str) -> Result<Vec<WireSearchEntry>, CatalogError> {
    let payload: SearchPayload =
        serde_json::from_str(body).map_err(|e| CatalogError::payload(url, e.to_string()))?;
    Ok(payload.results)
}

/// Parses a show payload.
pub(crate) fn parse_show(url: &str, body: &str) -> Result<WireShow, CatalogError> {
    serde_json::from_str(body).map_err(|e| CatalogError::payload(url, e.to_string()))
}

/// Parses a structure payload into flat entries, provider order preserved
/// across seasons and within each season.
pub(crate) fn parse_structure(url: &str, body: &str) -> Result<Vec<StructureEntry>, CatalogError> {
    let payload: StructurePayload =
        serde_json::from_str(body).map_err(|e| CatalogError::payload(url, e.to_string()))?;
    let mut entries = Vec::new();
    for season in payload.seasons {
        for episode in season.episodes {
            entries.push(StructureEntry {
                season: season.season,
                episode: episode.episode,
                voice_id: episode.voice_id,
                voice_name: episode.voice_name,
                video_id: episode.video_id,
                duration_seconds: episode.duration,
            });
        }
    }
    Ok(entries)
}

/// Parses a variants payload.
pub(crate) fn parse_variants(url: &str, body: &str) -> Result<Vec<WireVariant>, CatalogError> {
    let payload: VariantsPayload =
        serde_json::from_str(body).map_err(|e| CatalogError::payload(url, e.to_string()))?;
    Ok(payload.variants)
}
