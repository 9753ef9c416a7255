//! Series reconciliation: heterogeneous per-voice episode lists into one
//! addressable structure.
//!
//! The provider reports one entry per (season, episode, voice) it actually
//! offers; voice coverage is non-uniform and some episodes are missing
//! entirely. Reconciliation keys everything by season number, keeps entries
//! in first-seen order, and represents absence by omission: a season
//! missing a voice or a voice missing an episode simply has no entry.

use std::collections::BTreeMap;

use crate::catalog::StructureEntry;
use crate::model::{EpisodeVoiceEntry, SeasonInfo, SeriesData};

/// Builds [`SeriesData`] from flat structure entries.
///
/// Tie-break rule: when the provider reports the same (season, episode,
/// voice) triple more than once, the first occurrence wins and later
/// duplicates are dropped. Episode entries keep first-seen order and are
/// never renumbered. `available_voices` aggregates voice names across the
/// whole show, first-seen name per voice id.
pub(crate) fn build_series_data(entries: &[StructureEntry]) -> SeriesData {
    let mut seasons: BTreeMap<u32, SeasonInfo> = BTreeMap::new();
    let mut available_voices: BTreeMap<String, String> = BTreeMap::new();
    let mut seen: Vec<(u32, u32, &str)> = Vec::with_capacity(entries.len());

    for entry in entries {
        let triple = (entry.season, entry.episode, entry.voice_id.as_str());
        if seen.contains(&triple) {
            continue;
        }
        seen.push(triple);

        seasons
            .entry(entry.season)
            .or_insert_with(|| SeasonInfo {
                episodes: Vec::new(),
            })
            .episodes
            .push(EpisodeVoiceEntry {
                episode: entry.episode,
                voice_id: entry.voice_id.clone(),
            });

        if !entry.voice_name.is_empty() {
            available_voices
                .entry(entry.voice_id.clone())
                .or_insert_with(|| entry.voice_name.clone());
        }
    }

    SeriesData {
        seasons,
        available_voices,
    }
}
