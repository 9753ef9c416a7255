//! Successor computation over a resolved series structure.

use crate::model::{NextEpisodeInfo, SeriesData};

/// Computes the episode after (season, episode): the next episode number in
/// the same season if the season offers it, otherwise the first entry of
/// season+1 if that season exists (numeric successor; a gap in season
/// numbering ends the series),
/// otherwise nothing.
///
/// "No next episode" and "the current season is unknown" are both expressed
/// as `exists=false`, never as an error; errors are reserved for the
/// transport/parse failures of resolving the structure itself.
pub(crate) fn next_episode(series: &SeriesData, season: u32, episode: u32) -> NextEpisodeInfo {
    let Some(current_season) = series.seasons.get(&season) else {
        return NextEpisodeInfo::none();
    };

    let successor = episode.saturating_add(1);
    if current_season
        .episodes
        .iter()
        .any(|entry| entry.episode == successor)
    {
        return NextEpisodeInfo::found(season, successor);
    }

    let next_season = season.saturating_add(1);
    match series.seasons.get(&next_season).and_then(|info| {
        info.episodes.first().map(|entry| entry.episode)
    }) {
        Some(first) => NextEpisodeInfo::found(next_season, first),
        None => NextEpisodeInfo::none(),
    }
}
