//! Integration tests for the resolution pipeline: session lifecycle,
//! search, show lookup, series structure, episode/quality resolution, and
//! next-episode navigation against a mock provider.

mod support;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use support::{PLAYER_ID, VOICE_ALT, VOICE_MAIN, mount_catalog, open_client};
use tvgrab::{CatalogError, SessionConfig, SessionError, TvClient};

#[tokio::test]
async fn test_search_returns_deduplicated_results() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    let client = open_client(&server);

    let results = client.search("one piece").await.expect("search succeeds");

    // The fixture lists player 42 twice; dedup keeps first-seen order.
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].player_id, "42");
    assert_eq!(results[0].name, "One Piece");
    assert_eq!(results[1].player_id, "77");
}

#[tokio::test]
async fn test_search_no_matches_is_empty_not_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/catalog/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .mount(&server)
        .await;
    let client = open_client(&server);

    let results = client.search("zzzz").await.expect("empty is valid");
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_search_server_error_is_provider_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/catalog/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let client = open_client(&server);

    let error = client.search("one piece").await.unwrap_err();
    assert!(error.is_provider_unavailable(), "got: {error:?}");
    assert!(!error.is_not_found());
}

#[tokio::test]
async fn test_search_html_body_is_provider_unavailable_not_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/catalog/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;
    let client = open_client(&server);

    let error = client.search("one piece").await.unwrap_err();
    assert!(matches!(error, CatalogError::Payload { .. }), "got: {error:?}");
}

#[tokio::test]
async fn test_reentrant_open_is_state_error() {
    let server = MockServer::start().await;
    let client = open_client(&server);
    assert!(matches!(client.open(), Err(SessionError::AlreadyOpen)));
}

#[tokio::test]
async fn test_calls_after_close_fail_with_session_closed() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    let client = open_client(&server);
    client.close();

    let error = client.search("one piece").await.unwrap_err();
    assert!(matches!(
        error,
        CatalogError::Session(SessionError::Closed)
    ));
}

#[tokio::test]
async fn test_calls_before_open_fail_with_session_closed() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    let client = TvClient::new(SessionConfig::new(server.uri()));

    let error = client.get_series_data(PLAYER_ID).await.unwrap_err();
    assert!(matches!(
        error,
        CatalogError::Session(SessionError::Closed)
    ));
}

#[tokio::test]
async fn test_get_tv_show_under_search_context() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    let client = open_client(&server);

    let show = client
        .get_tv_show("one piece", PLAYER_ID)
        .await
        .expect("show resolves");
    assert_eq!(show.name, "One Piece");
    assert_eq!(show.player_id, PLAYER_ID);
    assert!(show.description.contains("pirate"));
    assert!(show.image_url.starts_with("https://"));
}

#[tokio::test]
async fn test_get_tv_show_unknown_player_is_not_found() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    let client = open_client(&server);

    let error = client.get_tv_show("one piece", "9999").await.unwrap_err();
    assert!(error.is_not_found(), "got: {error:?}");
}

#[tokio::test]
async fn test_series_data_structure_and_counts() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    let client = open_client(&server);

    let series = client
        .get_series_data(PLAYER_ID)
        .await
        .expect("structure resolves");

    assert_eq!(series.seasons.len(), 2);
    // Season 1: three (episode, voice) entries, two distinct episodes.
    assert_eq!(series.seasons[&1].episodes.len(), 3);
    assert_eq!(series.unique_episode_count(1), 2);
    assert_eq!(series.unique_episode_count(2), 1);
    // Both voices visible show-wide.
    assert_eq!(series.available_voices.len(), 2);
    assert_eq!(series.available_voices[VOICE_MAIN], "Original");
    assert_eq!(series.available_voices[VOICE_ALT], "Dubbed");
}

#[tokio::test]
async fn test_series_data_unknown_player_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/player/404000"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let client = open_client(&server);

    let error = client.get_series_data("404000").await.unwrap_err();
    assert!(error.is_not_found(), "got: {error:?}");
}

#[tokio::test]
async fn test_episode_data_one_entry_per_voice() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    let client = open_client(&server);

    let variants = client
        .get_episode_data(PLAYER_ID, "1", "1")
        .await
        .expect("episode resolves");

    assert_eq!(variants.len(), 2);
    assert_eq!(variants[0].voice_id, VOICE_MAIN);
    assert_eq!(variants[0].voice_name, "Original");
    assert_eq!(variants[0].video_id, "v11");
    assert_eq!(variants[0].duration_seconds, 1440);
    assert_eq!((variants[0].season, variants[0].episode), (1, 1));
    assert_eq!(variants[1].voice_id, VOICE_ALT);
}

#[tokio::test]
async fn test_absent_episode_not_found_then_known_pair_succeeds() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    let client = open_client(&server);

    // s1e99 exists under no voice: the expected fallback signal.
    let error = client
        .get_episode_data(PLAYER_ID, "1", "99")
        .await
        .unwrap_err();
    assert!(error.is_not_found(), "got: {error:?}");

    // A pair known present from SeriesData succeeds with a non-empty list.
    let series = client.get_series_data(PLAYER_ID).await.expect("structure");
    let (season, entry) = series
        .seasons
        .iter()
        .find_map(|(season, info)| info.episodes.first().map(|e| (*season, e.episode)))
        .expect("fixture has episodes");
    let variants = client
        .get_episode_data(PLAYER_ID, &season.to_string(), &entry.to_string())
        .await
        .expect("present pair resolves");
    assert!(!variants.is_empty());
}

#[tokio::test]
async fn test_non_numeric_address_is_not_found_not_transport() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    let client = open_client(&server);

    let error = client
        .get_episode_data(PLAYER_ID, "specials", "1")
        .await
        .unwrap_err();
    assert!(error.is_not_found(), "got: {error:?}");
    assert!(!error.is_provider_unavailable());
}

#[tokio::test]
async fn test_available_qualities_sorted_descending_positive() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    let client = open_client(&server);

    let qualities = client
        .get_available_qualities(PLAYER_ID, "1", "1", VOICE_MAIN)
        .await
        .expect("qualities resolve");

    // Two encoded resolutions → exactly two entries, positive, descending.
    assert_eq!(qualities.len(), 2);
    assert_eq!(qualities[0].quality, 720);
    assert_eq!(qualities[1].quality, 480);
    assert!(qualities.iter().all(|q| q.quality > 0));
}

#[tokio::test]
async fn test_available_qualities_unknown_voice_is_not_found() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    let client = open_client(&server);

    let error = client
        .get_available_qualities(PLAYER_ID, "1", "1", "777")
        .await
        .unwrap_err();
    assert!(error.is_not_found(), "got: {error:?}");
}

#[tokio::test]
async fn test_no_servable_encoding_is_quality_unavailable() {
    let server = MockServer::start().await;
    support::mount_structure(&server).await;
    // s1e2 main voice resolves to v12, whose manifest is empty.
    Mock::given(method("GET"))
        .and(path("/video/v12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "variants": [] })))
        .mount(&server)
        .await;
    let client = open_client(&server);

    let error = client
        .get_available_qualities(PLAYER_ID, "1", "2", VOICE_MAIN)
        .await
        .unwrap_err();
    assert!(
        matches!(error, CatalogError::QualityUnavailable { .. }),
        "got: {error:?}"
    );
    assert!(!error.is_not_found());
}

#[tokio::test]
async fn test_next_episode_within_season() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    let client = open_client(&server);

    let next = client
        .get_next_episode(PLAYER_ID, 1, 1)
        .await
        .expect("navigation resolves");
    assert!(next.exists);
    // e2 exists in season 1, so no skipping to season 2.
    assert_eq!((next.season, next.episode), (1, 2));
}

#[tokio::test]
async fn test_next_episode_rolls_over_season_boundary() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    let client = open_client(&server);

    let next = client
        .get_next_episode(PLAYER_ID, 1, 2)
        .await
        .expect("navigation resolves");
    assert!(next.exists);
    assert_eq!((next.season, next.episode), (2, 1));
}

#[tokio::test]
async fn test_next_episode_at_end_of_series_does_not_exist() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    let client = open_client(&server);

    let next = client
        .get_next_episode(PLAYER_ID, 2, 1)
        .await
        .expect("navigation resolves");
    assert!(!next.exists);
}

#[tokio::test]
async fn test_concurrent_lookups_share_one_session() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    let client = open_client(&server);

    let (search, series, episode) = tokio::join!(
        client.search("one piece"),
        client.get_series_data(PLAYER_ID),
        client.get_episode_data(PLAYER_ID, "1", "1"),
    );
    assert!(search.is_ok());
    assert!(series.is_ok());
    assert!(episode.is_ok());
}
