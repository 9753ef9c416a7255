//! Shared fixtures for integration tests: a mock catalog provider with one
//! show ("One Piece", player 42) spanning two seasons and two voices.
#![allow(dead_code)] // not every test binary uses every fixture

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tvgrab::{SessionConfig, TvClient};

/// Player id of the fixture show.
pub const PLAYER_ID: &str = "42";

/// Voice offering every episode of the fixture show.
pub const VOICE_MAIN: &str = "152";

/// Voice offering only season 1 episode 1.
pub const VOICE_ALT: &str = "9";

/// Locator of s1e1 in the main voice.
pub const VIDEO_S1E1_MAIN: &str = "v11";

/// Bytes served by the fixture stream endpoint.
pub const STREAM_BODY: &[u8] = b"FAKE-MP4 PAYLOAD: not a real container, just stable test bytes";

/// Creates an opened client pointed at the mock server.
pub fn open_client(server: &MockServer) -> TvClient {
    init_tracing();
    let client = TvClient::new(SessionConfig::new(server.uri()));
    client.open().expect("session opens");
    client
}

/// Opt-in test logging: `RUST_LOG=tvgrab=debug cargo test -- --nocapture`.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Mounts the search endpoint answering every query with the fixture show
/// (listed twice to exercise dedup) plus a second show.
pub async fn mount_search(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/catalog/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"name": "One Piece", "player_id": 42},
                {"name": "One Piece", "player_id": "42"},
                {"name": "One Piece: Stampede", "player_id": "77"}
            ]
        })))
        .mount(server)
        .await;
}

/// Mounts the show metadata endpoint for the fixture show.
pub async fn mount_show(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(format!("/show/{PLAYER_ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "One Piece",
            "description": "A pirate crew searches for the ultimate treasure.",
            "image_url": "https://cdn.test/one-piece.jpg",
            "player_id": PLAYER_ID
        })))
        .mount(server)
        .await;
}

/// Mounts the series structure: season 1 has episodes 1 (two voices) and 2
/// (main voice only), season 2 has episode 1 (main voice only).
pub async fn mount_structure(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(format!("/player/{PLAYER_ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "seasons": [
                {"season": "1", "episodes": [
                    {"episode": 1, "voice_id": VOICE_MAIN, "voice_name": "Original", "video_id": VIDEO_S1E1_MAIN, "duration": 1440},
                    {"episode": 1, "voice_id": VOICE_ALT, "voice_name": "Dubbed", "video_id": "v11b", "duration": 1440},
                    {"episode": 2, "voice_id": VOICE_MAIN, "voice_name": "Original", "video_id": "v12", "duration": 1452}
                ]},
                {"season": 2, "episodes": [
                    {"episode": 1, "voice_id": VOICE_MAIN, "voice_name": "Original", "video_id": "v21", "duration": 1501}
                ]}
            ]
        })))
        .mount(server)
        .await;
}

/// Mounts the variants manifest for s1e1 main voice: 480p and 720p.
pub async fn mount_variants(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(format!("/video/{VIDEO_S1E1_MAIN}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "variants": [
                {"quality": 480, "url": "https://cdn.test/v11/480"},
                {"quality": 720, "url": "https://cdn.test/v11/720"}
            ]
        })))
        .mount(server)
        .await;
}

/// Mounts the 720p stream bytes for s1e1 main voice.
pub async fn mount_stream(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(format!("/video/{VIDEO_S1E1_MAIN}/stream")))
        .and(query_param("quality", "720"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(STREAM_BODY))
        .mount(server)
        .await;
}

/// Mounts the full fixture catalog.
pub async fn mount_catalog(server: &MockServer) {
    mount_search(server).await;
    mount_show(server).await;
    mount_structure(server).await;
    mount_variants(server).await;
    mount_stream(server).await;
}
