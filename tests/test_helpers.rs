//! Shared setup for integration tests: a fast-timer `Config` backed by a
//! real temporary prompt/sound catalog on disk, and a small mpsc receive
//! helper with a sane timeout so a stuck test fails fast instead of hanging.

#![allow(dead_code)]

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use echofest_server::config::{AssetsConfig, Config, GameConfig};
use echofest_server::protocol::messages::ServerMessage;
use echofest_server::server::GameServer;
use tokio::sync::mpsc;

/// Gameplay bounds and timers tuned for tests: every timer is one second so
/// auto-advance paths run in well under the default test timeout, and
/// `min_participants` stays at the production default (3) so judge rotation
/// and non-judge submission still have something to exercise.
pub fn fast_game_config() -> GameConfig {
    GameConfig {
        min_participants: 3,
        max_participants: 8,
        min_rounds: 1,
        max_rounds_limit: 20,
        min_score: 1,
        max_score_limit: 10,
        judge_selection_secs: 1,
        prompt_selection_secs: 1,
        sound_selection_secs: 1,
        reconnection_grace_secs: 1,
        reconnection_vote_secs: 1,
        post_win_celebration_secs: 1,
        auto_winner_audio_delay_secs: 1,
    }
}

/// `AssetCatalog` only reloads from disk; it has no public seeding hook from
/// outside its own module. Write a real catalog to a scratch directory under
/// the OS temp dir instead of faking the read.
pub fn write_test_catalog() -> AssetsConfig {
    let dir = std::env::temp_dir().join(format!("echofest-test-catalog-{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create temp catalog dir");

    let prompts_path = dir.join("prompts.json");
    let sounds_path = dir.join("sounds.json");

    let prompts: Vec<serde_json::Value> = (0..8)
        .map(|i| {
            serde_json::json!({
                "id": format!("prompt-{i}"),
                "text": format!("Test prompt {i}"),
                "category": "general",
                "adult": false,
            })
        })
        .collect();
    let sounds: Vec<serde_json::Value> = (0..16)
        .map(|i| {
            serde_json::json!({
                "id": format!("sound-{i}"),
                "name": format!("Test sound {i}"),
                "category": "general",
                "adult": false,
            })
        })
        .collect();

    fs::write(&prompts_path, serde_json::to_vec(&prompts).unwrap()).expect("write prompt catalog");
    fs::write(&sounds_path, serde_json::to_vec(&sounds).unwrap()).expect("write sound catalog");

    AssetsConfig {
        prompts_path: prompts_path.to_string_lossy().into_owned(),
        sounds_path: sounds_path.to_string_lossy().into_owned(),
        cache_ttl_secs: 300,
    }
}

pub fn test_config() -> Config {
    Config {
        game: fast_game_config(),
        assets: write_test_catalog(),
        ..Config::default()
    }
}

pub fn create_test_server() -> Arc<GameServer> {
    GameServer::new(&test_config())
}

/// Receive the next message on an outbox, failing the test instead of
/// hanging forever if the room actor never sends one.
pub async fn recv(rx: &mut mpsc::Receiver<ServerMessage>) -> ServerMessage {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for a server message")
        .expect("outbox channel closed unexpectedly")
}

/// Receive messages until one matches `predicate`, discarding everything
/// before it. Useful for skipping broadcast noise (e.g. repeated
/// `RoomUpdated` snapshots) while waiting for a specific event.
pub async fn recv_until(
    rx: &mut mpsc::Receiver<ServerMessage>,
    mut predicate: impl FnMut(&ServerMessage) -> bool,
) -> ServerMessage {
    loop {
        let message = recv(rx).await;
        if predicate(&message) {
            return message;
        }
    }
}
