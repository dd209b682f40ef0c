//! Default value functions for configuration fields.
//!
//! This module contains all the default value functions used by serde's
//! `#[serde(default = ...)]` attributes throughout the configuration system.

use super::logging::LogFormat;

// =============================================================================
// Port & Root Config
// =============================================================================

pub const fn default_port() -> u16 {
    3536
}

// =============================================================================
// Server Defaults
// =============================================================================

pub const fn default_room_cleanup_interval_secs() -> u64 {
    60
}

pub const fn default_max_rooms() -> usize {
    1000
}

pub const fn default_empty_room_timeout_secs() -> u64 {
    300
}

pub fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://localhost:5173".to_string(),
    ]
}

// =============================================================================
// Game Defaults (§3, §4.2, §5 timeouts; §6 settings bounds)
// =============================================================================

pub const fn default_min_participants() -> usize {
    3
}

pub const fn default_max_participants() -> usize {
    8
}

pub const fn default_min_rounds() -> u32 {
    1
}

pub const fn default_max_rounds_limit() -> u32 {
    20
}

pub const fn default_min_score() -> u32 {
    1
}

pub const fn default_max_score_limit() -> u32 {
    10
}

pub const fn default_judge_selection_secs() -> u64 {
    3
}

pub const fn default_prompt_selection_secs() -> u64 {
    30
}

pub const fn default_sound_selection_secs() -> u64 {
    45
}

pub const fn default_reconnection_grace_secs() -> u64 {
    30
}

pub const fn default_reconnection_vote_secs() -> u64 {
    20
}

pub const fn default_post_win_celebration_secs() -> u64 {
    3
}

pub const fn default_auto_winner_audio_delay_secs() -> u64 {
    2
}

// =============================================================================
// Asset Catalog Defaults (§4.1)
// =============================================================================

pub fn default_prompts_path() -> String {
    "assets/prompts.json".to_string()
}

pub fn default_sounds_path() -> String {
    "assets/sounds.json".to_string()
}

pub const fn default_catalog_cache_ttl_secs() -> u64 {
    300
}

// =============================================================================
// Logging Defaults
// =============================================================================

pub fn default_log_dir() -> String {
    "logs".to_string()
}

pub fn default_log_filename() -> String {
    "server.log".to_string()
}

pub fn default_rotation() -> String {
    "daily".to_string()
}

pub const fn default_enable_file_logging() -> bool {
    true
}

pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}

// =============================================================================
// WebSocket Defaults
// =============================================================================

pub const fn default_send_buffer_size() -> usize {
    64
}

pub const fn default_max_message_bytes() -> usize {
    65536
}
