//! Asset catalog configuration (§4.1): where prompt/sound catalogs live on
//! disk and how long the parsed form is cached.

use super::defaults::{
    default_catalog_cache_ttl_secs, default_prompts_path, default_sounds_path,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AssetsConfig {
    /// Path to the flat prompt catalog file.
    #[serde(default = "default_prompts_path")]
    pub prompts_path: String,
    /// Path to the flat sound catalog file.
    #[serde(default = "default_sounds_path")]
    pub sounds_path: String,
    /// How long the parsed catalog is cached before a re-read is attempted
    /// (seconds).
    #[serde(default = "default_catalog_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            prompts_path: default_prompts_path(),
            sounds_path: default_sounds_path(),
            cache_ttl_secs: default_catalog_cache_ttl_secs(),
        }
    }
}
