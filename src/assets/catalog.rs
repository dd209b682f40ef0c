//! In-memory prompt/sound catalog, loaded from flat JSON files on disk and
//! cached for a bounded duration (§4.1).

use std::collections::HashSet;
use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::warn;

use super::normalize::normalize_name;
use crate::config::AssetsConfig;
use crate::protocol::types::{PromptId, SoundId};

/// A sampled prompt. Immutable once constructed (§3 Prompt).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub id: PromptId,
    pub display_text: String,
    pub category: String,
    pub adult: bool,
}

/// A sampled sound effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sound {
    pub id: SoundId,
    pub name: String,
    pub category: Option<String>,
    pub adult: bool,
}

#[derive(Debug, Deserialize)]
struct PromptEntryRaw {
    id: Option<String>,
    text: Option<String>,
    #[serde(default)]
    category: String,
    #[serde(default)]
    adult: bool,
}

#[derive(Debug, Deserialize)]
struct SoundEntryRaw {
    id: Option<String>,
    name: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    adult: bool,
}

#[derive(Default)]
struct CatalogState {
    prompts: Vec<Prompt>,
    sounds: Vec<Sound>,
    loaded_at: Option<Instant>,
}

/// Loads and samples from the prompt/sound catalogs. Reads are cached for
/// `cache_ttl_secs`; sampling fails soft when the backing pool is empty.
pub struct AssetCatalog {
    config: AssetsConfig,
    state: RwLock<CatalogState>,
}

impl AssetCatalog {
    pub fn new(config: AssetsConfig) -> Self {
        Self {
            config,
            state: RwLock::new(CatalogState::default()),
        }
    }

    async fn ensure_fresh(&self) {
        {
            let state = self.state.read().await;
            if let Some(loaded_at) = state.loaded_at {
                if loaded_at.elapsed() < Duration::from_secs(self.config.cache_ttl_secs) {
                    return;
                }
            }
        }

        let prompts = load_prompts(&self.config.prompts_path);
        let sounds = load_sounds(&self.config.sounds_path);

        let mut state = self.state.write().await;
        state.prompts = prompts;
        state.sounds = sounds;
        state.loaded_at = Some(Instant::now());
    }

    /// Sample `n` prompts, excluding `used`, optionally filtering adult
    /// content. Falls back to the full (filtered) pool if the exclusion set
    /// would leave fewer than `n`.
    pub async fn sample_prompts(
        &self,
        n: usize,
        used: &HashSet<PromptId>,
        allow_adult: bool,
    ) -> Vec<Prompt> {
        self.ensure_fresh().await;
        let state = self.state.read().await;

        let filtered: Vec<&Prompt> = state
            .prompts
            .iter()
            .filter(|p| allow_adult || !p.adult)
            .collect();

        let fresh: Vec<&Prompt> = filtered
            .iter()
            .copied()
            .filter(|p| !used.contains(&p.id))
            .collect();

        let pool = if fresh.len() >= n { &fresh } else { &filtered };
        sample_distinct(pool, n).into_iter().cloned().collect()
    }

    /// Sample `n` sounds, optionally restricted to a category, optionally
    /// filtering adult content.
    pub async fn sample_sounds(
        &self,
        n: usize,
        category: Option<&str>,
        allow_adult: bool,
    ) -> Vec<Sound> {
        self.ensure_fresh().await;
        let state = self.state.read().await;

        let pool: Vec<&Sound> = state
            .sounds
            .iter()
            .filter(|s| allow_adult || !s.adult)
            .filter(|s| category.is_none_or(|c| s.category.as_deref() == Some(c)))
            .collect();

        sample_distinct(&pool, n).into_iter().cloned().collect()
    }
}

fn sample_distinct<'a, T>(pool: &[&'a T], n: usize) -> Vec<&'a T> {
    if pool.is_empty() || n == 0 {
        return Vec::new();
    }
    let mut rng = rand::rng();
    let take = n.min(pool.len());
    let mut indices: Vec<usize> = (0..pool.len()).collect();
    indices.shuffle(&mut rng);
    indices.truncate(take);
    indices.into_iter().map(|i| pool[i]).collect()
}

fn load_prompts(path: &str) -> Vec<Prompt> {
    let raw = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            warn!(path, error = %err, "failed to read prompt catalog, serving empty pool");
            return Vec::new();
        }
    };

    let entries: Vec<PromptEntryRaw> = match serde_json::from_str(&raw) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(path, error = %err, "failed to parse prompt catalog, serving empty pool");
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    let mut prompts = Vec::new();
    for entry in entries {
        let (Some(id), Some(text)) = (entry.id, entry.text) else {
            continue;
        };
        let display_text = normalize_name(&text);
        if id.trim().is_empty() || display_text.is_empty() {
            continue;
        }
        let dedup_key = display_text.to_lowercase();
        if !seen.insert(dedup_key) {
            continue;
        }
        prompts.push(Prompt {
            id,
            display_text,
            category: entry.category,
            adult: entry.adult,
        });
    }
    prompts
}

fn load_sounds(path: &str) -> Vec<Sound> {
    let raw = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            warn!(path, error = %err, "failed to read sound catalog, serving empty pool");
            return Vec::new();
        }
    };

    let entries: Vec<SoundEntryRaw> = match serde_json::from_str(&raw) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(path, error = %err, "failed to parse sound catalog, serving empty pool");
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    let mut sounds = Vec::new();
    for entry in entries {
        let (Some(id), Some(name)) = (entry.id, entry.name) else {
            continue;
        };
        let display_name = normalize_name(&name);
        if id.trim().is_empty() || display_name.is_empty() {
            continue;
        }
        let dedup_key = display_name.to_lowercase();
        if !seen.insert(dedup_key) {
            continue;
        }
        sounds.push(Sound {
            id,
            name: display_name,
            category: entry.category,
            adult: entry.adult,
        });
    }
    sounds
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn catalog_with(prompts: Vec<Prompt>, sounds: Vec<Sound>) -> AssetCatalog {
        let catalog = AssetCatalog::new(AssetsConfig {
            prompts_path: "/nonexistent/prompts.json".into(),
            sounds_path: "/nonexistent/sounds.json".into(),
            cache_ttl_secs: 300,
        });
        // Seed state directly to avoid touching the filesystem in tests.
        let state = CatalogState {
            prompts,
            sounds,
            loaded_at: Some(Instant::now()),
        };
        *catalog.state.write().await = state;
        catalog
    }

    fn prompt(id: &str, adult: bool) -> Prompt {
        Prompt {
            id: id.into(),
            display_text: format!("Prompt {id}"),
            category: "general".into(),
            adult,
        }
    }

    #[tokio::test]
    async fn sampling_excludes_used_when_enough_remain() {
        let catalog = catalog_with(
            (0..10).map(|i| prompt(&i.to_string(), false)).collect(),
            Vec::new(),
        ).await;
        let used: HashSet<PromptId> = ["0".into(), "1".into()].into_iter().collect();
        let sampled = catalog.sample_prompts(6, &used, true).await;
        assert_eq!(sampled.len(), 6);
        assert!(sampled.iter().all(|p| !used.contains(&p.id)));
    }

    #[tokio::test]
    async fn sampling_falls_back_to_full_pool_when_exclusion_too_large() {
        let catalog = catalog_with(
            (0..5).map(|i| prompt(&i.to_string(), false)).collect(),
            Vec::new(),
        ).await;
        let used: HashSet<PromptId> = (0..5).map(|i| i.to_string()).collect();
        let sampled = catalog.sample_prompts(6, &used, true).await;
        assert_eq!(sampled.len(), 5);
    }

    #[tokio::test]
    async fn adult_filter_excludes_flagged_entries() {
        let catalog = catalog_with(vec![prompt("safe", false), prompt("spicy", true)], Vec::new()).await;
        let sampled = catalog.sample_prompts(2, &HashSet::new(), false).await;
        assert_eq!(sampled.len(), 1);
        assert_eq!(sampled[0].id, "safe");
    }

    #[tokio::test]
    async fn empty_pool_samples_empty() {
        let catalog = catalog_with(Vec::new(), Vec::new()).await;
        assert!(catalog.sample_prompts(6, &HashSet::new(), true).await.is_empty());
        assert!(catalog.sample_sounds(10, None, true).await.is_empty());
    }
}
