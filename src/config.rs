use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ranking::lexicon::DEFAULT_PROFILE;

const DEFAULT_CATALOG_FILE: &str = "ajg_2024_journals_core_custom.csv";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where the catalog, lexicon file and exported pools live
    pub data_dir: PathBuf,
    /// Server bind address
    pub bind_addr: String,
    /// Catalog CSV; defaults to `<data_dir>/ajg_2024_journals_core_custom.csv`
    pub catalog_path: Option<PathBuf>,
    /// Optional JSON file with extra lexicon profiles
    pub lexicon_path: Option<PathBuf>,
    /// Lexicon profile used when a request names none
    pub default_profile: String,
    /// Tunable gate and scoring constants
    pub ranking: RankingParams,
}

/// Empirical constants of the gate and the prestige penalty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingParams {
    /// Default gate width is `max(topk * gate_multiplier, gate_floor)`
    pub gate_multiplier: usize,
    pub gate_floor: usize,
    /// Smallest candidate set worth ranking: `max(topk, min_viable_floor)`
    pub min_viable_floor: usize,
    /// Gate width multiplier for the single retry after a rating filter
    /// leaves fewer than `topk` journals
    pub expansion_factor: usize,
    /// Rank at or below which an indicator counts as top-tier prestige
    pub top_rank_cutoff: u32,
    /// Rank at or below which an indicator counts as high prestige
    pub high_rank_cutoff: u32,
    pub top_rank_penalty: f64,
    pub high_rank_penalty: f64,
}

impl Default for RankingParams {
    fn default() -> Self {
        Self {
            gate_multiplier: 8,
            gate_floor: 80,
            min_viable_floor: 20,
            expansion_factor: 3,
            top_rank_cutoff: 10,
            high_rank_cutoff: 30,
            top_rank_penalty: 1.2,
            high_rank_penalty: 0.6,
        }
    }
}

impl RankingParams {
    /// Saturates instead of overflowing on very large `topk` or multiplier.
    pub fn default_gate_width(&self, topk: usize) -> usize {
        topk.saturating_mul(self.gate_multiplier).max(self.gate_floor)
    }

    pub fn min_viable(&self, topk: usize) -> usize {
        topk.max(self.min_viable_floor)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            bind_addr: "127.0.0.1:9000".to_string(),
            catalog_path: None,
            lexicon_path: None,
            default_profile: DEFAULT_PROFILE.to_string(),
            ranking: RankingParams::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("JOURNAL_RANK_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(addr) = std::env::var("JOURNAL_RANK_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(path) = std::env::var("JOURNAL_RANK_CATALOG") {
            config.catalog_path = Some(PathBuf::from(path));
        }
        if let Ok(path) = std::env::var("JOURNAL_RANK_LEXICON") {
            config.lexicon_path = Some(PathBuf::from(path));
        }
        if let Ok(profile) = std::env::var("JOURNAL_RANK_PROFILE") {
            if !profile.trim().is_empty() {
                config.default_profile = profile.trim().to_string();
            }
        }

        // Ranking constants
        let r = &mut config.ranking;
        if let Some(v) = env_parse("JOURNAL_RANK_GATE_MULTIPLIER") {
            r.gate_multiplier = v;
        }
        if let Some(v) = env_parse("JOURNAL_RANK_GATE_FLOOR") {
            r.gate_floor = v;
        }
        if let Some(v) = env_parse("JOURNAL_RANK_MIN_VIABLE_FLOOR") {
            r.min_viable_floor = v;
        }
        if let Some(v) = env_parse::<usize>("JOURNAL_RANK_EXPANSION_FACTOR") {
            r.expansion_factor = v.max(1);
        }
        if let Some(v) = env_parse("JOURNAL_RANK_TOP_RANK_CUTOFF") {
            r.top_rank_cutoff = v;
        }
        if let Some(v) = env_parse("JOURNAL_RANK_HIGH_RANK_CUTOFF") {
            r.high_rank_cutoff = v;
        }

        config
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.catalog_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join(DEFAULT_CATALOG_FILE))
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.data_dir.join("reports")
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!("Ignoring {name}={raw:?}: not a valid number");
            None
        }
    }
}
