//! Candidate pool export and selection validation.
//!
//! A pool is every gated journal that passed the rating filter, with its full
//! score bundle, written to JSON for an external selection step. The selection
//! that comes back (easy/medium/hard buckets of `{journal, topic}`) must be a
//! strict subset of the pool; [`validate_selection`] reports every way it is
//! not.

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;
use uuid::Uuid;

use crate::models::{CatalogItem, Mode, Rating, ScoreBundle};
use crate::ranking::gate::GatingMeta;
use crate::ranking::normalize::normalize;

/// Deterministic id for a journal entry: UUID v5 over
/// `"{field}|{rating}|{normalized name}"` in the OID namespace.
pub fn derive_id(field: &str, rating: Rating, name: &str) -> Uuid {
    let key = format!("{}|{}|{}", field, rating, normalize(name));
    Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes())
}

pub fn stable_id(item: &CatalogItem) -> Uuid {
    derive_id(&item.field, item.rating, &item.name)
}

/// The paper a pool was generated for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperEcho {
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolMeta {
    pub generated_at: DateTime<Utc>,
    pub mode: Mode,
    pub profile: String,
    pub field_scope: Vec<String>,
    pub rating_filter: Option<Vec<Rating>>,
    pub gating: GatingMeta,
    pub count: usize,
    pub paper: PaperEcho,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolCandidate {
    pub id: Uuid,
    pub journal: String,
    pub field: String,
    pub rating: Rating,
    #[serde(flatten)]
    pub scores: ScoreBundle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidatePool {
    pub meta: PoolMeta,
    pub candidates: Vec<PoolCandidate>,
}

impl CandidatePool {
    /// File name used for a mode's pool under the reports directory.
    pub fn file_name(mode: Mode) -> String {
        format!("candidate_pool_{}.json", mode.as_str())
    }

    /// Write the pool as pretty JSON (atomic write via temp file + rename).
    pub fn write_json(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
        let data = serde_json::to_string_pretty(self).context("Failed to serialize pool")?;
        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, data)
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("Failed to move pool into {}", path.display()))?;
        tracing::info!("Wrote {} candidates to {}", self.candidates.len(), path.display());
        Ok(())
    }

    pub fn read_json(path: &Path) -> anyhow::Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read pool {}", path.display()))?;
        serde_json::from_str(&data).with_context(|| format!("Invalid pool JSON in {}", path.display()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionMeta {
    /// Allow the same journal to appear in more than one bucket.
    #[serde(default)]
    pub allow_overlap: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionItem {
    pub journal: String,
    /// Why the journal fits the paper.
    #[serde(default)]
    pub topic: String,
}

/// Journals picked from a pool, one bucket per mode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    #[serde(default)]
    pub meta: SelectionMeta,
    #[serde(default)]
    pub easy: Vec<SelectionItem>,
    #[serde(default)]
    pub medium: Vec<SelectionItem>,
    #[serde(default)]
    pub hard: Vec<SelectionItem>,
}

impl Selection {
    pub fn buckets(&self) -> [(Mode, &[SelectionItem]); 3] {
        [
            (Mode::Easy, self.easy.as_slice()),
            (Mode::Medium, self.medium.as_slice()),
            (Mode::Hard, self.hard.as_slice()),
        ]
    }
}

/// One reason a selection is not a valid subset of its pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    NotInPool { bucket: Mode, journal: String },
    EmptyTopic { bucket: Mode, journal: String },
    TooFew { bucket: Mode, count: usize, min: usize },
    Overlap { journal: String, buckets: Vec<Mode> },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::NotInPool { bucket, journal } => {
                write!(f, "{bucket}: '{journal}' is not in the candidate pool")
            }
            Violation::EmptyTopic { bucket, journal } => {
                write!(f, "{bucket}: '{journal}' has an empty topic")
            }
            Violation::TooFew { bucket, count, min } => {
                write!(f, "{bucket}: {count} journals selected, need at least {min}")
            }
            Violation::Overlap { journal, buckets } => {
                let names: Vec<&str> = buckets.iter().map(Mode::as_str).collect();
                write!(f, "'{journal}' appears in several buckets: {}", names.join(", "))
            }
        }
    }
}

/// Journal names compare equal regardless of runs of whitespace.
fn name_key(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Check `selection` against `pool`. An empty result means the selection is
/// valid.
pub fn validate_selection(
    pool: &CandidatePool,
    selection: &Selection,
    min_items: usize,
) -> Vec<Violation> {
    let known: HashSet<String> = pool.candidates.iter().map(|c| name_key(&c.journal)).collect();
    let mut violations = Vec::new();
    let mut seen: BTreeMap<String, (String, Vec<Mode>)> = BTreeMap::new();

    for (bucket, items) in selection.buckets() {
        if items.len() < min_items {
            violations.push(Violation::TooFew {
                bucket,
                count: items.len(),
                min: min_items,
            });
        }
        for item in items {
            let key = name_key(&item.journal);
            if !known.contains(&key) {
                violations.push(Violation::NotInPool {
                    bucket,
                    journal: item.journal.clone(),
                });
            }
            if item.topic.trim().is_empty() {
                violations.push(Violation::EmptyTopic {
                    bucket,
                    journal: item.journal.clone(),
                });
            }
            let entry = seen
                .entry(key)
                .or_insert_with(|| (item.journal.clone(), Vec::new()));
            if !entry.1.contains(&bucket) {
                entry.1.push(bucket);
            }
        }
    }

    if !selection.meta.allow_overlap {
        for (_, (journal, buckets)) in seen {
            if buckets.len() > 1 {
                violations.push(Violation::Overlap { journal, buckets });
            }
        }
    }

    violations
}
