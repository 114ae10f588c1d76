//! Keyword lexicons: weighted phrases matched against the query text.
//!
//! Profiles are addressed by name. The `general` profile is compiled in;
//! further profiles come from a JSON file:
//!
//! ```json
//! { "profiles": { "agri": { "agricultur": 2.0, "food security": 1.5 } } }
//! ```
//!
//! A file profile with the same name as a built-in one replaces it.

use anyhow::Context;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{RankError, Result};
use crate::ranking::normalize::normalize;

pub const DEFAULT_PROFILE: &str = "general";

const GENERAL_KEYWORDS: &[(&str, f64)] = &[
    ("tariff", 1.5),
    ("trade", 1.0),
    ("trade war", 2.0),
    ("retaliatory", 2.0),
    ("protection", 1.2),
    ("policy", 0.8),
    ("public opinion", 1.8),
    ("attitudes", 1.2),
    ("beliefs", 1.0),
    ("collectiv", 1.0),
    ("trust", 1.0),
    ("human capital", 1.0),
    ("random", 0.8),
    ("experiment", 1.2),
    ("randomised", 1.2),
    ("randomized", 1.2),
    ("trial", 1.0),
    ("survey", 0.8),
    ("agricultur", 1.5),
    ("food", 1.0),
    ("china", 1.0),
    ("us china", 1.2),
];

/// A named set of weighted phrases. Phrases are stored normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexicon {
    name: String,
    keywords: BTreeMap<String, f64>,
}

impl Lexicon {
    /// Build a lexicon, normalizing phrases and rejecting negative or
    /// non-finite weights.
    pub fn new<I, S>(name: impl Into<String>, keywords: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let name = name.into();
        let mut map = BTreeMap::new();
        for (phrase, weight) in keywords {
            let phrase = normalize(phrase.as_ref());
            if phrase.is_empty() {
                return Err(RankError::InvalidLexicon(format!(
                    "profile '{name}' contains an empty phrase"
                )));
            }
            if !weight.is_finite() || weight < 0.0 {
                return Err(RankError::InvalidLexicon(format!(
                    "profile '{name}': weight for '{phrase}' must be a non-negative number, got {weight}"
                )));
            }
            map.insert(phrase, weight);
        }
        Ok(Self {
            name,
            keywords: map,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.keywords.iter().map(|(k, w)| (k.as_str(), *w))
    }

    /// Sum of weights of every phrase contained in `normalized_text`.
    pub fn match_score(&self, normalized_text: &str) -> f64 {
        self.keywords
            .iter()
            .filter(|(phrase, _)| normalized_text.contains(phrase.as_str()))
            .map(|(_, w)| *w)
            .sum()
    }
}

#[derive(Debug, Deserialize)]
struct LexiconFile {
    profiles: BTreeMap<String, BTreeMap<String, f64>>,
}

/// All lexicon profiles known to the process.
#[derive(Debug, Clone)]
pub struct LexiconRegistry {
    profiles: BTreeMap<String, Lexicon>,
}

impl LexiconRegistry {
    /// Registry holding only the compiled-in profiles.
    pub fn builtin() -> Self {
        let general = Lexicon {
            name: DEFAULT_PROFILE.to_string(),
            keywords: GENERAL_KEYWORDS
                .iter()
                .map(|(phrase, weight)| (normalize(phrase), *weight))
                .collect(),
        };
        let mut profiles = BTreeMap::new();
        profiles.insert(DEFAULT_PROFILE.to_string(), general);
        Self { profiles }
    }

    /// Built-in profiles merged with those in a JSON lexicon file.
    pub fn load_json(path: &Path) -> anyhow::Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read lexicon file {}", path.display()))?;
        let mut registry = Self::builtin();
        registry
            .merge_json(&data)
            .with_context(|| format!("Invalid lexicon file {}", path.display()))?;
        Ok(registry)
    }

    /// Merge profiles from a JSON document into this registry.
    pub fn merge_json(&mut self, json: &str) -> anyhow::Result<()> {
        let file: LexiconFile = serde_json::from_str(json).context("Failed to parse lexicon JSON")?;
        for (name, keywords) in file.profiles {
            let lexicon = Lexicon::new(name.clone(), keywords)?;
            tracing::debug!("Loaded lexicon profile '{}' ({} phrases)", name, lexicon.len());
            self.profiles.insert(name, lexicon);
        }
        Ok(())
    }

    pub fn insert(&mut self, lexicon: Lexicon) {
        self.profiles.insert(lexicon.name().to_string(), lexicon);
    }

    pub fn get(&self, name: &str) -> Result<&Lexicon> {
        self.profiles
            .get(name)
            .ok_or_else(|| RankError::UnknownProfile {
                name: name.to_string(),
                available: self.names(),
            })
    }

    pub fn names(&self) -> Vec<String> {
        self.profiles.keys().cloned().collect()
    }
}

impl Default for LexiconRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
