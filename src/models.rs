use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{RankError, Result};
use crate::ranking::pipeline::RecommendOptions;

/// AJG quality rating. `Unrated` covers blank or unrecognised catalog values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Rating {
    Tier1,
    Tier2,
    Tier3,
    Tier4,
    /// The starred top tier ("4*").
    Tier4Star,
    Unrated,
}

impl Rating {
    /// Every rankable tier, lowest first.
    pub const TIERS: [Rating; 5] = [
        Rating::Tier1,
        Rating::Tier2,
        Rating::Tier3,
        Rating::Tier4,
        Rating::Tier4Star,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Tier1 => "1",
            Rating::Tier2 => "2",
            Rating::Tier3 => "3",
            Rating::Tier4 => "4",
            Rating::Tier4Star => "4*",
            Rating::Unrated => "unrated",
        }
    }

    /// Parse a catalog cell. Anything that is not a known tier becomes `Unrated`.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or(Rating::Unrated)
    }

    /// The tier used for scoring. Unrated journals score as the lowest tier
    /// so an unknown rating is never mistaken for a top-tier one.
    pub fn scoring_tier(&self) -> Rating {
        match self {
            Rating::Unrated => Rating::Tier1,
            other => *other,
        }
    }

    fn valid_tokens() -> Vec<String> {
        Self::TIERS.iter().map(|t| t.as_str().to_string()).collect()
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rating {
    type Err = RankError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "1" => Ok(Rating::Tier1),
            "2" => Ok(Rating::Tier2),
            "3" => Ok(Rating::Tier3),
            "4" => Ok(Rating::Tier4),
            // The AJG export encodes 4* as 5.
            "4*" | "5" => Ok(Rating::Tier4Star),
            other => Err(RankError::InvalidRating {
                token: other.to_string(),
                valid: Self::valid_tokens(),
            }),
        }
    }
}

impl From<Rating> for String {
    fn from(r: Rating) -> Self {
        r.as_str().to_string()
    }
}

/// Strict: JSON must carry a tier token or the `unrated` marker written on
/// export. Only the CSV loader is lenient.
impl TryFrom<String> for Rating {
    type Error = RankError;

    fn try_from(s: String) -> Result<Self> {
        if s.trim() == Rating::Unrated.as_str() {
            return Ok(Rating::Unrated);
        }
        s.parse()
    }
}

/// Parse a list of rating tokens such as `["4", "4*"]`, rejecting unknown ones.
pub fn parse_rating_list<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<Rating>> {
    let mut out = Vec::new();
    for token in tokens {
        let token = token.as_ref().trim();
        if token.is_empty() {
            continue;
        }
        let rating: Rating = token.parse()?;
        if !out.contains(&rating) {
            out.push(rating);
        }
    }
    Ok(out)
}

/// Ranking objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Easy,
    #[serde(alias = "fit")]
    Medium,
    #[serde(alias = "value")]
    Hard,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Easy, Mode::Medium, Mode::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Easy => "easy",
            Mode::Medium => "medium",
            Mode::Hard => "hard",
        }
    }

    /// The two adjacent tiers a balanced result for this mode draws from.
    pub fn allowed_tiers(&self) -> [Rating; 2] {
        match self {
            Mode::Easy => [Rating::Tier1, Rating::Tier2],
            Mode::Medium => [Rating::Tier2, Rating::Tier3],
            Mode::Hard => [Rating::Tier4, Rating::Tier4Star],
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = RankError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Mode::Easy),
            "medium" | "fit" => Ok(Mode::Medium),
            "hard" | "value" => Ok(Mode::Hard),
            other => Err(RankError::InvalidMode {
                token: other.to_string(),
            }),
        }
    }
}

/// One journal row from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub name: String,
    pub field: String,
    pub rating: Rating,
    /// Rating in the previous AJG edition, informational only.
    pub previous_rating: Rating,
    pub citescore_rank: Option<u32>,
    pub snip_rank: Option<u32>,
    pub sjr_rank: Option<u32>,
    pub jif_rank: Option<u32>,
    pub sdg_pct: Option<f64>,
    pub intl_pct: Option<f64>,
    pub collab_pct: Option<f64>,
    pub policy_pct: Option<f64>,
}

impl CatalogItem {
    /// A bare item with no auxiliary indicators.
    pub fn new(name: impl Into<String>, field: impl Into<String>, rating: Rating) -> Self {
        Self {
            name: name.into(),
            field: field.into(),
            rating,
            previous_rating: Rating::Unrated,
            citescore_rank: None,
            snip_rank: None,
            sjr_rank: None,
            jif_rank: None,
            sdg_pct: None,
            intl_pct: None,
            collab_pct: None,
            policy_pct: None,
        }
    }

    /// The four percentile-rank indicators, in catalog column order.
    pub fn rank_indicators(&self) -> [Option<u32>; 4] {
        [
            self.citescore_rank,
            self.snip_rank,
            self.sjr_rank,
            self.jif_rank,
        ]
    }
}

/// Parse a rank cell ("12", "12.0", " 7 "). Blank, negative or non-numeric
/// cells are `None`, which scoring treats as the worst rank.
pub fn parse_rank(s: &str) -> Option<u32> {
    let v: f64 = s.trim().parse().ok()?;
    if !v.is_finite() || v < 0.0 || v > u32::MAX as f64 {
        return None;
    }
    Some(v.trunc() as u32)
}

/// Parse a percentage cell, tolerating a trailing `%`.
pub fn parse_pct(s: &str) -> Option<f64> {
    let v: f64 = s.trim().trim_end_matches('%').trim().parse().ok()?;
    v.is_finite().then_some(v)
}

/// A paper to find journals for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub field: String,
    /// Explicit category scope. When empty the scope is derived from `field`.
    #[serde(default)]
    pub field_scope: Vec<String>,
    pub title: String,
    #[serde(default, rename = "abstract")]
    pub abstract_text: String,
    #[serde(default)]
    pub mode: Mode,
    /// Lexicon profile name.
    pub profile: String,
}

impl Query {
    pub fn new(
        field: impl Into<String>,
        title: impl Into<String>,
        abstract_text: impl Into<String>,
        mode: Mode,
    ) -> Self {
        Self {
            field: field.into(),
            field_scope: Vec::new(),
            title: title.into(),
            abstract_text: abstract_text.into(),
            mode,
            profile: crate::ranking::lexicon::DEFAULT_PROFILE.to_string(),
        }
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    pub fn with_field_scope(mut self, scope: Vec<String>) -> Self {
        self.field_scope = scope;
        self
    }

    /// Title and abstract joined, before normalization.
    pub fn text(&self) -> String {
        format!("{} {}", self.title, self.abstract_text)
    }
}

/// Per-journal signals produced by the scoring engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBundle {
    pub fit: f64,
    pub ease: f64,
    pub value: f64,
    pub prestige_penalty: f64,
    pub method_penalty: f64,
    pub domain_bonus: f64,
    pub total: f64,
}

impl ScoreBundle {
    /// Short explanation tags for a recommendation row.
    pub fn reasons(&self, item: &CatalogItem) -> Vec<&'static str> {
        let mut reasons = Vec::new();
        if self.fit >= 2.0 {
            reasons.push("topic-match");
        }
        if self.ease >= 3.0 {
            reasons.push("relatively-easy");
        }
        if item.policy_pct.is_some_and(|p| p > 1.0) {
            reasons.push("policy-relevant");
        }
        if reasons.is_empty() {
            reasons.push("alternative");
        }
        reasons
    }
}

/// Recommend request
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendRequest {
    pub title: String,
    #[serde(default, rename = "abstract")]
    pub abstract_text: String,
    #[serde(default = "default_field")]
    pub field: String,
    #[serde(default)]
    pub field_scope: Option<Vec<String>>,
    #[serde(default)]
    pub mode: Mode,
    /// Lexicon profile; the server default is used when absent.
    pub profile: Option<String>,
    #[serde(default = "default_topk")]
    pub topk: usize,
    /// Explicit rating allow-list, e.g. `["4", "4*"]`.
    pub rating_filter: Option<Vec<String>>,
    #[serde(default)]
    pub rebalance: bool,
    #[serde(default = "default_true")]
    pub exact_balance: bool,
    #[serde(default = "default_true")]
    pub adjacent_fill: bool,
    /// Override for the topic-fit gate width.
    pub gate_width: Option<usize>,
}

fn default_field() -> String {
    "ECON".to_string()
}

fn default_topk() -> usize {
    20
}

fn default_true() -> bool {
    true
}

impl RecommendRequest {
    /// Validate the request and split it into the query and pipeline options.
    pub fn into_parts(self, default_profile: &str) -> Result<(Query, RecommendOptions)> {
        if self.title.trim().is_empty() {
            return Err(RankError::InvalidQuery("title is required".to_string()));
        }
        if self.topk == 0 {
            return Err(RankError::InvalidQuery("topk must be at least 1".to_string()));
        }

        let rating_filter = match &self.rating_filter {
            Some(tokens) => {
                let tiers = parse_rating_list(tokens)?;
                (!tiers.is_empty()).then_some(tiers)
            }
            None => None,
        };

        let query = Query {
            field: self.field.trim().to_string(),
            field_scope: self
                .field_scope
                .unwrap_or_default()
                .into_iter()
                .map(|f| f.trim().to_string())
                .filter(|f| !f.is_empty())
                .collect(),
            title: self.title.trim().to_string(),
            abstract_text: self.abstract_text.trim().to_string(),
            mode: self.mode,
            profile: self
                .profile
                .filter(|p| !p.trim().is_empty())
                .unwrap_or_else(|| default_profile.to_string()),
        };

        let options = RecommendOptions {
            topk: self.topk,
            rating_filter,
            rebalance: self.rebalance,
            exact_balance: self.exact_balance,
            adjacent_fill: self.adjacent_fill,
            gate_width: self.gate_width,
        };

        Ok((query, options))
    }
}
