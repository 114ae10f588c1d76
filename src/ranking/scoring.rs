//! Per-journal scoring signals and the mode-weighted total.
//!
//! Six independent signals are computed for every (query, journal) pair:
//!
//! - **fit**: lexicon matches in the paper text, a bonus for preferred
//!   fields, and domain bonuses that require the domain to show up in both
//!   the paper and the journal name
//! - **ease** / **value**: step functions of the AJG tier, mirror images of
//!   each other
//! - **prestige penalty**: top-10 / top-30 percentile ranks on the four
//!   citation indicators
//! - **method penalty**: journal names that read as methods outlets
//! - **domain bonus**: applied-domain journal names, independent of the paper
//!
//! The total is a linear combination whose weights depend only on the mode:
//!
//! ```text
//! total = w_fit·fit + w_ease·ease + w_value·value
//!       − w_prestige·prestige − w_method·method + w_domain·domain
//! ```

use crate::config::RankingParams;
use crate::models::{CatalogItem, Mode, Query, Rating, ScoreBundle};
use crate::ranking::lexicon::Lexicon;
use crate::ranking::normalize::normalize;

/// Fields that receive the flat categorical fit bonus.
pub const PREFERRED_FIELDS: &[&str] = &["ECON", "IB&AREA", "PUB SEC"];
pub const PREFERRED_FIELD_BONUS: f64 = 0.5;

/// A domain that counts for fit only when both the paper and the journal
/// name mention it.
struct QueryDomain {
    query_terms: &'static [&'static str],
    name_terms: &'static [&'static str],
    bonus: f64,
}

const QUERY_DOMAINS: &[QueryDomain] = &[
    // agriculture
    QueryDomain {
        query_terms: &["agricultur", "food", "farm", "crop"],
        name_terms: &["agricultur", "food", "rural", "farm"],
        bonus: 1.0,
    },
    // trade
    QueryDomain {
        query_terms: &["trade", "tariff"],
        name_terms: &["trade", "international economic", "world economy"],
        bonus: 1.0,
    },
    // policy
    QueryDomain {
        query_terms: &["policy", "regulation"],
        name_terms: &["policy", "public"],
        bonus: 0.6,
    },
    // labor
    QueryDomain {
        query_terms: &["labor", "labour", "employment", "wage"],
        name_terms: &["labor", "labour", "employment", "human resource"],
        bonus: 0.8,
    },
    // finance
    QueryDomain {
        query_terms: &["financ", "bank", "credit"],
        name_terms: &["financ", "bank", "money"],
        bonus: 0.8,
    },
];

/// Query-independent bonuses for applied-domain journal names.
const NAME_DOMAINS: &[(&[&str], f64)] = &[
    (&["trade", "policy", "international economic", "world economy"], 0.6),
    (&["agricultur", "food", "rural"], 0.6),
    (&["regional", "urban", "spatial"], 0.4),
    (&["financ", "banking"], 0.3),
];

const HARD_METHOD_TERMS: &[&str] = &[
    "econometric",
    "statistic",
    "method",
    "mathematical",
    "forecasting",
    "time series",
    "operational research",
    "operations research",
];
const SOFT_METHOD_TERMS: &[&str] = &["theory", "theoretical", "philosophy"];
const HARD_METHOD_PENALTY: f64 = 1.0;
const SOFT_METHOD_PENALTY: f64 = 0.5;

/// Signal weights for one mode. Penalty weights are magnitudes and are
/// subtracted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeWeights {
    pub fit: f64,
    pub ease: f64,
    pub value: f64,
    pub prestige: f64,
    pub method: f64,
    pub domain: f64,
}

impl ModeWeights {
    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Easy => Self {
                fit: 1.2,
                ease: 2.0,
                value: 0.0,
                prestige: 1.0,
                method: 0.8,
                domain: 0.6,
            },
            Mode::Medium => Self {
                fit: 1.4,
                ease: 1.0,
                value: 1.0,
                prestige: 0.6,
                method: 0.6,
                domain: 0.6,
            },
            Mode::Hard => Self {
                fit: 1.2,
                ease: 0.2,
                value: 1.4,
                prestige: 0.2,
                method: 0.4,
                domain: 0.4,
            },
        }
    }

    pub fn combine(&self, s: &ScoreBundle) -> f64 {
        self.fit * s.fit + self.ease * s.ease + self.value * s.value
            - self.prestige * s.prestige_penalty
            - self.method * s.method_penalty
            + self.domain * s.domain_bonus
    }
}

/// How easy a tier is to publish in. Decreasing in tier.
pub fn ease(rating: Rating) -> f64 {
    match rating.scoring_tier() {
        Rating::Tier1 => 4.0,
        Rating::Tier2 => 3.0,
        Rating::Tier3 => 2.0,
        Rating::Tier4 => 1.0,
        Rating::Tier4Star => 0.6,
        Rating::Unrated => 4.0,
    }
}

/// How much a publication in a tier is worth. Increasing in tier.
pub fn value(rating: Rating) -> f64 {
    match rating.scoring_tier() {
        Rating::Tier1 => 1.0,
        Rating::Tier2 => 2.0,
        Rating::Tier3 => 3.0,
        Rating::Tier4 => 4.0,
        Rating::Tier4Star => 4.2,
        Rating::Unrated => 1.0,
    }
}

pub fn prestige_penalty(item: &CatalogItem, params: &RankingParams) -> f64 {
    item.rank_indicators()
        .iter()
        .map(|rank| match rank {
            Some(r) if *r <= params.top_rank_cutoff => params.top_rank_penalty,
            Some(r) if *r <= params.high_rank_cutoff => params.high_rank_penalty,
            _ => 0.0,
        })
        .sum()
}

/// Penalty for methods-oriented journals. Takes a normalized name.
pub fn method_penalty(normalized_name: &str) -> f64 {
    if contains_any(normalized_name, HARD_METHOD_TERMS) {
        HARD_METHOD_PENALTY
    } else if contains_any(normalized_name, SOFT_METHOD_TERMS) {
        SOFT_METHOD_PENALTY
    } else {
        0.0
    }
}

/// Bonus for applied-domain journals. Takes a normalized name.
pub fn domain_bonus(normalized_name: &str) -> f64 {
    NAME_DOMAINS
        .iter()
        .filter(|(terms, _)| contains_any(normalized_name, terms))
        .map(|(_, bonus)| bonus)
        .sum()
}

fn contains_any(text: &str, terms: &[&str]) -> bool {
    terms.iter().any(|t| text.contains(t))
}

/// Scores journals against one query.
///
/// The query text, its lexicon score and the set of domains it mentions are
/// computed once; every per-journal call is then a handful of substring
/// checks.
pub struct Scorer<'a> {
    params: &'a RankingParams,
    weights: ModeWeights,
    query_text: String,
    keyword_score: f64,
    active_domains: Vec<&'static QueryDomain>,
}

impl<'a> Scorer<'a> {
    pub fn new(query: &Query, lexicon: &Lexicon, params: &'a RankingParams) -> Self {
        let query_text = normalize(&query.text());
        let keyword_score = lexicon.match_score(&query_text);
        let active_domains = QUERY_DOMAINS
            .iter()
            .filter(|d| contains_any(&query_text, d.query_terms))
            .collect();

        Self {
            params,
            weights: ModeWeights::for_mode(query.mode),
            query_text,
            keyword_score,
            active_domains,
        }
    }

    pub fn query_text(&self) -> &str {
        &self.query_text
    }

    pub fn weights(&self) -> ModeWeights {
        self.weights
    }

    /// Topic fit, independent of the mode.
    pub fn fit(&self, item: &CatalogItem) -> f64 {
        let name = normalize(&item.name);
        self.fit_normalized(item, &name)
    }

    fn fit_normalized(&self, item: &CatalogItem, normalized_name: &str) -> f64 {
        let mut fit = self.keyword_score;
        if PREFERRED_FIELDS.contains(&item.field.as_str()) {
            fit += PREFERRED_FIELD_BONUS;
        }
        for domain in &self.active_domains {
            if contains_any(normalized_name, domain.name_terms) {
                fit += domain.bonus;
            }
        }
        fit
    }

    pub fn score(&self, item: &CatalogItem) -> ScoreBundle {
        let name = normalize(&item.name);
        let fit = self.fit_normalized(item, &name);
        self.bundle(item, &name, fit)
    }

    /// Score with a fit value computed earlier, so the bundle agrees with the
    /// score the gate used.
    pub fn score_with_fit(&self, item: &CatalogItem, fit: f64) -> ScoreBundle {
        let name = normalize(&item.name);
        self.bundle(item, &name, fit)
    }

    fn bundle(&self, item: &CatalogItem, normalized_name: &str, fit: f64) -> ScoreBundle {
        let mut bundle = ScoreBundle {
            fit,
            ease: ease(item.rating),
            value: value(item.rating),
            prestige_penalty: prestige_penalty(item, self.params),
            method_penalty: method_penalty(normalized_name),
            domain_bonus: domain_bonus(normalized_name),
            total: 0.0,
        };
        bundle.total = self.weights.combine(&bundle);
        bundle
    }
}
