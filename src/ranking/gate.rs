//! Topic-fit gate: the first-stage filter that keeps only topically relevant
//! journals before full scoring.
//!
//! The gate ignores the objective mode. Every in-scope journal is scored for
//! fit alone, sorted (stable, so catalog order breaks ties), and the top
//! `width` survive. Journals outside the gate can never be recommended no
//! matter how easy or valuable they are.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::RankingParams;
use crate::models::CatalogItem;
use crate::ranking::pool::stable_id;
use crate::ranking::scoring::Scorer;

pub const GATE_STRATEGY: &str = "topic_fit_topn";

/// A journal that passed the gate, with the fit score that got it there.
#[derive(Debug, Clone)]
pub struct GatedCandidate<'a> {
    pub id: Uuid,
    pub item: &'a CatalogItem,
    pub fit: f64,
}

/// Gate bookkeeping surfaced to reports and pool exports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GatingMeta {
    pub strategy: String,
    pub total_before: usize,
    pub total_after: usize,
    /// Width actually applied, after any fallback raise
    pub width: usize,
    pub min_viable: usize,
    pub fallback_used: bool,
}

#[derive(Debug, Clone)]
pub struct GatingResult<'a> {
    /// Survivors in descending fit order. Each carries its id and the fit
    /// it was gated on, so later stages reuse that fit instead of rescoring.
    pub candidates: Vec<GatedCandidate<'a>>,
    pub meta: GatingMeta,
}

impl GatingResult<'_> {
    fn empty() -> Self {
        Self {
            candidates: Vec::new(),
            meta: GatingMeta {
                strategy: GATE_STRATEGY.to_string(),
                ..Default::default()
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Narrow `items` to the journals that best fit the query.
///
/// `width_override` replaces the default `max(topk * multiplier, floor)`. A
/// width below `max(topk, min_viable_floor)` is raised to that minimum and
/// flagged as a fallback.
pub fn gate<'a>(
    items: &[&'a CatalogItem],
    scorer: &Scorer<'_>,
    topk: usize,
    width_override: Option<usize>,
    params: &RankingParams,
) -> GatingResult<'a> {
    if items.is_empty() {
        return GatingResult::empty();
    }

    let mut scored: Vec<GatedCandidate<'a>> = items
        .iter()
        .map(|&item| GatedCandidate {
            id: stable_id(item),
            item,
            fit: scorer.fit(item),
        })
        .collect();

    // Vec::sort_by is stable: equal fits keep catalog order.
    scored.sort_by(|a, b| {
        b.fit
            .partial_cmp(&a.fit)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let min_viable = params.min_viable(topk);
    let mut width = width_override.unwrap_or_else(|| params.default_gate_width(topk));
    let mut fallback_used = false;
    if width < min_viable {
        width = min_viable;
        fallback_used = true;
    }

    let total_before = scored.len();
    scored.truncate(width);

    tracing::debug!(
        "Gate kept {}/{} journals (width {}, fallback {})",
        scored.len(),
        total_before,
        width,
        fallback_used
    );

    GatingResult {
        meta: GatingMeta {
            strategy: GATE_STRATEGY.to_string(),
            total_before,
            total_after: scored.len(),
            width,
            min_viable,
            fallback_used,
        },
        candidates: scored,
    }
}
