//! End-to-end ranking: scope → candidate filter → topic-fit gate → scoring →
//! rating filter → (re-gate) → optional quota rebalance → top-k.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::config::RankingParams;
use crate::error::Result;
use crate::models::{CatalogItem, Mode, Query, Rating, ScoreBundle};
use crate::ranking::filter::{CandidateFilter, PassThrough};
use crate::ranking::gate::{gate, GatingMeta};
use crate::ranking::lexicon::LexiconRegistry;
use crate::ranking::pool::{CandidatePool, PaperEcho, PoolCandidate, PoolMeta};
use crate::ranking::rebalance::{rebalance, Rated, RebalanceMeta, RebalanceOptions};
use crate::ranking::scoring::Scorer;

/// Per-request knobs of the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendOptions {
    pub topk: usize,
    /// Keep only these tiers. Never relaxed, even when it leaves fewer than
    /// `topk` journals.
    pub rating_filter: Option<Vec<Rating>>,
    pub rebalance: bool,
    pub exact_balance: bool,
    pub adjacent_fill: bool,
    pub gate_width: Option<usize>,
}

impl Default for RecommendOptions {
    fn default() -> Self {
        Self {
            topk: 20,
            rating_filter: None,
            rebalance: false,
            exact_balance: true,
            adjacent_fill: true,
            gate_width: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedJournal {
    pub id: Uuid,
    pub journal: CatalogItem,
    pub scores: ScoreBundle,
    pub reasons: Vec<String>,
}

impl Rated for RankedJournal {
    fn rating(&self) -> Rating {
        self.journal.rating
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub mode: Mode,
    pub profile: String,
    pub field_scope: Vec<String>,
    pub items: Vec<RankedJournal>,
    pub gating: GatingMeta,
    pub rebalance: Option<RebalanceMeta>,
    /// The gate was rerun wider because the rating filter left too few journals
    pub expanded: bool,
    pub warnings: Vec<String>,
}

/// Everything up to and including the rating filter.
struct Shortlist {
    field_scope: Vec<String>,
    ranked: Vec<RankedJournal>,
    gating: GatingMeta,
    expanded: bool,
}

pub struct Pipeline<'a> {
    catalog: &'a Catalog,
    lexicons: &'a LexiconRegistry,
    params: &'a RankingParams,
    filter: &'a dyn CandidateFilter,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        catalog: &'a Catalog,
        lexicons: &'a LexiconRegistry,
        params: &'a RankingParams,
    ) -> Self {
        Self {
            catalog,
            lexicons,
            params,
            filter: &PassThrough,
        }
    }

    pub fn with_filter(mut self, filter: &'a dyn CandidateFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Rank journals for `query`.
    pub fn run(&self, query: &Query, options: &RecommendOptions) -> Result<Recommendation> {
        let shortlist = self.shortlist(query, options)?;
        let available = shortlist.ranked.len();

        let (mut items, rebalance_meta) = if options.rebalance {
            let allowed = match &options.rating_filter {
                Some(tiers) => {
                    let mut tiers = tiers.clone();
                    tiers.sort();
                    tiers
                }
                None => query.mode.allowed_tiers().to_vec(),
            };
            let balanced = rebalance(
                &shortlist.ranked,
                &allowed,
                options.topk,
                query.mode,
                RebalanceOptions {
                    exact_balance: options.exact_balance,
                    adjacent_fill: options.adjacent_fill,
                },
            );
            (balanced.items, Some(balanced.meta))
        } else {
            (shortlist.ranked, None)
        };
        items.truncate(options.topk);

        let mut warnings = Vec::new();
        if query.abstract_text.trim().is_empty() {
            warnings.push("abstract is empty; topic fit relies on the title alone".to_string());
        }
        if shortlist.gating.fallback_used {
            warnings.push(format!(
                "gate width raised to the minimum viable {} journals",
                shortlist.gating.width
            ));
        }
        if items.len() < options.topk {
            warnings.push(format!(
                "only {} journals available for top {}",
                items.len(),
                options.topk
            ));
        }
        for warning in &warnings {
            tracing::warn!("{}", warning);
        }

        tracing::info!(
            "Ranked {} mode={} profile={}: scope {} → gate {} → filtered {} → returned {} (expanded {})",
            query.title,
            query.mode,
            query.profile,
            shortlist.gating.total_before,
            shortlist.gating.total_after,
            available,
            items.len(),
            shortlist.expanded
        );

        Ok(Recommendation {
            mode: query.mode,
            profile: query.profile.clone(),
            field_scope: shortlist.field_scope,
            items,
            gating: shortlist.gating,
            rebalance: rebalance_meta,
            expanded: shortlist.expanded,
            warnings,
        })
    }

    /// Every gated journal that passes the rating filter, for external
    /// selection.
    pub fn candidate_pool(&self, query: &Query, options: &RecommendOptions) -> Result<CandidatePool> {
        let shortlist = self.shortlist(query, options)?;
        let candidates: Vec<PoolCandidate> = shortlist
            .ranked
            .into_iter()
            .map(|r| PoolCandidate {
                id: r.id,
                journal: r.journal.name,
                field: r.journal.field,
                rating: r.journal.rating,
                scores: r.scores,
            })
            .collect();

        Ok(CandidatePool {
            meta: PoolMeta {
                generated_at: Utc::now(),
                mode: query.mode,
                profile: query.profile.clone(),
                field_scope: shortlist.field_scope,
                rating_filter: options.rating_filter.clone(),
                gating: shortlist.gating,
                count: candidates.len(),
                paper: PaperEcho {
                    title: query.title.clone(),
                    abstract_text: query.abstract_text.clone(),
                },
            },
            candidates,
        })
    }

    fn shortlist(&self, query: &Query, options: &RecommendOptions) -> Result<Shortlist> {
        let lexicon = self.lexicons.get(&query.profile)?;
        let field_scope = self.catalog.resolve_scope(query)?;

        let in_scope = self.catalog.scoped(&field_scope);
        let scoped_count = in_scope.len();
        let items = self.filter.narrow(query, in_scope);
        tracing::debug!(
            "Scope {:?}: {} journals, {} after filter '{}'",
            field_scope,
            scoped_count,
            items.len(),
            self.filter.name()
        );

        let scorer = Scorer::new(query, lexicon, self.params);
        let (mut gating, mut ranked) = self.gate_and_score(&items, &scorer, options, options.gate_width);

        let mut expanded = false;
        if ranked.len() < options.topk && gating.total_after < gating.total_before {
            let wider = gating.width.saturating_mul(self.params.expansion_factor);
            tracing::debug!(
                "{} journals after rating filter, regating at width {}",
                ranked.len(),
                wider
            );
            (gating, ranked) = self.gate_and_score(&items, &scorer, options, Some(wider));
            expanded = true;
        }

        Ok(Shortlist {
            field_scope,
            ranked,
            gating,
            expanded,
        })
    }

    /// Gate, score the survivors, sort by total and apply the rating filter.
    fn gate_and_score(
        &self,
        items: &[&CatalogItem],
        scorer: &Scorer<'_>,
        options: &RecommendOptions,
        width: Option<usize>,
    ) -> (GatingMeta, Vec<RankedJournal>) {
        let gated = gate(items, scorer, options.topk, width, self.params);

        let mut ranked: Vec<RankedJournal> = gated
            .candidates
            .iter()
            .map(|c| {
                let scores = scorer.score_with_fit(c.item, c.fit);
                RankedJournal {
                    id: c.id,
                    journal: c.item.clone(),
                    reasons: scores.reasons(c.item).into_iter().map(String::from).collect(),
                    scores,
                }
            })
            .collect();

        // Stable: equal totals keep gate order.
        ranked.sort_by(|a, b| {
            b.scores
                .total
                .partial_cmp(&a.scores.total)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        if let Some(tiers) = &options.rating_filter {
            ranked.retain(|r| tiers.contains(&r.journal.rating));
        }

        (gated.meta, ranked)
    }
}
