//! Quota rebalancer: reshape a ranked list so each allowed rating tier is
//! represented as evenly as the candidates allow.
//!
//! Pipeline:
//! 1. Bucket the ranked list by tier (tiers outside the allowed set are ignored).
//! 2. Plan a quota per tier: an even split of the target, remainder to the
//!    first tiers. Best-effort plans cap each quota by availability and hand
//!    the surplus round-robin to tiers that still have spare journals.
//! 3. Draw each tier's quota from the front of its bucket.
//! 4. Adjacent fill: a tier that could not meet its quota borrows from its
//!    neighbours in allowed order (next tier first, then previous).
//! 5. Round-robin top-up from whatever is left until the target is reached.
//!
//! Rank order inside a tier is never changed, and nothing is invented: the
//! output is always a subset of the input.

use serde::{Deserialize, Serialize};

use crate::models::{CatalogItem, Mode, Rating};

/// Anything that carries an AJG rating.
pub trait Rated {
    fn rating(&self) -> Rating;
}

impl Rated for CatalogItem {
    fn rating(&self) -> Rating {
        self.rating
    }
}

impl<T: Rated> Rated for &T {
    fn rating(&self) -> Rating {
        (**self).rating()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebalanceOptions {
    /// Plan quotas without looking at availability, so shortfalls go to
    /// adjacent fill instead of being redistributed up front.
    pub exact_balance: bool,
    pub adjacent_fill: bool,
}

impl Default for RebalanceOptions {
    fn default() -> Self {
        Self {
            exact_balance: true,
            adjacent_fill: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierQuota {
    pub tier: Rating,
    pub quota: usize,
}

/// Target count per tier, in allowed-tier order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaPlan {
    pub tiers: Vec<TierQuota>,
}

impl QuotaPlan {
    /// Even split of `target`; the remainder goes to the first tiers.
    pub fn exact(target: usize, tiers: &[Rating]) -> Self {
        Self {
            tiers: even_split(target, tiers.len())
                .into_iter()
                .zip(tiers)
                .map(|(quota, &tier)| TierQuota { tier, quota })
                .collect(),
        }
    }

    /// Even split capped by `available`, with the surplus redistributed
    /// round-robin to tiers that have spare journals.
    pub fn best_effort(target: usize, tiers: &[Rating], available: &[usize]) -> Self {
        let mut quotas: Vec<usize> = even_split(target, tiers.len())
            .into_iter()
            .zip(available)
            .map(|(q, &avail)| q.min(avail))
            .collect();

        let mut leftover = target.saturating_sub(quotas.iter().sum());
        while leftover > 0 {
            let mut progressed = false;
            for (quota, &avail) in quotas.iter_mut().zip(available) {
                if leftover == 0 {
                    break;
                }
                if *quota < avail {
                    *quota += 1;
                    leftover -= 1;
                    progressed = true;
                }
            }
            if !progressed {
                break;
            }
        }

        Self {
            tiers: tiers
                .iter()
                .zip(quotas)
                .map(|(&tier, quota)| TierQuota { tier, quota })
                .collect(),
        }
    }

    pub fn quota(&self, tier: Rating) -> usize {
        self.tiers
            .iter()
            .find(|t| t.tier == tier)
            .map(|t| t.quota)
            .unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.tiers.iter().map(|t| t.quota).sum()
    }
}

fn even_split(target: usize, parts: usize) -> Vec<usize> {
    if parts == 0 {
        return Vec::new();
    }
    let base = target / parts;
    let rem = target % parts;
    (0..parts).map(|i| base + usize::from(i < rem)).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierOutcome {
    pub tier: Rating,
    pub available: usize,
    pub quota: usize,
    pub achieved: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebalanceMeta {
    pub mode: Mode,
    pub target: usize,
    pub exact_balance: bool,
    pub tiers: Vec<TierOutcome>,
    pub adjacent_filled: bool,
    pub insufficient_total_candidates: bool,
    pub selected: usize,
}

impl RebalanceMeta {
    pub fn achieved(&self, tier: Rating) -> usize {
        self.tiers
            .iter()
            .find(|t| t.tier == tier)
            .map(|t| t.achieved)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub struct Rebalanced<T> {
    /// Selected items in draw order
    pub items: Vec<T>,
    pub meta: RebalanceMeta,
}

/// Select up to `target` items from `ranked`, balanced across `allowed` tiers.
pub fn rebalance<T: Rated + Clone>(
    ranked: &[T],
    allowed: &[Rating],
    target: usize,
    mode: Mode,
    options: RebalanceOptions,
) -> Rebalanced<T> {
    let mut tiers: Vec<Rating> = Vec::with_capacity(allowed.len());
    for &tier in allowed {
        if !tiers.contains(&tier) {
            tiers.push(tier);
        }
    }

    // Indices into `ranked`, rank order preserved.
    let buckets: Vec<Vec<usize>> = tiers
        .iter()
        .map(|&tier| {
            ranked
                .iter()
                .enumerate()
                .filter(|(_, item)| item.rating() == tier)
                .map(|(i, _)| i)
                .collect()
        })
        .collect();
    let available: Vec<usize> = buckets.iter().map(Vec::len).collect();
    let total_available: usize = available.iter().sum();

    let plan = if options.exact_balance {
        QuotaPlan::exact(target, &tiers)
    } else {
        QuotaPlan::best_effort(target, &tiers, &available)
    };

    let mut picked: Vec<usize> = Vec::with_capacity(target.min(total_available));
    let mut cursor = vec![0usize; tiers.len()];

    for (i, bucket) in buckets.iter().enumerate() {
        let take = plan.tiers[i].quota.min(bucket.len());
        picked.extend_from_slice(&bucket[..take]);
        cursor[i] = take;
    }

    let mut adjacent_filled = false;
    if options.adjacent_fill {
        let own: Vec<usize> = cursor.clone();
        for i in 0..tiers.len() {
            let mut shortfall = plan.tiers[i].quota - own[i];
            for j in neighbours(i, tiers.len()) {
                while shortfall > 0 && cursor[j] < buckets[j].len() && picked.len() < target {
                    picked.push(buckets[j][cursor[j]]);
                    cursor[j] += 1;
                    shortfall -= 1;
                    adjacent_filled = true;
                }
            }
        }
    }

    while picked.len() < target {
        let mut progressed = false;
        for (i, bucket) in buckets.iter().enumerate() {
            if picked.len() >= target {
                break;
            }
            if cursor[i] < bucket.len() {
                picked.push(bucket[cursor[i]]);
                cursor[i] += 1;
                progressed = true;
            }
        }
        if !progressed {
            break;
        }
    }

    let items: Vec<T> = picked.iter().map(|&i| ranked[i].clone()).collect();

    let outcomes = tiers
        .iter()
        .enumerate()
        .map(|(i, &tier)| TierOutcome {
            tier,
            available: available[i],
            quota: plan.tiers[i].quota,
            achieved: items.iter().filter(|it| it.rating() == tier).count(),
        })
        .collect();

    let insufficient_total_candidates = total_available < target;
    if insufficient_total_candidates {
        tracing::debug!(
            "Rebalance short of target: {} available across {:?}, wanted {}",
            total_available,
            tiers,
            target
        );
    }

    Rebalanced {
        meta: RebalanceMeta {
            mode,
            target,
            exact_balance: options.exact_balance,
            tiers: outcomes,
            adjacent_filled,
            insufficient_total_candidates,
            selected: items.len(),
        },
        items,
    }
}

/// Neighbouring tier positions: the next tier first, then the previous one.
fn neighbours(i: usize, len: usize) -> impl Iterator<Item = usize> {
    let next = (i + 1 < len).then_some(i + 1);
    let prev = i.checked_sub(1);
    next.into_iter().chain(prev)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Pick {
        id: usize,
        tier: Rating,
    }

    impl Rated for Pick {
        fn rating(&self) -> Rating {
            self.tier
        }
    }

    /// `counts[t]` journals for each of the first four tiers, interleaved so
    /// that every tier is spread across the ranking.
    fn ranked(counts: [usize; 4]) -> Vec<Pick> {
        let mut out = Vec::new();
        let mut remaining = counts;
        while remaining.iter().any(|&c| c > 0) {
            for (t, left) in remaining.iter_mut().enumerate() {
                if *left > 0 {
                    out.push(Pick {
                        id: out.len(),
                        tier: Rating::TIERS[t],
                    });
                    *left -= 1;
                }
            }
        }
        out
    }

    fn count(items: &[Pick], tier: Rating) -> usize {
        items.iter().filter(|p| p.tier == tier).count()
    }

    #[test]
    fn test_exact_plan_remainder_goes_first() {
        let tiers = [Rating::Tier2, Rating::Tier3];
        let plan = QuotaPlan::exact(5, &tiers);
        assert_eq!(plan.quota(Rating::Tier2), 3);
        assert_eq!(plan.quota(Rating::Tier3), 2);
        assert_eq!(plan.total(), 5);
        assert!(QuotaPlan::exact(5, &[]).tiers.is_empty());
    }

    #[test]
    fn test_best_effort_plan_redistributes() {
        let tiers = [Rating::Tier1, Rating::Tier2, Rating::Tier3];
        let plan = QuotaPlan::best_effort(12, &tiers, &[1, 10, 3]);
        assert_eq!(plan.quota(Rating::Tier1), 1);
        assert_eq!(plan.quota(Rating::Tier3), 3);
        assert_eq!(plan.quota(Rating::Tier2), 8);

        let short = QuotaPlan::best_effort(12, &tiers, &[1, 2, 3]);
        assert_eq!(short.total(), 6);
    }

    #[test]
    fn test_balanced_split_five_and_five() {
        let input = ranked([25, 25, 25, 25]);
        let out = rebalance(
            &input,
            &Mode::Easy.allowed_tiers(),
            10,
            Mode::Easy,
            RebalanceOptions::default(),
        );
        assert_eq!(out.items.len(), 10);
        assert_eq!(count(&out.items, Rating::Tier1), 5);
        assert_eq!(count(&out.items, Rating::Tier2), 5);
        assert!(!out.meta.adjacent_filled);
        assert!(!out.meta.insufficient_total_candidates);
        assert_eq!(out.meta.achieved(Rating::Tier1), 5);
    }

    #[test]
    fn test_scarce_tier_filled_from_adjacent() {
        let input = ranked([2, 25, 25, 25]);
        let out = rebalance(
            &input,
            &[Rating::Tier1, Rating::Tier2],
            10,
            Mode::Easy,
            RebalanceOptions::default(),
        );
        assert_eq!(out.items.len(), 10);
        assert_eq!(count(&out.items, Rating::Tier1), 2);
        assert_eq!(count(&out.items, Rating::Tier2), 8);
        assert!(out.meta.adjacent_filled);
        assert_eq!(out.meta.tiers[0].quota, 5);
        assert_eq!(out.meta.tiers[0].available, 2);
        assert_eq!(out.meta.tiers[1].achieved, 8);
    }

    #[test]
    fn test_best_effort_needs_no_adjacent_fill() {
        let input = ranked([2, 25, 0, 0]);
        let out = rebalance(
            &input,
            &[Rating::Tier1, Rating::Tier2],
            10,
            Mode::Easy,
            RebalanceOptions {
                exact_balance: false,
                adjacent_fill: true,
            },
        );
        assert_eq!(count(&out.items, Rating::Tier1), 2);
        assert_eq!(count(&out.items, Rating::Tier2), 8);
        assert!(!out.meta.adjacent_filled);
        assert_eq!(out.meta.tiers[1].quota, 8);
    }

    #[test]
    fn test_insufficient_candidates_flagged() {
        let input = ranked([2, 3, 40, 40]);
        let out = rebalance(
            &input,
            &[Rating::Tier1, Rating::Tier2],
            10,
            Mode::Easy,
            RebalanceOptions::default(),
        );
        assert_eq!(out.items.len(), 5);
        assert!(out.meta.insufficient_total_candidates);
        assert_eq!(out.meta.selected, 5);
    }

    #[test]
    fn test_never_exceeds_target_or_invents_items() {
        for counts in [[0, 0, 0, 0], [1, 0, 7, 3], [30, 2, 2, 30], [5, 5, 5, 5]] {
            let input = ranked(counts);
            for target in [0usize, 1, 3, 10, 50] {
                for exact_balance in [true, false] {
                    let out = rebalance(
                        &input,
                        &Mode::Medium.allowed_tiers(),
                        target,
                        Mode::Medium,
                        RebalanceOptions {
                            exact_balance,
                            adjacent_fill: true,
                        },
                    );
                    assert!(out.items.len() <= target);
                    assert!(out.items.len() <= counts[1] + counts[2]);
                    assert!(out.items.iter().all(|p| input.contains(p)));
                    let mut ids: Vec<usize> = out.items.iter().map(|p| p.id).collect();
                    ids.sort_unstable();
                    ids.dedup();
                    assert_eq!(ids.len(), out.items.len(), "duplicate pick");
                }
            }
        }
    }

    #[test]
    fn test_rank_order_kept_within_tier() {
        let input = ranked([3, 20, 0, 0]);
        let out = rebalance(
            &input,
            &[Rating::Tier1, Rating::Tier2],
            12,
            Mode::Easy,
            RebalanceOptions::default(),
        );
        for tier in [Rating::Tier1, Rating::Tier2] {
            let ids: Vec<usize> = out
                .items
                .iter()
                .filter(|p| p.tier == tier)
                .map(|p| p.id)
                .collect();
            assert!(ids.windows(2).all(|w| w[0] < w[1]), "{tier:?} reordered: {ids:?}");
        }
    }

    #[test]
    fn test_rebalancing_balanced_list_is_stable() {
        let input = ranked([25, 25, 25, 25]);
        let first = rebalance(
            &input,
            &[Rating::Tier1, Rating::Tier2],
            10,
            Mode::Easy,
            RebalanceOptions::default(),
        );
        let second = rebalance(
            &first.items,
            &[Rating::Tier1, Rating::Tier2],
            10,
            Mode::Easy,
            RebalanceOptions::default(),
        );
        let mut a: Vec<usize> = first.items.iter().map(|p| p.id).collect();
        let mut b: Vec<usize> = second.items.iter().map(|p| p.id).collect();
        a.sort_unstable();
        b.sort_unstable();
        assert_eq!(a, b);
    }

    #[test]
    fn test_three_tiers_borrow_from_next_then_previous() {
        let input = ranked([10, 10, 1, 0]);
        let tiers = [Rating::Tier1, Rating::Tier2, Rating::Tier3];
        let out = rebalance(&input, &tiers, 9, Mode::Medium, RebalanceOptions::default());
        // Tier3 is last, so its shortfall of 2 comes from Tier2.
        assert_eq!(count(&out.items, Rating::Tier1), 3);
        assert_eq!(count(&out.items, Rating::Tier2), 5);
        assert_eq!(count(&out.items, Rating::Tier3), 1);
        assert!(out.meta.adjacent_filled);
    }

    #[test]
    fn test_works_over_catalog_references() {
        let items = vec![
            CatalogItem::new("A", "ECON", Rating::Tier4),
            CatalogItem::new("B", "ECON", Rating::Tier4Star),
            CatalogItem::new("C", "ECON", Rating::Tier3),
        ];
        let refs: Vec<&CatalogItem> = items.iter().collect();
        let out = rebalance(
            &refs,
            &Mode::Hard.allowed_tiers(),
            4,
            Mode::Hard,
            RebalanceOptions::default(),
        );
        let names: Vec<&str> = out.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert!(out.meta.insufficient_total_candidates);
    }
}
