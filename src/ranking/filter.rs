//! Pluggable per-query narrowing applied after scope filtering and before the
//! topic-fit gate.

use crate::models::{CatalogItem, Query};

pub trait CandidateFilter: Send + Sync {
    /// Short label recorded in logs.
    fn name(&self) -> &str;

    /// Return the subset of `items` worth gating for `query`, order preserved.
    fn narrow<'a>(&self, query: &Query, items: Vec<&'a CatalogItem>) -> Vec<&'a CatalogItem>;
}

/// Keeps every candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl CandidateFilter for PassThrough {
    fn name(&self) -> &str {
        "pass_through"
    }

    fn narrow<'a>(&self, _query: &Query, items: Vec<&'a CatalogItem>) -> Vec<&'a CatalogItem> {
        items
    }
}

/// Drops journals whose normalized name contains any of the given phrases.
#[derive(Debug, Clone, Default)]
pub struct ExcludeNames {
    phrases: Vec<String>,
}

impl ExcludeNames {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            phrases: phrases
                .into_iter()
                .map(|p| crate::ranking::normalize::normalize(p.as_ref()))
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }
}

impl CandidateFilter for ExcludeNames {
    fn name(&self) -> &str {
        "exclude_names"
    }

    fn narrow<'a>(&self, _query: &Query, items: Vec<&'a CatalogItem>) -> Vec<&'a CatalogItem> {
        if self.phrases.is_empty() {
            return items;
        }
        items
            .into_iter()
            .filter(|item| {
                let name = crate::ranking::normalize::normalize(&item.name);
                !self.phrases.iter().any(|p| name.contains(p.as_str()))
            })
            .collect()
    }
}
