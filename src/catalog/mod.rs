//! The journal catalog: loaded once, shared read-only by every request.

pub mod loader;

use std::collections::BTreeSet;

use crate::error::{RankError, Result};
use crate::models::{CatalogItem, Query};

/// Fields searched alongside a paper's own field when no explicit scope is given.
fn field_expansion(field: &str) -> &'static [&'static str] {
    match field {
        "ECON" => &[
            "IB&AREA",
            "PUB SEC",
            "REGIONAL STUDIES, PLANNING AND ENVIRONMENT",
        ],
        _ => &[],
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Distinct field tags, sorted.
    pub fn known_fields(&self) -> Vec<String> {
        self.items
            .iter()
            .map(|i| i.field.clone())
            .filter(|f| !f.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Fields a query searches: its explicit scope, or its field plus the
    /// default expansion. Every named field must exist unless the catalog is
    /// empty, in which case the scope simply matches nothing.
    pub fn resolve_scope(&self, query: &Query) -> Result<Vec<String>> {
        let known = self.known_fields();
        let check = |field: &str| -> Result<()> {
            if known.is_empty() || known.iter().any(|k| k == field) {
                Ok(())
            } else {
                Err(RankError::UnknownField {
                    field: field.to_string(),
                    known: known.clone(),
                })
            }
        };

        if !query.field_scope.is_empty() {
            let mut scope = Vec::with_capacity(query.field_scope.len());
            for field in &query.field_scope {
                check(field)?;
                if !scope.contains(field) {
                    scope.push(field.clone());
                }
            }
            return Ok(scope);
        }

        check(&query.field)?;
        let mut scope = vec![query.field.clone()];
        scope.extend(field_expansion(&query.field).iter().map(|f| f.to_string()));
        Ok(scope)
    }

    /// Journals in any of the `scope` fields, catalog order preserved.
    pub fn scoped(&self, scope: &[String]) -> Vec<&CatalogItem> {
        self.items
            .iter()
            .filter(|item| scope.iter().any(|f| *f == item.field))
            .collect()
    }
}
