use anyhow::{Context, Result};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

use crate::catalog::Catalog;
use crate::models::{parse_pct, parse_rank, CatalogItem, Rating};

/// One row of the AJG core CSV. Missing columns deserialize to empty strings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRow {
    #[serde(rename = "Field")]
    field: String,
    #[serde(rename = "Journal Title", alias = "Journal", alias = "title")]
    title: String,
    #[serde(rename = "AJG 2024")]
    ajg_2024: String,
    #[serde(rename = "AJG 2021")]
    ajg_2021: String,
    #[serde(rename = "Citescore rank")]
    citescore_rank: String,
    #[serde(rename = "SNIP rank")]
    snip_rank: String,
    #[serde(rename = "SJR rank")]
    sjr_rank: String,
    #[serde(rename = "JIF rank")]
    jif_rank: String,
    #[serde(rename = "SDG content indicator (2017-21)")]
    sdg_pct: String,
    #[serde(rename = "International co-authorship (2017-21)")]
    intl_pct: String,
    #[serde(rename = "Academic-non-academic collaboration (2017-21)")]
    collab_pct: String,
    #[serde(rename = "Citations in policy documents (2017-21)")]
    policy_value: String,
}

impl RawRow {
    fn into_item(self) -> CatalogItem {
        CatalogItem {
            name: self.title.trim().to_string(),
            field: self.field.trim().to_string(),
            rating: Rating::parse_lenient(&self.ajg_2024),
            previous_rating: Rating::parse_lenient(&self.ajg_2021),
            citescore_rank: parse_rank(&self.citescore_rank),
            snip_rank: parse_rank(&self.snip_rank),
            sjr_rank: parse_rank(&self.sjr_rank),
            jif_rank: parse_rank(&self.jif_rank),
            sdg_pct: parse_pct(&self.sdg_pct),
            intl_pct: parse_pct(&self.intl_pct),
            collab_pct: parse_pct(&self.collab_pct),
            policy_pct: parse_pct(&self.policy_value),
        }
    }
}

/// Load the catalog from a CSV file.
pub fn load_csv(path: &Path) -> Result<Catalog> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open catalog CSV {}", path.display()))?;
    let catalog = from_reader(file)
        .with_context(|| format!("Failed to read catalog CSV {}", path.display()))?;
    tracing::info!(
        "Loaded {} journals ({} fields) from {}",
        catalog.len(),
        catalog.known_fields().len(),
        path.display()
    );
    Ok(catalog)
}

/// Parse catalog rows from any CSV source. Rows that fail to decode or have
/// no journal title are skipped with a warning instead of failing the load.
pub fn from_reader<R: Read>(reader: R) -> Result<Catalog> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = rdr.headers().context("Catalog CSV has no header row")?.clone();
    if !["Journal Title", "Journal", "title"]
        .iter()
        .any(|h| headers.iter().any(|col| col == *h))
    {
        anyhow::bail!("Catalog CSV header has no journal title column (Journal Title/Journal/title)");
    }

    let mut items = Vec::new();
    for (line, record) in rdr.deserialize::<RawRow>().enumerate() {
        match record {
            Ok(row) => {
                let item = row.into_item();
                if item.name.is_empty() {
                    tracing::warn!("Skipping catalog row {}: empty journal title", line + 2);
                    continue;
                }
                items.push(item);
            }
            Err(e) => {
                tracing::warn!("Skipping catalog row {}: {e}", line + 2);
            }
        }
    }

    Ok(Catalog::new(items))
}
