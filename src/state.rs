use parking_lot::RwLock;
use std::sync::Arc;

use crate::catalog::{loader, Catalog};
use crate::config::{Config, RankingParams};
use crate::ranking::lexicon::LexiconRegistry;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub catalog: Arc<Catalog>,
    pub lexicons: Arc<LexiconRegistry>,
    /// Adjustable at runtime through `PUT /api/config`
    pub ranking: Arc<RwLock<RankingParams>>,
}

impl AppState {
    /// Load the catalog and lexicons named by `config`.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        std::fs::create_dir_all(config.reports_dir())?;

        let catalog = loader::load_csv(&config.catalog_path())?;
        if catalog.is_empty() {
            tracing::warn!("Catalog {} has no journals", config.catalog_path().display());
        }

        let lexicons = match &config.lexicon_path {
            Some(path) => LexiconRegistry::load_json(path)?,
            None => LexiconRegistry::builtin(),
        };
        tracing::info!("Lexicon profiles: {}", lexicons.names().join(", "));

        Ok(Self::from_parts(config, catalog, lexicons))
    }

    /// Assemble state from already-loaded parts.
    pub fn from_parts(config: Config, catalog: Catalog, lexicons: LexiconRegistry) -> Self {
        let ranking = config.ranking.clone();
        Self {
            config,
            catalog: Arc::new(catalog),
            lexicons: Arc::new(lexicons),
            ranking: Arc::new(RwLock::new(ranking)),
        }
    }
}
