use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::{bad_request, internal};
use crate::models::RecommendRequest;
use crate::ranking::pipeline::Pipeline;
use crate::ranking::pool::{validate_selection, CandidatePool, Selection, Violation};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PoolRequest {
    #[serde(flatten)]
    pub request: RecommendRequest,
    /// Also write the pool to `<reports>/candidate_pool_<mode>.json`
    #[serde(default)]
    pub save: bool,
}

#[derive(Debug, Serialize)]
pub struct PoolResponse {
    pub path: Option<String>,
    pub pool: CandidatePool,
}

/// POST /api/pool - Export every gated, rating-filtered candidate with scores
pub async fn export_pool(
    State(state): State<AppState>,
    Json(req): Json<PoolRequest>,
) -> Result<Json<PoolResponse>, (StatusCode, String)> {
    let save = req.save;
    let (query, options) = req
        .request
        .into_parts(&state.config.default_profile)
        .map_err(bad_request)?;

    let params = state.ranking.read().clone();
    let catalog = state.catalog.clone();
    let lexicons = state.lexicons.clone();

    let pool = tokio::task::spawn_blocking(move || {
        Pipeline::new(&catalog, &lexicons, &params).candidate_pool(&query, &options)
    })
    .await
    .map_err(|e| internal("Pool task failed", e))?
    .map_err(bad_request)?;

    let path = if save {
        let path = state
            .config
            .reports_dir()
            .join(CandidatePool::file_name(pool.meta.mode));
        let to_write = pool.clone();
        let target = path.clone();
        tokio::task::spawn_blocking(move || to_write.write_json(&target))
            .await
            .map_err(|e| internal("Pool write task failed", e))?
            .map_err(|e| internal("Failed to write pool", format!("{e:#}")))?;
        Some(path.display().to_string())
    } else {
        None
    };

    Ok(Json(PoolResponse { path, pool }))
}

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub pool: CandidatePool,
    pub selection: Selection,
    #[serde(default = "default_min_items")]
    pub min_items: usize,
}

fn default_min_items() -> usize {
    1
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub violations: Vec<Violation>,
    pub messages: Vec<String>,
}

/// POST /api/pool/validate - Check a selection is a subset of its pool
pub async fn validate(Json(req): Json<ValidateRequest>) -> Json<ValidateResponse> {
    let violations = validate_selection(&req.pool, &req.selection, req.min_items);
    if !violations.is_empty() {
        tracing::info!("Selection rejected with {} violations", violations.len());
    }
    Json(ValidateResponse {
        valid: violations.is_empty(),
        messages: violations.iter().map(ToString::to_string).collect(),
        violations,
    })
}
