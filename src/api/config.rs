use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::config::RankingParams;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub catalog_path: String,
    pub journals: usize,
    pub default_profile: String,
    pub ranking: RankingParams,
}

/// GET /api/config - Current ranking constants
pub async fn get_config(State(state): State<AppState>) -> Json<ConfigResponse> {
    Json(ConfigResponse {
        catalog_path: state.config.catalog_path().display().to_string(),
        journals: state.catalog.len(),
        default_profile: state.config.default_profile.clone(),
        ranking: state.ranking.read().clone(),
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct RankingParamsUpdate {
    pub gate_multiplier: Option<usize>,
    pub gate_floor: Option<usize>,
    pub min_viable_floor: Option<usize>,
    pub expansion_factor: Option<usize>,
    pub top_rank_cutoff: Option<u32>,
    pub high_rank_cutoff: Option<u32>,
    pub top_rank_penalty: Option<f64>,
    pub high_rank_penalty: Option<f64>,
}

/// PUT /api/config - Update ranking constants. Applies to later requests only.
pub async fn update_config(
    State(state): State<AppState>,
    Json(update): Json<RankingParamsUpdate>,
) -> Result<Json<RankingParams>, (StatusCode, String)> {
    let mut next = state.ranking.read().clone();

    if let Some(v) = update.gate_multiplier {
        next.gate_multiplier = v;
    }
    if let Some(v) = update.gate_floor {
        next.gate_floor = v;
    }
    if let Some(v) = update.min_viable_floor {
        next.min_viable_floor = v;
    }
    if let Some(v) = update.expansion_factor {
        if v == 0 {
            return Err((
                StatusCode::BAD_REQUEST,
                "expansion_factor must be at least 1".to_string(),
            ));
        }
        next.expansion_factor = v;
    }
    if let Some(v) = update.top_rank_cutoff {
        next.top_rank_cutoff = v;
    }
    if let Some(v) = update.high_rank_cutoff {
        next.high_rank_cutoff = v;
    }
    for (name, value) in [
        ("top_rank_penalty", update.top_rank_penalty),
        ("high_rank_penalty", update.high_rank_penalty),
    ] {
        if let Some(v) = value {
            if !v.is_finite() || v < 0.0 {
                return Err((
                    StatusCode::BAD_REQUEST,
                    format!("{name} must be a non-negative number"),
                ));
            }
        }
    }
    if let Some(v) = update.top_rank_penalty {
        next.top_rank_penalty = v;
    }
    if let Some(v) = update.high_rank_penalty {
        next.high_rank_penalty = v;
    }
    if next.top_rank_cutoff > next.high_rank_cutoff {
        return Err((
            StatusCode::BAD_REQUEST,
            "top_rank_cutoff must not exceed high_rank_cutoff".to_string(),
        ));
    }

    *state.ranking.write() = next.clone();
    tracing::info!("Ranking params updated: {:?}", next);
    Ok(Json(next))
}
