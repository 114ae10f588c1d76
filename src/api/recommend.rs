use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::api::{bad_request, internal};
use crate::models::RecommendRequest;
use crate::ranking::pipeline::{Pipeline, Recommendation};
use crate::state::AppState;

/// POST /api/recommend - Rank journals for a paper:
///   1. Scope + candidate filter
///   2. Topic-fit gate
///   3. Mode-weighted scoring, rating filter (one wider re-gate if short)
///   4. Optional tier rebalance, top-k
pub async fn recommend(
    State(state): State<AppState>,
    Json(req): Json<RecommendRequest>,
) -> Result<Json<Recommendation>, (StatusCode, String)> {
    let (query, options) = req
        .into_parts(&state.config.default_profile)
        .map_err(bad_request)?;

    let params = state.ranking.read().clone();
    let catalog = state.catalog.clone();
    let lexicons = state.lexicons.clone();

    let recommendation = tokio::task::spawn_blocking(move || {
        Pipeline::new(&catalog, &lexicons, &params).run(&query, &options)
    })
    .await
    .map_err(|e| internal("Ranking task failed", e))?
    .map_err(bad_request)?;

    Ok(Json(recommendation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::config::Config;
    use crate::models::{CatalogItem, Rating};
    use crate::ranking::lexicon::LexiconRegistry;

    fn state() -> AppState {
        let items = (0..40)
            .map(|i| {
                let rating = if i % 2 == 0 { Rating::Tier1 } else { Rating::Tier2 };
                CatalogItem::new(format!("Journal of Trade {i}"), "ECON", rating)
            })
            .collect();
        AppState::from_parts(Config::default(), Catalog::new(items), LexiconRegistry::builtin())
    }

    #[tokio::test]
    async fn test_recommend_balanced() {
        let req: RecommendRequest = serde_json::from_value(serde_json::json!({
            "title": "Tariffs and trade",
            "abstract": "Retaliatory tariffs in agriculture.",
            "mode": "easy",
            "topk": 10,
            "rebalance": true
        }))
        .unwrap();

        let Json(rec) = recommend(State(state()), Json(req)).await.unwrap();
        assert_eq!(rec.items.len(), 10);
        let meta = rec.rebalance.unwrap();
        assert_eq!(meta.achieved(Rating::Tier1), 5);
        assert_eq!(meta.achieved(Rating::Tier2), 5);
    }

    #[tokio::test]
    async fn test_recommend_rejects_bad_input() {
        let req: RecommendRequest = serde_json::from_value(serde_json::json!({
            "title": "Tariffs",
            "rating_filter": ["4", "six"]
        }))
        .unwrap();
        let (status, msg) = recommend(State(state()), Json(req)).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(msg.contains("six"));

        let req: RecommendRequest = serde_json::from_value(serde_json::json!({
            "title": "Tariffs",
            "field_scope": ["MARKETING"]
        }))
        .unwrap();
        let (status, msg) = recommend(State(state()), Json(req)).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(msg.contains("ECON"));
    }
}
