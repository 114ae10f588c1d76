use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProfileSummary {
    pub name: String,
    pub keywords: usize,
}

#[derive(Debug, Serialize)]
pub struct ProfilesResponse {
    pub default: String,
    pub profiles: Vec<ProfileSummary>,
}

/// GET /api/profiles - Lexicon profiles and the server default
pub async fn list_profiles(State(state): State<AppState>) -> Json<ProfilesResponse> {
    let profiles = state
        .lexicons
        .names()
        .into_iter()
        .filter_map(|name| {
            let keywords = state.lexicons.get(&name).ok()?.len();
            Some(ProfileSummary { name, keywords })
        })
        .collect();
    Json(ProfilesResponse {
        default: state.config.default_profile.clone(),
        profiles,
    })
}

#[derive(Debug, Serialize)]
pub struct FieldSummary {
    pub field: String,
    pub journals: usize,
}

/// GET /api/fields - Catalog fields with journal counts
pub async fn list_fields(State(state): State<AppState>) -> Json<Vec<FieldSummary>> {
    let items = state.catalog.items();
    let fields = state
        .catalog
        .known_fields()
        .into_iter()
        .map(|field| FieldSummary {
            journals: items.iter().filter(|i| i.field == field).count(),
            field,
        })
        .collect();
    Json(fields)
}
