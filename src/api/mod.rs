pub mod catalog;
pub mod config;
pub mod pool;
pub mod recommend;

use axum::http::StatusCode;

use crate::error::RankError;

/// Ranking configuration errors are the caller's fault.
pub(crate) fn bad_request(e: RankError) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, e.to_string())
}

pub(crate) fn internal(what: &str, e: impl std::fmt::Display) -> (StatusCode, String) {
    tracing::error!("{what}: {e}");
    (StatusCode::INTERNAL_SERVER_ERROR, format!("{what}: {e}"))
}
