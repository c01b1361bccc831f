use std::sync::Arc;

use axum::extract::{Query, State};
use axum::{Extension, Json};
use fieldroute_ors::OrsCoordinate;
use fieldroute_store::stop::Stop;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::Principal;
use crate::error::ApiError;
use crate::route::planner::plan_route;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct OptimizeQuery {
    stops: Option<String>,
}

#[derive(Serialize)]
pub struct OptimizeResponse {
    pub optimized_stops: Vec<Stop>,
    pub route_geometry: Vec<OrsCoordinate>,
}

/// Splits the raw `stops` parameter on commas, keeping only all-digit
/// tokens. Malformed tokens are skipped rather than rejected, so `1,abc,2`
/// behaves like `1,2`; the minimum-count check runs on what survives.
pub(crate) fn parse_stop_ids(raw: &str) -> Vec<i64> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()))
        .filter_map(|token| token.parse().ok())
        .collect()
}

pub async fn optimize_route(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<OptimizeQuery>,
) -> Result<Json<OptimizeResponse>, ApiError> {
    let raw = query
        .stops
        .ok_or_else(|| ApiError::BadRequest(String::from("Missing 'stops' parameter")))?;
    let stop_ids = parse_stop_ids(&raw);

    info!(
        user_id = principal.user_id,
        stops = stop_ids.len(),
        "optimize-route requested"
    );

    let planned = plan_route(&state.store, &state.optimizer, &state.directions, &stop_ids).await?;

    Ok(Json(OptimizeResponse {
        optimized_stops: planned.stops,
        route_geometry: planned.geometry,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_ids() {
        assert_eq!(parse_stop_ids("101,102,103"), vec![101, 102, 103]);
    }

    #[test]
    fn drops_malformed_tokens_silently() {
        assert_eq!(parse_stop_ids("101,abc,102"), vec![101, 102]);
        assert_eq!(parse_stop_ids("101, 12a ,102"), vec![101, 102]);
        assert_eq!(parse_stop_ids("-3,102"), vec![102]);
        assert_eq!(parse_stop_ids(",,101"), vec![101]);
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        assert_eq!(parse_stop_ids(" 101 , 102 "), vec![101, 102]);
    }

    #[test]
    fn keeps_duplicates() {
        assert_eq!(parse_stop_ids("101,101"), vec![101, 101]);
    }
}
