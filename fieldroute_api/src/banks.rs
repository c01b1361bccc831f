use std::sync::Arc;

use axum::extract::State;
use axum::{Extension, Json};
use fieldroute_store::stop::Stop;
use fieldroute_store::store::StopStore;

use crate::auth::Principal;
use crate::state::AppState;

/// The stops assigned to the authenticated caller. No optimization involved.
pub async fn get_banks(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Json<Vec<Stop>> {
    Json(state.store.assigned_to(principal.user_id))
}
