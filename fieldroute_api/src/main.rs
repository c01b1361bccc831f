mod auth;
mod banks;
mod config;
mod error;
mod route;
mod state;

use std::sync::Arc;

use axum::http::Method;
use axum::routing::get;
use axum::{Json, Router, middleware, serve};
use fieldroute_ors::directions::{OrsDirectionsClient, OrsDirectionsClientParams};
use fieldroute_ors::optimization::{OrsOptimizationClient, OrsOptimizationClientParams};
use fieldroute_store::store::JsonStopStore;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::{Level, info};

use crate::auth::AccessGate;
use crate::config::AppConfig;
use crate::state::AppState;

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::from_filename("./.env.local").ok();
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::from_env()?;

    let store = JsonStopStore::from_file(&config.stops_path)?;
    info!(stops = store.len(), "loaded stop data");

    let state = Arc::new(AppState {
        gate: AccessGate::new(&config.jwt_secret),
        store,
        optimizer: OrsOptimizationClient::new(OrsOptimizationClientParams {
            api_key: config.ors_api_key.clone(),
            base_url: config.ors_base_url.clone(),
            timeout: config.upstream_timeout,
        }),
        directions: OrsDirectionsClient::new(OrsDirectionsClientParams {
            api_key: config.ors_api_key.clone(),
            base_url: config.ors_base_url.clone(),
            timeout: config.upstream_timeout,
        }),
    });

    let cors_layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(Any)
        .allow_headers(Any);

    let protected = Router::new()
        .route("/banks", get(banks::get_banks))
        .route("/optimize-route", get(route::optimize::optimize_route))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_token,
        ));

    let app = Router::new()
        .route("/", get(index))
        .merge(protected)
        .layer(ServiceBuilder::new().layer(cors_layer))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(address = %config.bind_addr, "listening");

    serve(listener, app).await?;

    Ok(())
}

async fn index() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "Backend server is running!" }))
}
