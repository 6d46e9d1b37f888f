//! Home and health check endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppResult;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Current status of the service
    pub status: String,
    /// Version of the service
    pub version: String,
}

/// Home page view
#[derive(Serialize, ToSchema)]
pub struct HomeView {
    pub name: String,
    pub version: String,
    pub active_loans: i64,
    /// Entry points of the application
    pub sections: Vec<String>,
}

/// Home page
#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses(
        (status = 200, description = "Home view", body = HomeView)
    )
)]
pub async fn home(State(state): State<crate::AppState>) -> AppResult<Json<HomeView>> {
    let active_loans = state.services.loans.count_active().await?;

    Ok(Json(HomeView {
        name: state.config.library.name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        active_loans,
        sections: vec!["/books".to_string(), "/members".to_string(), "/loans".to_string()],
    }))
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness check endpoint (checks database connectivity)
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "Service is ready", body = HealthResponse),
        (status = 500, description = "Database unreachable")
    )
)]
pub async fn readiness_check(
    State(state): State<crate::AppState>,
) -> AppResult<Json<HealthResponse>> {
    state.services.ping().await?;

    Ok(Json(HealthResponse {
        status: "ready".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}
