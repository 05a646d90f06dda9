//! Demo data reset, available outside production only.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::{info, warn};

use teslo_db::seed::reset_and_seed;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub message: &'static str,
    pub users: usize,
    pub products: usize,
}

/// `POST /api/seed`: wipes orders, users and products and writes the demo
/// catalog.
pub async fn run_seed(State(state): State<Arc<AppState>>) -> ApiResult<Json<SeedResponse>> {
    if state.config.is_production() {
        warn!("Seed requested in production");
        return Err(ApiError::forbidden("Seeding is disabled in production"));
    }

    let report = reset_and_seed(&state.db).await?;
    info!(users = report.users, products = report.products, "Database seeded");

    Ok(Json(SeedResponse {
        message: "Seed executed",
        users: report.users,
        products: report.products,
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};

    use crate::test_support::{app, send, state_with, test_state};

    #[tokio::test]
    async fn test_seed_in_development() {
        let state = test_state().await;

        let (status, body) = send(app(&state), Method::POST, "/api/seed", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Seed executed");
        assert_eq!(body["users"], 2);
        assert_eq!(body["products"], 12);
        assert_eq!(state.db.products().count().await.unwrap(), 12);
    }

    #[tokio::test]
    async fn test_seed_is_disabled_in_production() {
        let state = state_with(&[
            ("TESLO_ENV", "production"),
            ("TESLO_JWT_SECRET", "prod-secret"),
        ])
        .await;

        let (status, body) = send(app(&state), Method::POST, "/api/seed", None, None).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "FORBIDDEN");
        assert_eq!(state.db.products().count().await.unwrap(), 0);
    }
}
