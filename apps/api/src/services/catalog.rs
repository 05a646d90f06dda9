//! Public catalog: listing, product pages and search.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use teslo_core::validation::validate_search_query;
use teslo_core::{Gender, Product};

use crate::error::{ApiError, ApiResult};
use crate::extract::ApiQuery;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ProductFilter {
    pub gender: Option<Gender>,
}

/// `GET /api/products?gender=`
pub async fn list_products(
    State(state): State<Arc<AppState>>,
    ApiQuery(filter): ApiQuery<ProductFilter>,
) -> ApiResult<Json<Vec<Product>>> {
    let products = state.db.products().list(filter.gender).await?;
    Ok(Json(products))
}

/// `GET /api/products/{slug}`
pub async fn product_by_slug(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> ApiResult<Json<Product>> {
    state
        .db
        .products()
        .get_by_slug(&slug)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Product"))
}

/// `GET /api/search/{query}`
pub async fn search(
    State(state): State<Arc<AppState>>,
    Path(query): Path<String>,
) -> ApiResult<Json<Vec<Product>>> {
    let term = validate_search_query(&query)?;
    let products = state.db.products().search(&term).await?;
    Ok(Json(products))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};

    use crate::test_support::{app, send, test_state};

    #[tokio::test]
    async fn test_listing_and_gender_filter() {
        let state = test_state().await;
        teslo_db::seed::reset_and_seed(&state.db).await.unwrap();

        let (status, body) = send(app(&state), Method::GET, "/api/products", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 12);

        let (status, body) =
            send(app(&state), Method::GET, "/api/products?gender=men", None, None).await;
        assert_eq!(status, StatusCode::OK);
        let men = body.as_array().unwrap();
        assert!(!men.is_empty());
        assert!(men.iter().all(|p| p["gender"] == "men"));

        let (status, body) =
            send(app(&state), Method::GET, "/api/products?gender=aliens", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_product_by_slug() {
        let state = test_state().await;
        teslo_db::seed::reset_and_seed(&state.db).await.unwrap();

        let (status, body) = send(
            app(&state),
            Method::GET,
            "/api/products/mens_chill_crew_neck_sweatshirt",
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["priceCents"], 7500);
        assert_eq!(body["type"], "shirts");

        let (status, body) =
            send(app(&state), Method::GET, "/api/products/no_such_thing", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let state = test_state().await;
        teslo_db::seed::reset_and_seed(&state.db).await.unwrap();

        let (status, body) = send(app(&state), Method::GET, "/api/search/SWEAT", None, None).await;
        assert_eq!(status, StatusCode::OK);
        let hits = body.as_array().unwrap();
        assert!(!hits.is_empty());
        assert!(hits
            .iter()
            .any(|p| p["slug"] == "mens_chill_crew_neck_sweatshirt"));

        let (status, body) =
            send(app(&state), Method::GET, "/api/search/zzzzzz", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.as_array().unwrap().is_empty());
    }
}
