use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{error::reject, extract::CurrentUser, state::AppState};

use super::catalog::Product;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub products: Vec<Product>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/products/search", get(search_products))
}

#[instrument(skip(state))]
pub async fn search_products(
    State(state): State<AppState>,
    CurrentUser(_user_id): CurrentUser,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let query = params.query.trim();
    if query.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Query parameter is required".into()));
    }

    let products = state
        .catalog
        .search_by_title(query)
        .await
        .map_err(|e| reject(e.into()))?;
    Ok(Json(SearchResponse { products }))
}
