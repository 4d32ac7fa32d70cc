use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{day::parse_day, error::reject, extract::CurrentUser, state::AppState};

use super::dto::{
    ConsumeRequest, ConsumeResponse, DayConsumptionResponse, EntryView, RemoveResponse,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/diary/consumed", post(record_consumed))
        .route("/diary/consumed/:date", get(list_consumed))
        .route("/diary/remove/:date/:entry_id", delete(remove_consumed))
}

#[instrument(skip(state, body))]
pub async fn record_consumed(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(body): Json<ConsumeRequest>,
) -> Result<(StatusCode, Json<ConsumeResponse>), (StatusCode, String)> {
    let (entry, diary) = state
        .ledger
        .record_consumption(user_id, body.product_id, body.weight)
        .await
        .map_err(reject)?;

    Ok((
        StatusCode::CREATED,
        Json(ConsumeResponse {
            message: "Consumed product added/updated successfully".into(),
            entry,
            diary,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list_consumed(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(date): Path<String>,
) -> Result<Json<DayConsumptionResponse>, (StatusCode, String)> {
    let day = parse_day(&date).map_err(reject)?;
    let entries = state
        .ledger
        .list_consumption(user_id, day)
        .await
        .map_err(reject)?;

    Ok(Json(DayConsumptionResponse {
        date: day,
        consumed_products: entries.into_iter().map(EntryView::from).collect(),
    }))
}

#[instrument(skip(state))]
pub async fn remove_consumed(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path((date, entry_id)): Path<(String, Uuid)>,
) -> Result<Json<RemoveResponse>, (StatusCode, String)> {
    let day = parse_day(&date).map_err(reject)?;
    let diary = state
        .ledger
        .remove_consumption(user_id, day, entry_id)
        .await
        .map_err(reject)?;

    Ok(Json(RemoveResponse {
        message: "Consumed product removed successfully!".into(),
        diary,
    }))
}
