use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{day::parse_day, error::reject, extract::CurrentUser, state::AppState};

use super::dto::SummaryResponse;

pub fn routes() -> Router<AppState> {
    Router::new().route("/summary/:date", get(daily_summary))
}

#[instrument(skip(state))]
pub async fn daily_summary(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(date): Path<String>,
) -> Result<Json<SummaryResponse>, (StatusCode, String)> {
    let day = parse_day(&date).map_err(reject)?;
    let record = state
        .summary
        .compute_daily_summary(user_id, day)
        .await
        .map_err(reject)?;
    Ok(Json(SummaryResponse::from(record)))
}
