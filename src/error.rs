use axum::http::StatusCode;
use thiserror::Error;
use tracing::error;

/// Everything a diary operation can fail with. The `NotFound` family marks
/// legitimate absence, not a fault; only `Storage` is retryable.
#[derive(Debug, Error)]
pub enum DiaryError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("invalid date: {0}")]
    InvalidDate(String),
    #[error("Product not found")]
    ProductNotFound,
    #[error("Diary entry not found for this date")]
    DiaryNotFound,
    #[error("Product not found in diary for this date")]
    EntryNotFound,
    #[error("No diary entry found for this date")]
    NoEntriesForDate,
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Maps a domain error onto the HTTP boundary. Storage failures are logged
/// here and surfaced as a generic 500 without internal detail.
pub fn reject(err: DiaryError) -> (StatusCode, String) {
    let status = match &err {
        DiaryError::InvalidInput(_) | DiaryError::InvalidDate(_) => StatusCode::BAD_REQUEST,
        DiaryError::ProductNotFound
        | DiaryError::DiaryNotFound
        | DiaryError::EntryNotFound
        | DiaryError::NoEntriesForDate => StatusCode::NOT_FOUND,
        DiaryError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if let DiaryError::Storage(e) = &err {
        error!(error = %e, "storage failure");
        return (status, "Internal server error".into());
    }
    (status, err.to_string())
}
