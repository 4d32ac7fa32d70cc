mod dto;
pub mod handlers;
pub mod ledger;
pub mod store;

use axum::Router;

use crate::state::AppState;

pub use ledger::DiaryLedger;
pub use store::{DiaryStore, PgDiaryStore};

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::routes())
}
