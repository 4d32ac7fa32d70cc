mod dto;
pub mod aggregator;
pub mod handlers;
pub mod store;

use axum::Router;

use crate::state::AppState;

pub use aggregator::SummaryAggregator;
pub use store::{PgSummaryStore, SummaryStore};

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::routes())
}
