pub mod catalog;
pub mod handlers;

use axum::Router;

use crate::state::AppState;

pub use catalog::{PgProductCatalog, Product, ProductCatalog};

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::routes())
}
