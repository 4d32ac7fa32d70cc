use axum::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// A food item from the shared catalog. Read-only for this service; the
/// catalog is maintained elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub title: String,
    pub category: Option<String>,
    pub calories_per_100g: f64,
}

/// Lookup capability over the product catalog, injectable so the ledger can
/// run against an in-memory table.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Product>>;
    async fn search_by_title(&self, query: &str) -> anyhow::Result<Vec<Product>>;
}

pub struct PgProductCatalog {
    db: PgPool,
}

impl PgProductCatalog {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductCatalog for PgProductCatalog {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, title, category, calories_per_100g
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(product)
    }

    async fn search_by_title(&self, query: &str) -> anyhow::Result<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, title, category, calories_per_100g
            FROM products
            WHERE title ILIKE '%' || $1 || '%'
            ORDER BY title
            "#,
        )
        .bind(query)
        .fetch_all(&self.db)
        .await?;
        Ok(products)
    }
}
