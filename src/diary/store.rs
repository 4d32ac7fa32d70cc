use axum::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// One consumed product at a given weight and moment.
///
/// Within a diary there is at most one entry per (product, UTC day); logging
/// the same product again on the same day replaces the earlier entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumptionEntry {
    pub id: Uuid,
    pub product_id: Uuid,
    /// Grams consumed.
    pub weight: f64,
    /// Derived at record time: `calories_per_100g * weight / 100`.
    pub calories: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub consumed_at: OffsetDateTime,
}

/// Per-user diary document with the embedded entry array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diary {
    pub user_id: Uuid,
    pub entries: Vec<ConsumptionEntry>,
}

impl Diary {
    pub fn empty(user_id: Uuid) -> Self {
        Self {
            user_id,
            entries: Vec::new(),
        }
    }
}

/// Load/save capability for the per-user diary document.
#[async_trait]
pub trait DiaryStore: Send + Sync {
    async fn load(&self, user_id: Uuid) -> anyhow::Result<Option<Diary>>;
    async fn save(&self, diary: &Diary) -> anyhow::Result<()>;
}

#[derive(FromRow)]
struct DiaryRow {
    user_id: Uuid,
    entries: sqlx::types::Json<Vec<ConsumptionEntry>>,
}

pub struct PgDiaryStore {
    db: PgPool,
}

impl PgDiaryStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DiaryStore for PgDiaryStore {
    async fn load(&self, user_id: Uuid) -> anyhow::Result<Option<Diary>> {
        let row = sqlx::query_as::<_, DiaryRow>(
            r#"
            SELECT user_id, entries
            FROM diaries
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(|r| Diary {
            user_id: r.user_id,
            entries: r.entries.0,
        }))
    }

    async fn save(&self, diary: &Diary) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO diaries (user_id, entries)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE
            SET entries = EXCLUDED.entries, updated_at = now()
            "#,
        )
        .bind(diary.user_id)
        .bind(sqlx::types::Json(&diary.entries))
        .execute(&self.db)
        .await?;
        Ok(())
    }
}
