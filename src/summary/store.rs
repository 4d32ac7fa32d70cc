use axum::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::Date;
use uuid::Uuid;

/// Cached totals for one calendar day of one user's diary.
///
/// The day is stored on the record itself and is the upsert key: recomputing
/// a day replaces its record rather than appending a second one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    #[serde(with = "crate::day::day_string")]
    pub date: Date,
    pub daily_consumed: f64,
    pub daily_rate: f64,
    pub daily_left: f64,
    pub percentage: f64,
}

/// Per-user collection of daily summaries, mirroring the diary document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySummary {
    pub user_id: Uuid,
    pub records: Vec<SummaryRecord>,
}

impl DailySummary {
    pub fn empty(user_id: Uuid) -> Self {
        Self {
            user_id,
            records: Vec::new(),
        }
    }
}

/// Load/save capability for the per-user summary document.
#[async_trait]
pub trait SummaryStore: Send + Sync {
    async fn load(&self, user_id: Uuid) -> anyhow::Result<Option<DailySummary>>;
    async fn save(&self, summary: &DailySummary) -> anyhow::Result<()>;
}

#[derive(FromRow)]
struct SummaryRow {
    user_id: Uuid,
    records: sqlx::types::Json<Vec<SummaryRecord>>,
}

pub struct PgSummaryStore {
    db: PgPool,
}

impl PgSummaryStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SummaryStore for PgSummaryStore {
    async fn load(&self, user_id: Uuid) -> anyhow::Result<Option<DailySummary>> {
        let row = sqlx::query_as::<_, SummaryRow>(
            r#"
            SELECT user_id, records
            FROM summaries
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(|r| DailySummary {
            user_id: r.user_id,
            records: r.records.0,
        }))
    }

    async fn save(&self, summary: &DailySummary) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO summaries (user_id, records)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE
            SET records = EXCLUDED.records, updated_at = now()
            "#,
        )
        .bind(summary.user_id)
        .bind(sqlx::types::Json(&summary.records))
        .execute(&self.db)
        .await?;
        Ok(())
    }
}
