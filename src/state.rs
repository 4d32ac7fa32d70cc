use std::sync::Arc;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::AppConfig;
use crate::diary::{DiaryLedger, DiaryStore, PgDiaryStore};
use crate::locks::UserLocks;
use crate::products::{PgProductCatalog, ProductCatalog};
use crate::summary::{PgSummaryStore, SummaryAggregator, SummaryStore};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub catalog: Arc<dyn ProductCatalog>,
    pub ledger: Arc<DiaryLedger>,
    pub summary: Arc<SummaryAggregator>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        let catalog: Arc<dyn ProductCatalog> = Arc::new(PgProductCatalog::new(db.clone()));
        let diaries: Arc<dyn DiaryStore> = Arc::new(PgDiaryStore::new(db.clone()));
        let summaries: Arc<dyn SummaryStore> = Arc::new(PgSummaryStore::new(db.clone()));

        Ok(Self::from_parts(db, config, catalog, diaries, summaries))
    }

    pub fn from_parts(
        db: PgPool,
        config: Arc<AppConfig>,
        catalog: Arc<dyn ProductCatalog>,
        diaries: Arc<dyn DiaryStore>,
        summaries: Arc<dyn SummaryStore>,
    ) -> Self {
        // one lock registry for both per-user documents
        let locks = Arc::new(UserLocks::new());
        let ledger = Arc::new(DiaryLedger::new(diaries, catalog.clone(), locks.clone()));
        let summary = Arc::new(SummaryAggregator::new(summaries, ledger.clone(), locks));

        Self {
            db,
            config,
            catalog,
            ledger,
            summary,
        }
    }
}
