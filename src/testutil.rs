use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::async_trait;
use uuid::Uuid;

use crate::diary::ledger::DiaryLedger;
use crate::diary::store::{Diary, DiaryStore};
use crate::locks::UserLocks;
use crate::products::catalog::{Product, ProductCatalog};
use crate::summary::aggregator::SummaryAggregator;
use crate::summary::store::{DailySummary, SummaryStore};

/// In-memory stand-ins for the Postgres-backed capabilities.
pub struct MemCatalog {
    products: Mutex<HashMap<Uuid, Product>>,
}

impl MemCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: Mutex::new(products.into_iter().map(|p| (p.id, p)).collect()),
        }
    }

    /// Drops a product, as if the catalog changed under the diary.
    pub fn forget(&self, id: Uuid) {
        self.products.lock().unwrap().remove(&id);
    }
}

#[async_trait]
impl ProductCatalog for MemCatalog {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Product>> {
        Ok(self.products.lock().unwrap().get(&id).cloned())
    }

    async fn search_by_title(&self, query: &str) -> anyhow::Result<Vec<Product>> {
        let needle = query.to_lowercase();
        let mut hits: Vec<Product> = self
            .products
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.title.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        hits.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(hits)
    }
}

#[derive(Default)]
pub struct MemDiaryStore {
    diaries: Mutex<HashMap<Uuid, Diary>>,
    saves: AtomicUsize,
}

impl MemDiaryStore {
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DiaryStore for MemDiaryStore {
    async fn load(&self, user_id: Uuid) -> anyhow::Result<Option<Diary>> {
        Ok(self.diaries.lock().unwrap().get(&user_id).cloned())
    }

    async fn save(&self, diary: &Diary) -> anyhow::Result<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.diaries
            .lock()
            .unwrap()
            .insert(diary.user_id, diary.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemSummaryStore {
    summaries: Mutex<HashMap<Uuid, DailySummary>>,
}

#[async_trait]
impl SummaryStore for MemSummaryStore {
    async fn load(&self, user_id: Uuid) -> anyhow::Result<Option<DailySummary>> {
        Ok(self.summaries.lock().unwrap().get(&user_id).cloned())
    }

    async fn save(&self, summary: &DailySummary) -> anyhow::Result<()> {
        self.summaries
            .lock()
            .unwrap()
            .insert(summary.user_id, summary.clone());
        Ok(())
    }
}

pub struct Env {
    pub catalog: Arc<MemCatalog>,
    pub diaries: Arc<MemDiaryStore>,
    pub summaries: Arc<MemSummaryStore>,
    pub ledger: Arc<DiaryLedger>,
    pub aggregator: Arc<SummaryAggregator>,
}

/// Wires a ledger and an aggregator over in-memory stores, sharing one lock
/// registry like the real state does.
pub fn env_with(products: Vec<Product>) -> Env {
    let catalog = Arc::new(MemCatalog::new(products));
    let diaries = Arc::new(MemDiaryStore::default());
    let summaries = Arc::new(MemSummaryStore::default());
    let locks = Arc::new(UserLocks::new());

    let ledger = Arc::new(DiaryLedger::new(
        diaries.clone(),
        catalog.clone(),
        locks.clone(),
    ));
    let aggregator = Arc::new(SummaryAggregator::new(
        summaries.clone(),
        ledger.clone(),
        locks,
    ));

    Env {
        catalog,
        diaries,
        summaries,
        ledger,
        aggregator,
    }
}

pub fn product(title: &str, calories_per_100g: f64) -> Product {
    Product {
        id: Uuid::new_v4(),
        title: title.to_string(),
        category: None,
        calories_per_100g,
    }
}
