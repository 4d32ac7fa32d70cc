use std::sync::Arc;

use time::{Date, OffsetDateTime};
use tracing::warn;
use uuid::Uuid;

use crate::day::{day_of, day_window};
use crate::error::DiaryError;
use crate::locks::UserLocks;
use crate::products::catalog::ProductCatalog;

use super::store::{ConsumptionEntry, Diary, DiaryStore};

/// A diary entry joined with its product title for presentation.
#[derive(Debug, Clone)]
pub struct ListedEntry {
    pub entry: ConsumptionEntry,
    pub title: Option<String>,
}

/// Owns the per-user consumption diaries and the upsert-by-day rules.
pub struct DiaryLedger {
    store: Arc<dyn DiaryStore>,
    catalog: Arc<dyn ProductCatalog>,
    locks: Arc<UserLocks>,
}

impl DiaryLedger {
    pub fn new(
        store: Arc<dyn DiaryStore>,
        catalog: Arc<dyn ProductCatalog>,
        locks: Arc<UserLocks>,
    ) -> Self {
        Self {
            store,
            catalog,
            locks,
        }
    }

    /// Records a consumed product for today. A second consumption of the same
    /// product on the same UTC day replaces the earlier entry in place; the
    /// diary is created lazily on first use. Exactly one store write per call.
    pub async fn record_consumption(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        weight: f64,
    ) -> Result<(ConsumptionEntry, Diary), DiaryError> {
        self.record_consumption_at(user_id, product_id, weight, OffsetDateTime::now_utc())
            .await
    }

    pub(crate) async fn record_consumption_at(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        weight: f64,
        now: OffsetDateTime,
    ) -> Result<(ConsumptionEntry, Diary), DiaryError> {
        if !(weight > 0.0) {
            return Err(DiaryError::InvalidInput(
                "weight must be a positive number of grams".into(),
            ));
        }
        let product = self
            .catalog
            .find_by_id(product_id)
            .await?
            .ok_or(DiaryError::ProductNotFound)?;
        let entry = ConsumptionEntry {
            id: Uuid::new_v4(),
            product_id,
            weight,
            calories: product.calories_per_100g * weight / 100.0,
            consumed_at: now,
        };

        let _guard = self.locks.acquire(user_id).await;
        let mut diary = self
            .store
            .load(user_id)
            .await?
            .unwrap_or_else(|| Diary::empty(user_id));
        let (start, end) = day_window(day_of(now))?;
        let slot = diary
            .entries
            .iter()
            .position(|e| e.product_id == product_id && e.consumed_at >= start && e.consumed_at < end);
        match slot {
            Some(index) => diary.entries[index] = entry.clone(),
            None => diary.entries.push(entry.clone()),
        }
        self.store.save(&diary).await?;
        Ok((entry, diary))
    }

    /// Removes one entry by identity, scoped to the given day. Removal is not
    /// repeatable: a second call with the same identity fails `EntryNotFound`.
    pub async fn remove_consumption(
        &self,
        user_id: Uuid,
        date: Date,
        entry_id: Uuid,
    ) -> Result<Diary, DiaryError> {
        let (start, end) = day_window(date)?;

        let _guard = self.locks.acquire(user_id).await;
        let mut diary = self
            .store
            .load(user_id)
            .await?
            .ok_or(DiaryError::DiaryNotFound)?;
        let index = diary
            .entries
            .iter()
            .position(|e| e.id == entry_id && e.consumed_at >= start && e.consumed_at < end)
            .ok_or(DiaryError::EntryNotFound)?;
        diary.entries.remove(index);
        self.store.save(&diary).await?;
        Ok(diary)
    }

    /// Entries of one UTC day, joined with product titles. "Nothing found" is
    /// an empty list, never an error; a failed title lookup degrades that one
    /// entry instead of failing the call.
    pub async fn list_consumption(
        &self,
        user_id: Uuid,
        date: Date,
    ) -> Result<Vec<ListedEntry>, DiaryError> {
        let entries = self.entries_for_day(user_id, date).await?;
        let mut listed = Vec::with_capacity(entries.len());
        for entry in entries {
            let title = match self.catalog.find_by_id(entry.product_id).await {
                Ok(Some(product)) => Some(product.title),
                Ok(None) => {
                    warn!(product_id = %entry.product_id, "product no longer in catalog");
                    None
                }
                Err(error) => {
                    warn!(error = %error, product_id = %entry.product_id, "title lookup failed");
                    None
                }
            };
            listed.push(ListedEntry { entry, title });
        }
        Ok(listed)
    }

    /// Raw entries of one UTC day, without the catalog join.
    pub(crate) async fn entries_for_day(
        &self,
        user_id: Uuid,
        date: Date,
    ) -> Result<Vec<ConsumptionEntry>, DiaryError> {
        let (start, end) = day_window(date)?;
        let Some(diary) = self.store.load(user_id).await? else {
            return Ok(Vec::new());
        };
        Ok(diary
            .entries
            .into_iter()
            .filter(|e| e.consumed_at >= start && e.consumed_at < end)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;
    use time::Duration;

    use crate::day::day_of;
    use crate::testutil::{env_with, product};

    use super::*;

    #[tokio::test]
    async fn record_then_list_returns_one_priced_entry() {
        let omelet = product("Omelet with cheese", 342.0);
        let env = env_with(vec![omelet.clone()]);
        let user = Uuid::new_v4();

        let (entry, _) = env
            .ledger
            .record_consumption(user, omelet.id, 150.0)
            .await
            .unwrap();
        assert!((entry.calories - 513.0).abs() < 1e-9);

        let listed = env
            .ledger
            .list_consumption(user, day_of(entry.consumed_at))
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].entry.id, entry.id);
        assert_eq!(listed[0].title.as_deref(), Some("Omelet with cheese"));
    }

    #[tokio::test]
    async fn same_day_record_replaces_instead_of_appending() {
        let bread = product("Rye bread", 259.0);
        let env = env_with(vec![bread.clone()]);
        let user = Uuid::new_v4();
        let noon = datetime!(2024-09-12 12:00 UTC);

        env.ledger
            .record_consumption_at(user, bread.id, 50.0, noon)
            .await
            .unwrap();
        let (second, diary) = env
            .ledger
            .record_consumption_at(user, bread.id, 80.0, noon + Duration::hours(3))
            .await
            .unwrap();

        assert_eq!(diary.entries.len(), 1);
        assert_eq!(diary.entries[0].id, second.id);
        assert!((diary.entries[0].weight - 80.0).abs() < f64::EPSILON);
        assert!((diary.entries[0].calories - 207.2).abs() < 1e-9);
    }

    #[tokio::test]
    async fn different_days_keep_separate_entries() {
        let bread = product("Rye bread", 259.0);
        let env = env_with(vec![bread.clone()]);
        let user = Uuid::new_v4();

        env.ledger
            .record_consumption_at(user, bread.id, 50.0, datetime!(2024-09-12 12:00 UTC))
            .await
            .unwrap();
        let (_, diary) = env
            .ledger
            .record_consumption_at(user, bread.id, 70.0, datetime!(2024-09-13 09:00 UTC))
            .await
            .unwrap();
        assert_eq!(diary.entries.len(), 2);

        let first_day = env
            .ledger
            .list_consumption(user, time::macros::date!(2024 - 09 - 12))
            .await
            .unwrap();
        assert_eq!(first_day.len(), 1);
        assert!((first_day[0].entry.weight - 50.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn rejects_nonpositive_weight_before_touching_storage() {
        let apple = product("Apple", 52.0);
        let env = env_with(vec![apple.clone()]);
        let user = Uuid::new_v4();

        for weight in [0.0, -5.0, f64::NAN] {
            let err = env
                .ledger
                .record_consumption(user, apple.id, weight)
                .await
                .unwrap_err();
            assert!(matches!(err, DiaryError::InvalidInput(_)));
        }
        assert_eq!(env.diaries.save_count(), 0);
    }

    #[tokio::test]
    async fn rejects_unknown_product() {
        let env = env_with(vec![]);
        let err = env
            .ledger
            .record_consumption(Uuid::new_v4(), Uuid::new_v4(), 100.0)
            .await
            .unwrap_err();
        assert!(matches!(err, DiaryError::ProductNotFound));
    }

    #[tokio::test]
    async fn removal_excludes_the_entry_and_is_not_repeatable() {
        let apple = product("Apple", 52.0);
        let env = env_with(vec![apple.clone()]);
        let user = Uuid::new_v4();
        let noon = datetime!(2024-09-12 12:00 UTC);
        let day = day_of(noon);

        let (entry, _) = env
            .ledger
            .record_consumption_at(user, apple.id, 100.0, noon)
            .await
            .unwrap();

        let diary = env.ledger.remove_consumption(user, day, entry.id).await.unwrap();
        assert!(diary.entries.is_empty());
        assert!(env.ledger.list_consumption(user, day).await.unwrap().is_empty());

        let err = env
            .ledger
            .remove_consumption(user, day, entry.id)
            .await
            .unwrap_err();
        assert!(matches!(err, DiaryError::EntryNotFound));
    }

    #[tokio::test]
    async fn removal_without_a_diary_is_diary_not_found() {
        let env = env_with(vec![]);
        let err = env
            .ledger
            .remove_consumption(Uuid::new_v4(), time::macros::date!(2024 - 09 - 12), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, DiaryError::DiaryNotFound));
    }

    #[tokio::test]
    async fn removal_is_scoped_to_the_requested_day() {
        let apple = product("Apple", 52.0);
        let env = env_with(vec![apple.clone()]);
        let user = Uuid::new_v4();

        let (entry, _) = env
            .ledger
            .record_consumption_at(user, apple.id, 100.0, datetime!(2024-09-12 12:00 UTC))
            .await
            .unwrap();

        let err = env
            .ledger
            .remove_consumption(user, time::macros::date!(2024 - 09 - 13), entry.id)
            .await
            .unwrap_err();
        assert!(matches!(err, DiaryError::EntryNotFound));
    }

    #[tokio::test]
    async fn vanished_product_degrades_the_listing_instead_of_failing_it() {
        let mystery = product("Mystery meat", 250.0);
        let env = env_with(vec![mystery.clone()]);
        let user = Uuid::new_v4();
        let noon = datetime!(2024-09-12 12:00 UTC);

        env.ledger
            .record_consumption_at(user, mystery.id, 40.0, noon)
            .await
            .unwrap();
        env.catalog.forget(mystery.id);

        let listed = env.ledger.list_consumption(user, day_of(noon)).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert!(listed[0].title.is_none());
    }

    #[tokio::test]
    async fn each_record_call_writes_exactly_once() {
        let apple = product("Apple", 52.0);
        let env = env_with(vec![apple.clone()]);
        let user = Uuid::new_v4();
        let noon = datetime!(2024-09-12 12:00 UTC);

        env.ledger
            .record_consumption_at(user, apple.id, 100.0, noon)
            .await
            .unwrap();
        env.ledger
            .record_consumption_at(user, apple.id, 120.0, noon)
            .await
            .unwrap();
        assert_eq!(env.diaries.save_count(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_records_keep_a_single_entry_per_day() {
        let apple = product("Apple", 52.0);
        let env = env_with(vec![apple.clone()]);
        let user = Uuid::new_v4();
        let noon = datetime!(2024-09-12 12:00 UTC);

        let mut handles = Vec::new();
        for i in 0..16u32 {
            let ledger = env.ledger.clone();
            let product_id = apple.id;
            handles.push(tokio::spawn(async move {
                ledger
                    .record_consumption_at(user, product_id, 100.0 + f64::from(i), noon)
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let listed = env.ledger.list_consumption(user, day_of(noon)).await.unwrap();
        assert_eq!(listed.len(), 1);
    }
}
