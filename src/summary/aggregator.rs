use std::sync::Arc;

use time::Date;
use uuid::Uuid;

use crate::diary::ledger::DiaryLedger;
use crate::error::DiaryError;
use crate::locks::UserLocks;

use super::store::{DailySummary, SummaryRecord, SummaryStore};

/// Calories allowed per day. Fixed for every user in the current scope.
pub const DAILY_RATE: f64 = 2800.0;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Derives daily totals from the diary and keeps the per-user history of
/// daily summaries.
pub struct SummaryAggregator {
    store: Arc<dyn SummaryStore>,
    ledger: Arc<DiaryLedger>,
    locks: Arc<UserLocks>,
}

impl SummaryAggregator {
    pub fn new(store: Arc<dyn SummaryStore>, ledger: Arc<DiaryLedger>, locks: Arc<UserLocks>) -> Self {
        Self {
            store,
            ledger,
            locks,
        }
    }

    /// Recomputes the totals for one day and upserts them into the user's
    /// summary history. A day without entries is `NoEntriesForDate`, not a
    /// zero-valued summary: absence stays distinguishable from "nothing
    /// eaten was logged as zero".
    pub async fn compute_daily_summary(
        &self,
        user_id: Uuid,
        date: Date,
    ) -> Result<SummaryRecord, DiaryError> {
        let _guard = self.locks.acquire(user_id).await;
        let entries = self.ledger.entries_for_day(user_id, date).await?;
        if entries.is_empty() {
            return Err(DiaryError::NoEntriesForDate);
        }

        let daily_consumed: f64 = entries.iter().map(|e| e.calories).sum();
        let record = SummaryRecord {
            date,
            daily_consumed,
            daily_rate: DAILY_RATE,
            daily_left: DAILY_RATE - daily_consumed,
            percentage: round2(daily_consumed / DAILY_RATE * 100.0),
        };

        let mut summary = self
            .store
            .load(user_id)
            .await?
            .unwrap_or_else(|| DailySummary::empty(user_id));
        match summary.records.iter().position(|r| r.date == date) {
            Some(index) => summary.records[index] = record.clone(),
            None => summary.records.push(record.clone()),
        }
        self.store.save(&summary).await?;
        Ok(record)
    }
}
