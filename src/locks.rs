use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// Registry of per-user mutexes serializing document mutations.
///
/// Both per-user documents (the diary and the summary history) are written
/// read-modify-write; the guard must be held from load to save. Cells are
/// never evicted, so the map is bounded by the number of distinct users seen
/// by one process.
#[derive(Default)]
pub struct UserLocks {
    cells: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, user_id: Uuid) -> OwnedMutexGuard<()> {
        let cell = self.cells.entry(user_id).or_default().clone();
        cell.lock_owned().await
    }
}
