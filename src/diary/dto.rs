use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::ledger::ListedEntry;
use super::store::{ConsumptionEntry, Diary};

/// Request body for logging a consumed product.
#[derive(Debug, Deserialize)]
pub struct ConsumeRequest {
    pub product_id: Uuid,
    /// Grams consumed; must be positive.
    pub weight: f64,
}

#[derive(Debug, Serialize)]
pub struct ConsumeResponse {
    pub message: String,
    pub entry: ConsumptionEntry,
    pub diary: Diary,
}

#[derive(Debug, Serialize)]
pub struct RemoveResponse {
    pub message: String,
    pub diary: Diary,
}

#[derive(Debug, Serialize)]
pub struct EntryView {
    pub id: Uuid,
    pub product_id: Uuid,
    pub title: Option<String>,
    pub weight: f64,
    pub calories: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub consumed_at: OffsetDateTime,
}

impl From<ListedEntry> for EntryView {
    fn from(listed: ListedEntry) -> Self {
        Self {
            id: listed.entry.id,
            product_id: listed.entry.product_id,
            title: listed.title,
            weight: listed.entry.weight,
            calories: listed.entry.calories,
            consumed_at: listed.entry.consumed_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DayConsumptionResponse {
    #[serde(with = "crate::day::day_string")]
    pub date: Date,
    pub consumed_products: Vec<EntryView>,
}
