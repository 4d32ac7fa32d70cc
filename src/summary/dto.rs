use serde::Serialize;
use time::Date;

use super::store::SummaryRecord;

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    #[serde(with = "crate::day::day_string")]
    pub date: Date,
    pub daily_consumed: f64,
    pub daily_rate: f64,
    pub daily_left: f64,
    pub percentage: f64,
}

impl From<SummaryRecord> for SummaryResponse {
    fn from(record: SummaryRecord) -> Self {
        Self {
            date: record.date,
            daily_consumed: record.daily_consumed,
            daily_rate: record.daily_rate,
            daily_left: record.daily_left,
            percentage: record.percentage,
        }
    }
}
