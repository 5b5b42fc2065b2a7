use chrono::NaiveDate;
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// Identifies one uploaded time report. Taken from the upload's filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Serialize, Deserialize)]
pub struct BatchId(pub u32);

/// One row of an uploaded time report, as persisted.
///
/// Keyed by `(batch_id, date, employee_id)`; rows are only ever inserted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSheet {
    pub batch_id: BatchId,
    pub date: NaiveDate,
    pub employee_id: u64,
    pub hours: f64,
    pub pay_group_id: String,
}

impl TimeSheet {
    pub fn key(&self) -> (BatchId, NaiveDate, u64) {
        (self.batch_id, self.date, self.employee_id)
    }
}
