// Storage port for the ingestion pipeline.
//
// The pipeline codes against these traits only. `mysql` is the production
// adapter; `memory` keeps the same transactional behaviour in process and is
// what the tests run against.

pub mod memory;
pub mod mysql;

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::model::{
    employee_report::EmployeeReport, pay_group::PayGroup, pay_period::PayPeriod,
    time_sheet::{BatchId, TimeSheet},
};

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique key already holds a row.
    #[error("duplicate key: {0}")]
    Duplicate(String),

    #[error("backend error: {0}")]
    Backend(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait PayrollStore: Send + Sync {
    /// First-or-create for each group; existing rates are left untouched.
    async fn seed_pay_groups(&self, groups: &[PayGroup]) -> Result<(), StoreError>;

    async fn load_pay_groups(&self) -> Result<Vec<PayGroup>, StoreError>;

    /// Plain lookup outside of any transaction.
    async fn batch_exists(&self, batch_id: BatchId) -> Result<bool, StoreError>;

    async fn begin(&self) -> Result<Box<dyn PayrollTransaction>, StoreError>;

    /// Every aggregate, ordered by employee id then period start.
    async fn list_aggregates(&self) -> Result<Vec<EmployeeReport>, StoreError>;
}

/// One atomic unit of work. Dropping it without calling `commit` rolls back.
#[async_trait]
pub trait PayrollTransaction: Send {
    /// Records the batch id. Fails with `StoreError::Duplicate` when it was
    /// already claimed by a committed upload.
    async fn claim_batch(&mut self, batch_id: BatchId) -> Result<(), StoreError>;

    /// First-or-create on `(batch_id, date, employee_id)`. Returns whether a
    /// new row was written.
    async fn insert_time_sheet(&mut self, record: &TimeSheet) -> Result<bool, StoreError>;

    /// Adds `amount` to the aggregate keyed by `(employee_id, period.start_date)`,
    /// creating it (and the period) when absent.
    async fn accumulate(
        &mut self,
        employee_id: u64,
        period: PayPeriod,
        amount: Decimal,
    ) -> Result<(), StoreError>;

    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}
