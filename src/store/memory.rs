// In memory payroll store.
//
// Purpose
// - Exercise the ingestion pipeline and HTTP handlers without a database.
//
// Transactions take the store's lock for their whole lifetime and work on a
// staged copy of the state. `commit` writes the copy back; dropping the
// transaction discards it.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{PayrollStore, PayrollTransaction, StoreError};
use crate::model::{
    employee_report::EmployeeReport,
    pay_group::PayGroup,
    pay_period::PayPeriod,
    time_sheet::{BatchId, TimeSheet},
};

#[derive(Debug, Clone, Default)]
struct State {
    pay_groups: HashMap<String, Decimal>,
    batches: BTreeSet<BatchId>,
    time_sheets: BTreeMap<(BatchId, NaiveDate, u64), TimeSheet>,
    pay_periods: BTreeMap<NaiveDate, NaiveDate>,
    employee_reports: BTreeMap<(u64, NaiveDate), Decimal>,
}

#[derive(Clone, Default)]
pub struct MemoryPayrollStore {
    state: Arc<Mutex<State>>,
}

impl MemoryPayrollStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn time_sheets(&self) -> Vec<TimeSheet> {
        self.state.lock().await.time_sheets.values().cloned().collect()
    }
}

#[async_trait]
impl PayrollStore for MemoryPayrollStore {
    async fn seed_pay_groups(&self, groups: &[PayGroup]) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        for group in groups {
            state
                .pay_groups
                .entry(group.id.clone())
                .or_insert(group.rate);
        }
        Ok(())
    }

    async fn load_pay_groups(&self) -> Result<Vec<PayGroup>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .pay_groups
            .iter()
            .map(|(id, rate)| PayGroup::new(id.clone(), *rate))
            .collect())
    }

    async fn batch_exists(&self, batch_id: BatchId) -> Result<bool, StoreError> {
        Ok(self.state.lock().await.batches.contains(&batch_id))
    }

    async fn begin(&self) -> Result<Box<dyn PayrollTransaction>, StoreError> {
        let guard = self.state.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(MemoryTransaction { guard, staged }))
    }

    async fn list_aggregates(&self) -> Result<Vec<EmployeeReport>, StoreError> {
        let state = self.state.lock().await;
        state
            .employee_reports
            .iter()
            .map(|(&(employee_id, start_date), &amount)| {
                let end_date = state.pay_periods.get(&start_date).copied().ok_or_else(|| {
                    StoreError::Unavailable(format!("pay period {start_date} is missing"))
                })?;
                Ok(EmployeeReport {
                    employee_id,
                    pay_period: PayPeriod {
                        start_date,
                        end_date,
                    },
                    amount,
                })
            })
            .collect()
    }
}

struct MemoryTransaction {
    guard: OwnedMutexGuard<State>,
    staged: State,
}

#[async_trait]
impl PayrollTransaction for MemoryTransaction {
    async fn claim_batch(&mut self, batch_id: BatchId) -> Result<(), StoreError> {
        if self.staged.batches.insert(batch_id) {
            Ok(())
        } else {
            Err(StoreError::Duplicate(format!("batch {batch_id}")))
        }
    }

    async fn insert_time_sheet(&mut self, record: &TimeSheet) -> Result<bool, StoreError> {
        if self.staged.time_sheets.contains_key(&record.key()) {
            return Ok(false);
        }
        self.staged.time_sheets.insert(record.key(), record.clone());
        Ok(true)
    }

    async fn accumulate(
        &mut self,
        employee_id: u64,
        period: PayPeriod,
        amount: Decimal,
    ) -> Result<(), StoreError> {
        self.staged
            .pay_periods
            .entry(period.start_date)
            .or_insert(period.end_date);
        *self
            .staged
            .employee_reports
            .entry((employee_id, period.start_date))
            .or_insert(Decimal::ZERO) += amount;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let MemoryTransaction { mut guard, staged } = *self;
        *guard = staged;
        Ok(())
    }
}
