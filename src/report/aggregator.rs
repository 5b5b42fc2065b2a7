use rust_decimal::Decimal;
use tracing::debug;

use crate::model::{employee_report::EmployeeReport, pay_period::PayPeriod};
use crate::store::{PayrollStore, PayrollTransaction, StoreError};

/// Adds one row's pay to the employee's total for `period`, inside `tx`.
///
/// The store applies this as a single upsert-with-increment, so two
/// contributions to the same key always sum.
pub async fn accumulate(
    tx: &mut dyn PayrollTransaction,
    employee_id: u64,
    period: PayPeriod,
    amount: Decimal,
) -> Result<(), StoreError> {
    debug!(
        employee_id,
        period_start = %period.start_date,
        %amount,
        "Accumulating pay"
    );
    tx.accumulate(employee_id, period, amount).await
}

/// The whole report, ordered by employee id then period start.
pub async fn list_all(store: &dyn PayrollStore) -> Result<Vec<EmployeeReport>, StoreError> {
    let mut reports = store.list_aggregates().await?;
    reports.sort_by_key(|r| (r.employee_id, r.pay_period.start_date));
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryPayrollStore;
    use chrono::NaiveDate;

    fn period(y: i32, m: u32, d: u32) -> PayPeriod {
        PayPeriod::containing(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[actix_web::test]
    async fn same_key_sums_within_one_transaction() {
        let store = MemoryPayrollStore::new();
        let mut tx = store.begin().await.unwrap();
        accumulate(tx.as_mut(), 1, period(2023, 3, 2), Decimal::new(15, 0))
            .await
            .unwrap();
        accumulate(tx.as_mut(), 1, period(2023, 3, 14), Decimal::new(25, 0))
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let reports = list_all(&store).await.unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].amount, Decimal::new(40, 0));
    }

    #[actix_web::test]
    async fn separate_periods_and_employees_stay_separate() {
        let store = MemoryPayrollStore::new();
        let mut tx = store.begin().await.unwrap();
        accumulate(tx.as_mut(), 2, period(2023, 3, 20), Decimal::ONE).await.unwrap();
        accumulate(tx.as_mut(), 1, period(2023, 3, 20), Decimal::ONE).await.unwrap();
        accumulate(tx.as_mut(), 1, period(2023, 3, 1), Decimal::ONE).await.unwrap();
        tx.commit().await.unwrap();

        let keys: Vec<_> = list_all(&store)
            .await
            .unwrap()
            .into_iter()
            .map(|r| (r.employee_id, r.pay_period.start_date.to_string()))
            .collect();
        assert_eq!(
            keys,
            vec![
                (1, "2023-03-01".to_string()),
                (1, "2023-03-16".to_string()),
                (2, "2023-03-16".to_string()),
            ]
        );
    }

    #[actix_web::test]
    async fn accumulates_across_transactions() {
        let store = MemoryPayrollStore::new();
        for amount in [Decimal::new(10, 0), Decimal::new(5, 1)] {
            let mut tx = store.begin().await.unwrap();
            accumulate(tx.as_mut(), 1, period(2023, 3, 2), amount).await.unwrap();
            tx.commit().await.unwrap();
        }
        assert_eq!(list_all(&store).await.unwrap()[0].amount, Decimal::new(105, 1));
    }
}
