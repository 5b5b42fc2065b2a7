use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{MySql, MySqlPool, Transaction, prelude::FromRow};

use super::{PayrollStore, PayrollTransaction, StoreError};
use crate::model::{
    employee_report::EmployeeReport,
    pay_group::PayGroup,
    pay_period::PayPeriod,
    time_sheet::{BatchId, TimeSheet},
};

/// MySQL reports duplicate keys under this SQLSTATE.
const DUPLICATE_KEY_SQLSTATE: &str = "23000";

#[derive(Clone)]
pub struct MySqlPayrollStore {
    pool: MySqlPool,
}

impl MySqlPayrollStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct EmployeeReportRow {
    employee_id: u64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    amount: Decimal,
}

impl From<EmployeeReportRow> for EmployeeReport {
    fn from(row: EmployeeReportRow) -> Self {
        Self {
            employee_id: row.employee_id,
            pay_period: PayPeriod {
                start_date: row.start_date,
                end_date: row.end_date,
            },
            amount: row.amount,
        }
    }
}

fn is_duplicate_key(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(DUPLICATE_KEY_SQLSTATE),
        _ => false,
    }
}

#[async_trait]
impl PayrollStore for MySqlPayrollStore {
    async fn seed_pay_groups(&self, groups: &[PayGroup]) -> Result<(), StoreError> {
        for group in groups {
            sqlx::query(r#"INSERT IGNORE INTO pay_groups (id, rate) VALUES (?, ?)"#)
                .bind(&group.id)
                .bind(group.rate)
                .execute(&self.pool)
                .await?;
        }
        Ok(())
    }

    async fn load_pay_groups(&self) -> Result<Vec<PayGroup>, StoreError> {
        let groups = sqlx::query_as::<_, PayGroup>(r#"SELECT id, rate FROM pay_groups"#)
            .fetch_all(&self.pool)
            .await?;
        Ok(groups)
    }

    async fn batch_exists(&self, batch_id: BatchId) -> Result<bool, StoreError> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM time_report_batches WHERE batch_id = ?"#,
        )
        .bind(batch_id.0)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }

    async fn begin(&self) -> Result<Box<dyn PayrollTransaction>, StoreError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(MySqlPayrollTransaction { tx }))
    }

    async fn list_aggregates(&self) -> Result<Vec<EmployeeReport>, StoreError> {
        let rows = sqlx::query_as::<_, EmployeeReportRow>(
            r#"
            SELECT r.employee_id, p.start_date, p.end_date, r.amount
            FROM employee_reports r
            JOIN pay_periods p ON p.start_date = r.pay_period_start
            ORDER BY r.employee_id, p.start_date
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(EmployeeReport::from).collect())
    }
}

struct MySqlPayrollTransaction {
    tx: Transaction<'static, MySql>,
}

#[async_trait]
impl PayrollTransaction for MySqlPayrollTransaction {
    async fn claim_batch(&mut self, batch_id: BatchId) -> Result<(), StoreError> {
        let result = sqlx::query(r#"INSERT INTO time_report_batches (batch_id) VALUES (?)"#)
            .bind(batch_id.0)
            .execute(&mut *self.tx)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key(&e) => Err(StoreError::Duplicate(format!("batch {batch_id}"))),
            Err(e) => Err(e.into()),
        }
    }

    async fn insert_time_sheet(&mut self, record: &TimeSheet) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT IGNORE INTO time_sheets
                (batch_id, date, employee_id, hours, pay_group_id)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.batch_id.0)
        .bind(record.date)
        .bind(record.employee_id)
        .bind(record.hours)
        .bind(&record.pay_group_id)
        .execute(&mut *self.tx)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn accumulate(
        &mut self,
        employee_id: u64,
        period: PayPeriod,
        amount: Decimal,
    ) -> Result<(), StoreError> {
        sqlx::query(r#"INSERT IGNORE INTO pay_periods (start_date, end_date) VALUES (?, ?)"#)
            .bind(period.start_date)
            .bind(period.end_date)
            .execute(&mut *self.tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO employee_reports (employee_id, pay_period_start, amount)
            VALUES (?, ?, ?)
            ON DUPLICATE KEY UPDATE amount = amount + VALUES(amount)
            "#,
        )
        .bind(employee_id)
        .bind(period.start_date)
        .bind(amount)
        .execute(&mut *self.tx)
        .await?;

        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let this = *self;
        this.tx.commit().await?;
        Ok(())
    }
}
