pub mod error;
pub mod filename;
pub mod parser;

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::ingest::error::{IngestError, RowError};
use crate::ingest::parser::{Column, parse_row, read_time_report};
use crate::model::{
    pay_group::RateTable,
    pay_period::PayPeriod,
    time_sheet::{BatchId, TimeSheet},
};
use crate::report::aggregator;
use crate::store::{PayrollStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestSummary {
    pub batch_id: BatchId,
    /// Data rows read from the upload.
    pub rows_read: usize,
    /// Raw time sheet rows written; repeated (date, employee) rows count once.
    pub rows_inserted: u64,
}

/// Ingests one uploaded time report as a single all-or-nothing unit.
///
/// Every row is written and added to the payroll report inside one store
/// transaction. Any failure drops the transaction, so a rejected upload
/// leaves no raw rows and no aggregate changes behind.
///
/// The batch id is claimed even when the report holds only its header, so
/// an empty report cannot be resubmitted under the same id later.
#[instrument(
    name = "ingest_time_report",
    skip_all,
    fields(batch_id = %batch_id, upload_id = %Uuid::new_v4(), bytes = contents.len())
)]
pub async fn ingest(
    store: &dyn PayrollStore,
    rates: &RateTable,
    batch_id: BatchId,
    contents: &[u8],
) -> Result<IngestSummary, IngestError> {
    match run(store, rates, batch_id, contents).await {
        Ok(summary) => {
            info!(
                rows_read = summary.rows_read,
                rows_inserted = summary.rows_inserted,
                "Time report committed"
            );
            Ok(summary)
        }
        Err(IngestError::Store(e)) => {
            tracing::error!(error = %e, "Time report aborted by store failure");
            Err(IngestError::Store(e))
        }
        Err(IngestError::Row(e)) => {
            warn!(line = e.line(), error = %e, "Time report rejected at row");
            Err(IngestError::Row(e))
        }
        Err(e) => {
            warn!(error = %e, "Time report rejected");
            Err(e)
        }
    }
}

async fn run(
    store: &dyn PayrollStore,
    rates: &RateTable,
    batch_id: BatchId,
    contents: &[u8],
) -> Result<IngestSummary, IngestError> {
    // Fast rejection only; the claim below is what actually guards the id.
    if store.batch_exists(batch_id).await? {
        return Err(IngestError::DuplicateBatch(batch_id));
    }

    let rows = read_time_report(contents)?;
    debug!(rows = rows.len(), "Header accepted");

    let mut tx = store.begin().await?;
    match tx.claim_batch(batch_id).await {
        Err(StoreError::Duplicate(_)) => return Err(IngestError::DuplicateBatch(batch_id)),
        other => other?,
    }

    let mut rows_inserted = 0;
    for (index, record) in rows.iter().enumerate() {
        // Header is line 1.
        let line = record
            .position()
            .map_or(index as u64 + 2, |position| position.line());
        let parsed = parse_row(record, line)?;

        let sheet = TimeSheet {
            batch_id,
            date: parsed.date,
            employee_id: parsed.employee_id,
            hours: parsed.hours,
            pay_group_id: parsed.pay_group,
        };
        if tx.insert_time_sheet(&sheet).await? {
            rows_inserted += 1;
        } else {
            debug!(line, employee_id = sheet.employee_id, date = %sheet.date, "Row already stored for this batch");
        }

        let period = PayPeriod::containing(sheet.date);
        let amount = rates
            .amount_for(&sheet.pay_group_id, sheet.hours)
            .ok_or_else(|| RowError::NumericFormat {
                line,
                column: Column::HoursWorked,
                raw: sheet.hours.to_string(),
                expected: "a payable number of hours",
                reason: "amount is out of range".to_string(),
            })?;

        aggregator::accumulate(tx.as_mut(), sheet.employee_id, period, amount).await?;
    }

    tx.commit().await?;

    Ok(IngestSummary {
        batch_id,
        rows_read: rows.len(),
        rows_inserted,
    })
}
