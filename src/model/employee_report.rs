use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::model::pay_period::PayPeriod;

/// Accumulated pay for one employee within one pay period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeReport {
    pub employee_id: u64,
    pub pay_period: PayPeriod,
    pub amount: Decimal,
}
