use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::{employee_report::EmployeeReport, pay_period::PayPeriod};

const WIRE_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayPeriodView {
    #[schema(example = "2023-03-01", format = "date")]
    pub start_date: String,
    #[schema(example = "2023-03-15", format = "date")]
    pub end_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeReportView {
    #[serde(rename = "employeeID")]
    #[schema(example = 100)]
    pub employee_id: u64,
    pub pay_period: PayPeriodView,
    #[schema(example = "$160.00")]
    pub amount_paid: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeReports {
    pub employee_reports: Vec<EmployeeReportView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayrollReportResponse {
    pub payroll_report: EmployeeReports,
}

/// `$` followed by the amount rounded to exactly two decimals.
pub fn format_amount(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}

impl From<&PayPeriod> for PayPeriodView {
    fn from(period: &PayPeriod) -> Self {
        Self {
            start_date: period.start_date.format(WIRE_DATE_FORMAT).to_string(),
            end_date: period.end_date.format(WIRE_DATE_FORMAT).to_string(),
        }
    }
}

impl From<&EmployeeReport> for EmployeeReportView {
    fn from(report: &EmployeeReport) -> Self {
        Self {
            employee_id: report.employee_id,
            pay_period: PayPeriodView::from(&report.pay_period),
            amount_paid: format_amount(report.amount),
        }
    }
}

pub fn format_report(reports: &[EmployeeReport]) -> PayrollReportResponse {
    PayrollReportResponse {
        payroll_report: EmployeeReports {
            employee_reports: reports.iter().map(EmployeeReportView::from).collect(),
        },
    }
}
