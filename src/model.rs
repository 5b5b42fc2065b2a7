pub mod employee_report;
pub mod pay_group;
pub mod pay_period;
pub mod time_sheet;
