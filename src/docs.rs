use crate::api::report::TimeReportUpload;
use crate::api::response::ApiResponse;
use crate::report::formatter::{
    EmployeeReportView, EmployeeReports, PayPeriodView, PayrollReportResponse,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Payroll Ingest API",
        version = "0.1.0",
        description = r#"
## Time report ingestion

Upload employee time reports as CSV and read back pay per employee and
half-month pay period.

### Uploads
- One CSV per request, multipart field `file`, named `time-report-{id}.csv`
- Header must be exactly `date,hours worked,employee id,job group`
- Dates are day/month/year
- An upload is stored completely or not at all; an id can only be uploaded once

### Pay periods
- 1st to 15th, and 16th plus fourteen days
"#,
    ),
    paths(
        crate::api::report::upload_time_report,
        crate::api::report::get_payroll_report,
    ),
    components(
        schemas(
            TimeReportUpload,
            ApiResponse,
            PayrollReportResponse,
            EmployeeReports,
            EmployeeReportView,
            PayPeriodView
        )
    ),
    tags(
        (name = "Report", description = "Time report upload and payroll report"),
    )
)]
pub struct ApiDoc;
