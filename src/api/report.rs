use actix_multipart::{Field, Multipart, MultipartError};
use actix_web::{HttpResponse, Responder, web};
use futures_util::StreamExt;
use utoipa::ToSchema;

use crate::api::{AppState, response::ApiResponse};
use crate::ingest::{self, error::IngestError, filename::batch_id_from_filename};
use crate::model::time_sheet::BatchId;
use crate::report::{aggregator, formatter::format_report};

/// Multipart field the time report must be sent in.
pub const UPLOAD_FIELD: &str = "file";

#[derive(ToSchema)]
pub struct TimeReportUpload {
    /// CSV named `time-report-{id}.csv` with header
    /// `date,hours worked,employee id,job group`
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

fn upload_error(e: MultipartError) -> IngestError {
    IngestError::Upload(format!("Unable to read upload: {e}"))
}

/// Finds the `file` part, checks its name and reads it into memory.
///
/// The filename is validated before the body is read so a misnamed upload is
/// rejected without buffering it.
async fn read_upload(
    mut payload: Multipart,
    max_bytes: usize,
) -> Result<(BatchId, Vec<u8>), IngestError> {
    while let Some(field) = payload.next().await {
        let field = field.map_err(upload_error)?;
        if field.content_disposition().get_name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field
            .content_disposition()
            .get_filename()
            .ok_or_else(|| IngestError::Upload("Uploaded file has no filename".to_string()))?
            .to_string();
        let batch_id = batch_id_from_filename(&filename)?;
        let contents = read_field(field, max_bytes).await?;
        return Ok((batch_id, contents));
    }

    Err(IngestError::Upload(format!(
        "Expected a file in form field \"{UPLOAD_FIELD}\""
    )))
}

async fn read_field(mut field: Field, max_bytes: usize) -> Result<Vec<u8>, IngestError> {
    let mut contents = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(upload_error)?;
        if contents.len() + chunk.len() > max_bytes {
            return Err(IngestError::Upload(format!(
                "Uploaded file is larger than {max_bytes} bytes"
            )));
        }
        contents.extend_from_slice(&chunk);
    }
    Ok(contents)
}

/// Upload a time report
#[utoipa::path(
    post,
    path = "/report",
    request_body(
        content = TimeReportUpload,
        description = "Time report CSV",
        content_type = "multipart/form-data"
    ),
    responses(
        (status = 200, description = "Time report ingested", body = ApiResponse, example = json!({
            "statusCode": 200,
            "statusText": "OK",
            "message": "Success! Added time report with ID: 42"
        })),
        (status = 400, description = "Upload rejected, nothing was stored", body = ApiResponse, example = json!({
            "statusCode": 400,
            "statusText": "Bad Request",
            "error": "A record with ID: 42 already exists"
        })),
        (status = 500, description = "Internal server error", body = ApiResponse)
    ),
    tag = "Report"
)]
pub async fn upload_time_report(
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, IngestError> {
    let (batch_id, contents) = read_upload(payload, state.max_upload_bytes).await?;

    let summary = ingest::ingest(state.store.as_ref(), &state.rates, batch_id, &contents).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(format!(
        "Success! Added time report with ID: {}",
        summary.batch_id
    ))))
}

/// Payroll report
#[utoipa::path(
    get,
    path = "/report",
    responses(
        (status = 200, description = "Every employee's pay per pay period", body = crate::report::formatter::PayrollReportResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Report"
)]
pub async fn get_payroll_report(state: web::Data<AppState>) -> actix_web::Result<impl Responder> {
    let reports = aggregator::list_all(state.store.as_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch payroll report");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(format_report(&reports)))
}
