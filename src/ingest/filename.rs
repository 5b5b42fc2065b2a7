use crate::ingest::error::IngestError;
use crate::model::time_sheet::BatchId;

const CSV_EXTENSION: &str = ".csv";

/// Extracts the batch id from an upload name such as `time-report-42.csv`.
///
/// The extension is checked first (case sensitive), then the third
/// dash-separated part of the stem is read as the id.
pub fn batch_id_from_filename(filename: &str) -> Result<BatchId, IngestError> {
    let basename = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let (stem, extension) = match basename.rfind('.') {
        Some(dot) => basename.split_at(dot),
        None => (basename, ""),
    };

    if extension != CSV_EXTENSION {
        return Err(IngestError::InvalidExtension);
    }

    stem.split('-')
        .nth(2)
        .and_then(|id| id.parse::<u32>().ok())
        .map(BatchId)
        .ok_or(IngestError::InvalidFilename)
}
