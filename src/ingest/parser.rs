use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{AsRefStr, Display, EnumCount as EnumCountMacro, EnumIter};

use crate::ingest::error::{IngestError, RowError};

/// Day/month/year, slash separated. Single digit days and months are accepted.
const DATE_FORMAT: &str = "%d/%m/%Y";

pub const EXPECTED_HEADER: &str = "date,hours worked,employee id,job group";

/// Columns of a time report, in the order they must appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumIter, EnumCountMacro)]
pub enum Column {
    #[strum(serialize = "date")]
    Date,
    #[strum(serialize = "hours worked")]
    HoursWorked,
    #[strum(serialize = "employee id")]
    EmployeeId,
    #[strum(serialize = "job group")]
    JobGroup,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRecord {
    pub date: NaiveDate,
    pub hours: f64,
    pub employee_id: u64,
    pub pay_group: String,
}

/// Reads an uploaded report and checks its header.
///
/// Returns the data rows unparsed; nothing past the header is looked at when
/// the header is wrong.
pub fn read_time_report(contents: &[u8]) -> Result<Vec<StringRecord>, IngestError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(contents);
    let mut records = reader.records();

    let header = records
        .next()
        .transpose()
        .map_err(IngestError::UnreadableCsv)?
        .ok_or(IngestError::Header)?;
    parse_header(&header)?;

    records
        .collect::<Result<Vec<_>, _>>()
        .map_err(IngestError::UnreadableCsv)
}

/// Column names are case and order sensitive.
pub fn parse_header(header: &StringRecord) -> Result<(), IngestError> {
    let matches = header.len() == Column::COUNT
        && header
            .iter()
            .zip(Column::iter())
            .all(|(name, column)| name == column.as_ref());

    if matches {
        Ok(())
    } else {
        Err(IngestError::Header)
    }
}

/// Parses one data row. Fields are checked in column order and the first
/// failure wins. The job group is taken as is.
pub fn parse_row(record: &StringRecord, line: u64) -> Result<ParsedRecord, RowError> {
    if record.len() != Column::COUNT {
        return Err(RowError::ColumnCount {
            line,
            expected: Column::COUNT,
            found: record.len(),
        });
    }
    let field = |column: Column| record.get(column as usize).unwrap_or_default();

    let raw_date = field(Column::Date);
    let date = parse_date(raw_date).map_err(|reason| RowError::DateFormat {
        line,
        column: Column::Date,
        raw: raw_date.to_string(),
        reason,
    })?;

    let raw_hours = field(Column::HoursWorked);
    let hours = raw_hours
        .parse::<f64>()
        .map_err(|e| e.to_string())
        .and_then(|hours| {
            if hours.is_finite() {
                Ok(hours)
            } else {
                Err("value is not a finite number".to_string())
            }
        })
        .map_err(|reason| RowError::NumericFormat {
            line,
            column: Column::HoursWorked,
            raw: raw_hours.to_string(),
            expected: "a float",
            reason,
        })?;

    let raw_employee_id = field(Column::EmployeeId);
    let employee_id = raw_employee_id
        .parse::<u64>()
        .map_err(|e| RowError::NumericFormat {
            line,
            column: Column::EmployeeId,
            raw: raw_employee_id.to_string(),
            expected: "an integer",
            reason: e.to_string(),
        })?;

    Ok(ParsedRecord {
        date,
        hours,
        employee_id,
        pay_group: field(Column::JobGroup).to_string(),
    })
}

/// chrono skips whitespace and takes any number of year digits, so both are
/// checked here before the format is applied.
fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    if raw.chars().any(char::is_whitespace) {
        return Err("date contains whitespace".to_string());
    }
    let year = raw.rsplit('/').next().unwrap_or_default();
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return Err("year must have four digits".to_string());
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn record(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    #[test]
    fn expected_header_matches_columns() {
        let joined = Column::iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(",");
        assert_eq!(joined, EXPECTED_HEADER);
    }

    #[test]
    fn accepts_exact_header() {
        assert!(parse_header(&record(&["date", "hours worked", "employee id", "job group"])).is_ok());
    }

    #[rstest]
    #[case(&["date", "hours worked", "employee id"])]
    #[case(&["date", "hours worked", "employee id", "job group", "notes"])]
    #[case(&["Date", "hours worked", "employee id", "job group"])]
    #[case(&["hours worked", "date", "employee id", "job group"])]
    #[case(&["date", "hours", "employee id", "job group"])]
    #[case(&["date ", "hours worked", "employee id", "job group"])]
    fn rejects_wrong_header(#[case] fields: &[&str]) {
        assert!(matches!(parse_header(&record(fields)), Err(IngestError::Header)));
    }

    #[test]
    fn parses_a_valid_row() {
        let parsed = parse_row(&record(&["1/3/2023", "7.5", "100", "A"]), 2).unwrap();
        assert_eq!(
            parsed,
            ParsedRecord {
                date: NaiveDate::from_ymd_opt(2023, 3, 1).unwrap(),
                hours: 7.5,
                employee_id: 100,
                pay_group: "A".to_string(),
            }
        );
    }

    #[rstest]
    #[case("14/11/2016", 2016, 11, 14)]
    #[case("4/1/2023", 2023, 1, 4)]
    #[case("04/01/2023", 2023, 1, 4)]
    fn parses_day_month_year(#[case] raw: &str, #[case] y: i32, #[case] m: u32, #[case] d: u32) {
        let parsed = parse_row(&record(&[raw, "1", "1", "A"]), 2).unwrap();
        assert_eq!(parsed.date, NaiveDate::from_ymd_opt(y, m, d).unwrap());
    }

    #[rstest]
    #[case("2023-03-01")]
    #[case("31/2/2023")]
    #[case("3/13/2023")]
    #[case("")]
    #[case("1/3/23")]
    #[case(" 1/ 3/2023")]
    #[case("1/3/2023 ")]
    #[case("1/3/+2023")]
    fn rejects_bad_dates(#[case] raw: &str) {
        let err = parse_row(&record(&[raw, "1", "1", "A"]), 4).unwrap_err();
        assert!(matches!(err, RowError::DateFormat { line: 4, .. }));
        assert!(err.to_string().contains(&format!("\"{raw}\"")));
    }

    #[test]
    fn hours_error_names_token_and_float() {
        let err = parse_row(&record(&["1/3/2023", "four", "1", "A"]), 3).unwrap_err();
        let message = err.to_string();
        assert!(matches!(err, RowError::NumericFormat { column: Column::HoursWorked, .. }));
        assert!(message.contains("\"four\""), "{message}");
        assert!(message.contains("float"), "{message}");
    }

    #[rstest]
    #[case("NaN")]
    #[case("inf")]
    fn rejects_non_finite_hours(#[case] raw: &str) {
        let err = parse_row(&record(&["1/3/2023", raw, "1", "A"]), 2).unwrap_err();
        assert!(matches!(err, RowError::NumericFormat { column: Column::HoursWorked, .. }));
    }

    #[rstest]
    #[case("abc")]
    #[case("1.5")]
    #[case("-3")]
    fn rejects_bad_employee_id(#[case] raw: &str) {
        let err = parse_row(&record(&["1/3/2023", "8", raw, "A"]), 2).unwrap_err();
        assert!(matches!(err, RowError::NumericFormat { column: Column::EmployeeId, .. }));
    }

    #[test]
    fn first_failing_field_wins() {
        let err = parse_row(&record(&["bad", "bad", "bad", "A"]), 2).unwrap_err();
        assert!(matches!(err, RowError::DateFormat { .. }));
    }

    #[test]
    fn unknown_job_group_is_kept_verbatim() {
        let parsed = parse_row(&record(&["1/3/2023", "8", "1", "Z"]), 2).unwrap();
        assert_eq!(parsed.pay_group, "Z");
    }

    #[test]
    fn short_row_is_rejected() {
        let err = parse_row(&record(&["1/3/2023", "8"]), 5).unwrap_err();
        assert!(matches!(err, RowError::ColumnCount { line: 5, found: 2, .. }));
        assert_eq!(err.line(), 5);
    }

    #[test]
    fn reads_rows_after_header() {
        let rows = read_time_report(
            b"date,hours worked,employee id,job group\n1/3/2023,8,100,A\n2/3/2023,4,100,B\n",
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[1][3], "B");
    }

    #[test]
    fn header_is_checked_before_rows() {
        let err = read_time_report(b"date,hours,employee id,job group\nnot,a,valid,row\n").unwrap_err();
        assert!(matches!(err, IngestError::Header));
    }

    #[test]
    fn empty_upload_has_no_header() {
        assert!(matches!(read_time_report(b""), Err(IngestError::Header)));
    }
}
