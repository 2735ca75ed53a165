use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::fmt;

use super::errors::IngestError;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Raw value of one cell, before any coercion
///
/// Both readers map blanks (empty text, empty or error spreadsheet cells, NaN)
/// to [`CellValue::Absent`], so the coordinator never needs to know where a
/// row came from.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Absent,
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
}

impl CellValue {
    /// Wraps text, treating blank strings as absent
    pub fn text(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            CellValue::Absent
        } else {
            CellValue::Text(trimmed.to_string())
        }
    }

    /// Wraps a float, treating NaN as absent
    pub fn float(value: f64) -> Self {
        if value.is_nan() {
            CellValue::Absent
        } else {
            CellValue::Float(value)
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, CellValue::Absent)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Absent => Ok(()),
            CellValue::Text(value) => f.write_str(value),
            CellValue::Integer(value) => write!(f, "{}", value),
            // Spreadsheets store every number as a float; "0771234567" must not become "771234567.0".
            CellValue::Float(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                write!(f, "{:.0}", value)
            }
            CellValue::Float(value) => write!(f, "{}", value),
            CellValue::Bool(value) => write!(f, "{}", value),
            CellValue::Date(value) => write!(f, "{}", value.format(DATE_FORMAT)),
        }
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok().or_else(|| {
        DATETIME_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .map(|datetime| datetime.date())
    })
}

/// One data row of an uploaded file, keyed by header name
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    line: usize,
    fields: HashMap<String, CellValue>,
}

impl Row {
    pub fn new(line: usize, fields: HashMap<String, CellValue>) -> Self {
        Self { line, fields }
    }

    /// 1-based position among the data rows of the file
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn is_blank(&self) -> bool {
        self.fields.values().all(CellValue::is_absent)
    }

    /// Raw cell lookup; a column missing from the header is an error
    pub fn get(&self, field: &str) -> Result<&CellValue, IngestError> {
        self.fields
            .get(field)
            .ok_or_else(|| IngestError::row(self.line, field, "column is missing"))
    }

    /// Non-empty text value
    pub fn text(&self, field: &str) -> Result<String, IngestError> {
        match self.get(field)? {
            CellValue::Absent => Err(IngestError::row(self.line, field, "value is required")),
            value => Ok(value.to_string()),
        }
    }

    /// Text value, empty when the cell is blank
    pub fn optional_text(&self, field: &str) -> Result<String, IngestError> {
        Ok(self.get(field)?.to_string())
    }

    pub fn date(&self, field: &str) -> Result<NaiveDate, IngestError> {
        self.optional_date(field)?
            .ok_or_else(|| IngestError::row(self.line, field, "value is required"))
    }

    /// Date value, `None` when the cell is blank
    pub fn optional_date(&self, field: &str) -> Result<Option<NaiveDate>, IngestError> {
        match self.get(field)? {
            CellValue::Absent => Ok(None),
            CellValue::Date(date) => Ok(Some(*date)),
            CellValue::Text(raw) => parse_date(raw).map(Some).ok_or_else(|| {
                IngestError::row(
                    self.line,
                    field,
                    format!("expected a YYYY-MM-DD date, got '{}'", raw),
                )
            }),
            other => Err(IngestError::row(
                self.line,
                field,
                format!("expected a date, got '{}'", other),
            )),
        }
    }

    /// Whole number; float cells are truncated toward zero
    pub fn integer(&self, field: &str) -> Result<i64, IngestError> {
        match self.get(field)? {
            CellValue::Integer(value) => Ok(*value),
            CellValue::Float(value) if value.is_finite() => Ok(value.trunc() as i64),
            CellValue::Text(raw) => raw.parse::<i64>().map_err(|_| {
                IngestError::row(
                    self.line,
                    field,
                    format!("expected an integer, got '{}'", raw),
                )
            }),
            CellValue::Absent => Err(IngestError::row(self.line, field, "value is required")),
            other => Err(IngestError::row(
                self.line,
                field,
                format!("expected an integer, got '{}'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[(&str, CellValue)]) -> Row {
        Row::new(
            3,
            cells
                .iter()
                .map(|(key, value)| (key.to_string(), value.clone()))
                .collect(),
        )
    }

    #[test]
    fn blank_text_is_absent() {
        assert_eq!(CellValue::text("   "), CellValue::Absent);
        assert_eq!(CellValue::text(" Acme "), CellValue::Text("Acme".to_string()));
        assert!(CellValue::float(f64::NAN).is_absent());
    }

    #[test]
    fn integral_floats_render_without_fraction() {
        assert_eq!(CellValue::Float(263771234.0).to_string(), "263771234");
        assert_eq!(CellValue::Float(2.5).to_string(), "2.5");
    }

    #[test]
    fn missing_column_names_row_and_field() {
        let err = row(&[]).text("email").unwrap_err();
        assert_eq!(err.to_string(), "Row 3: email: column is missing");
    }

    #[test]
    fn optional_date_accepts_blank_and_text() {
        let row = row(&[
            ("end_date", CellValue::Absent),
            ("start_date", CellValue::text("2021-03-01")),
            ("hired", CellValue::text("2021-03-01 00:00:00")),
        ]);

        assert_eq!(row.optional_date("end_date").unwrap(), None);
        assert_eq!(
            row.date("start_date").unwrap(),
            NaiveDate::from_ymd_opt(2021, 3, 1).unwrap()
        );
        assert_eq!(
            row.date("hired").unwrap(),
            NaiveDate::from_ymd_opt(2021, 3, 1).unwrap()
        );
    }

    #[test]
    fn malformed_date_is_rejected() {
        let row = row(&[("start_date", CellValue::text("01/03/2021"))]);
        assert!(matches!(
            row.date("start_date"),
            Err(IngestError::RowCoercion { row: 3, .. })
        ));
    }

    #[test]
    fn integer_coercion() {
        let row = row(&[
            ("a", CellValue::text("42")),
            ("b", CellValue::Float(17.9)),
            ("c", CellValue::text("many")),
            ("d", CellValue::Integer(-1)),
        ]);

        assert_eq!(row.integer("a").unwrap(), 42);
        assert_eq!(row.integer("b").unwrap(), 17);
        assert!(row.integer("c").is_err());
        assert_eq!(row.integer("d").unwrap(), -1);
    }

    #[test]
    fn blank_row_detection() {
        assert!(row(&[("a", CellValue::Absent)]).is_blank());
        assert!(!row(&[("a", CellValue::Integer(1))]).is_blank());
    }
}
