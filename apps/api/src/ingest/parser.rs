use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use chrono::{NaiveDate, TimeDelta};
use std::io::Cursor;

use super::errors::IngestError;
use super::format::FileFormat;
use super::row::{CellValue, Row};

/// Lazily produced rows of an uploaded file
pub type RowStream = Box<dyn Iterator<Item = Result<Row, IngestError>> + Send>;

/// Opens the file contents with the reader for `format`
///
/// Delimited text is decoded record by record as the stream is consumed.
/// Workbooks have no streaming reader, so the first sheet is loaded up front.
pub fn parse(format: FileFormat, bytes: Vec<u8>) -> Result<RowStream, IngestError> {
    match format {
        FileFormat::DelimitedText => Ok(Box::new(DelimitedRows::new(bytes)?)),
        FileFormat::Spreadsheet => Ok(Box::new(spreadsheet_rows(bytes)?.into_iter().map(Ok))),
    }
}

fn unreadable(err: csv::Error) -> IngestError {
    match err.kind() {
        csv::ErrorKind::Utf8 { .. } => {
            IngestError::UnsupportedFormat("file is not UTF-8 encoded text".to_string())
        }
        _ => IngestError::UnsupportedFormat(format!("unreadable CSV: {}", err)),
    }
}

struct DelimitedRows {
    headers: Vec<String>,
    records: csv::StringRecordsIntoIter<Cursor<Vec<u8>>>,
    line: usize,
}

impl DelimitedRows {
    fn new(bytes: Vec<u8>) -> Result<Self, IngestError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(Cursor::new(bytes));

        let headers = reader
            .headers()
            .map_err(unreadable)?
            .iter()
            .map(str::to_string)
            .collect();

        Ok(Self {
            headers,
            records: reader.into_records(),
            line: 0,
        })
    }
}

impl Iterator for DelimitedRows {
    type Item = Result<Row, IngestError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let record = match self.records.next()? {
                Ok(record) => record,
                Err(err) => return Some(Err(unreadable(err))),
            };
            self.line += 1;

            let fields = self
                .headers
                .iter()
                .enumerate()
                .filter(|(_, header)| !header.is_empty())
                .map(|(index, header)| {
                    let value = record.get(index).map_or(CellValue::Absent, CellValue::text);
                    (header.clone(), value)
                })
                .collect();

            let row = Row::new(self.line, fields);
            if !row.is_blank() {
                return Some(Ok(row));
            }
        }
    }
}

fn spreadsheet_rows(bytes: Vec<u8>) -> Result<Vec<Row>, IngestError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| IngestError::UnsupportedFormat(format!("unreadable workbook: {}", e)))?;

    match workbook.worksheet_range_at(0) {
        Some(range) => {
            let range = range
                .map_err(|e| IngestError::UnsupportedFormat(format!("unreadable worksheet: {}", e)))?;
            Ok(rows_from_range(&range))
        }
        None => Ok(Vec::new()),
    }
}

/// Converts a worksheet into rows keyed by its first row
pub fn rows_from_range(range: &Range<Data>) -> Vec<Row> {
    let mut rows = range.rows();

    let headers: Vec<Option<String>> = match rows.next() {
        Some(cells) => cells
            .iter()
            .map(|cell| match cell_value(cell) {
                CellValue::Absent => None,
                value => Some(value.to_string()),
            })
            .collect(),
        None => return Vec::new(),
    };

    rows.enumerate()
        .filter_map(|(index, cells)| {
            let fields = headers
                .iter()
                .enumerate()
                .filter_map(|(column, header)| {
                    let header = header.as_ref()?;
                    let value = cells.get(column).map_or(CellValue::Absent, cell_value);
                    Some((header.clone(), value))
                })
                .collect();

            let row = Row::new(index + 1, fields);
            (!row.is_blank()).then_some(row)
        })
        .collect()
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Absent,
        Data::String(value) => CellValue::text(value),
        Data::Int(value) => CellValue::Integer(*value),
        Data::Float(value) => CellValue::float(*value),
        Data::Bool(value) => CellValue::Bool(*value),
        Data::DateTime(value) => {
            let serial = value.as_f64();
            excel_date(serial).map_or(CellValue::float(serial), CellValue::Date)
        }
        Data::DateTimeIso(value) | Data::DurationIso(value) => CellValue::text(value),
    }
}

/// Day serial in the 1900 date system; the epoch absorbs the Lotus leap-year bug
fn excel_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }

    let days = TimeDelta::try_days(serial.trunc() as i64)?;
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_signed(days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{ExcelDateTime, ExcelDateTimeType};

    fn collect(format: FileFormat, bytes: &[u8]) -> Vec<Row> {
        parse(format, bytes.to_vec())
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn csv_rows_are_keyed_by_trimmed_header() {
        let rows = collect(
            FileFormat::DelimitedText,
            b" name , employee_count\nAcme,12\nGlobex,7\n",
        );

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].text("name").unwrap(), "Acme");
        assert_eq!(rows[1].integer("employee_count").unwrap(), 7);
        assert_eq!(rows[1].line(), 2);
    }

    #[test]
    fn csv_empty_fields_and_short_rows_are_absent() {
        let rows = collect(
            FileFormat::DelimitedText,
            b"name,end_date,duties\nAda,,\nBob\n,,\n",
        );

        assert_eq!(rows.len(), 2);
        assert!(rows[0].get("end_date").unwrap().is_absent());
        assert!(rows[1].get("duties").unwrap().is_absent());
    }

    #[test]
    fn csv_rejects_non_utf8() {
        let result = parse(FileFormat::DelimitedText, vec![0xff, 0xfe, b'a', b'\n', 0xc3, 0x28])
            .and_then(|rows| rows.collect::<Result<Vec<_>, _>>());

        assert!(matches!(result, Err(IngestError::UnsupportedFormat(_))));
    }

    #[test]
    fn xlsx_workbook_reads_first_sheet() {
        let bytes = &include_bytes!("../../tests/fixtures/employees.xlsx")[..];

        let rows = collect(FileFormat::Spreadsheet, bytes);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].text("name").unwrap(), "Ada Lovelace");
        assert_eq!(rows[0].text("employee_id").unwrap(), "1001");
        assert_eq!(rows[0].date("start_date").unwrap(), NaiveDate::from_ymd_opt(2020, 1, 15).unwrap());
        assert_eq!(rows[0].optional_date("end_date").unwrap(), None);
        assert_eq!(
            rows[1].optional_date("end_date").unwrap(),
            NaiveDate::from_ymd_opt(2023, 12, 31)
        );
        assert_eq!(rows[1].line(), 2);
    }

    #[test]
    fn garbage_workbook_is_unsupported() {
        assert!(matches!(
            parse(FileFormat::Spreadsheet, b"not a workbook".to_vec()),
            Err(IngestError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn worksheet_blanks_become_absent() {
        let mut range: Range<Data> = Range::new((0, 0), (3, 2));
        range.set_value((0, 0), Data::String("name".to_string()));
        range.set_value((0, 1), Data::String("end_date".to_string()));
        range.set_value((0, 2), Data::String("phone".to_string()));
        range.set_value((1, 0), Data::String("Ada".to_string()));
        range.set_value((1, 1), Data::Float(f64::NAN));
        range.set_value((1, 2), Data::Float(263771234.0));
        range.set_value((3, 0), Data::String("Bob".to_string()));
        range.set_value((3, 1), Data::String("2022-05-31".to_string()));

        let rows = rows_from_range(&range);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].optional_date("end_date").unwrap(), None);
        assert_eq!(rows[0].text("phone").unwrap(), "263771234");
        assert_eq!(rows[1].line(), 3);
        assert_eq!(
            rows[1].optional_date("end_date").unwrap(),
            NaiveDate::from_ymd_opt(2022, 5, 31)
        );
    }

    #[test]
    fn excel_serials_map_to_dates() {
        assert_eq!(excel_date(45292.0), NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(excel_date(-1.0), None);
        assert_eq!(excel_date(1e18), None);
        assert_eq!(excel_date(f64::MAX), None);
    }

    #[test]
    fn out_of_range_date_cell_is_a_row_error() {
        let mut range: Range<Data> = Range::new((0, 0), (1, 1));
        range.set_value((0, 0), Data::String("name".to_string()));
        range.set_value((0, 1), Data::String("start_date".to_string()));
        range.set_value((1, 0), Data::String("Ada".to_string()));
        range.set_value(
            (1, 1),
            Data::DateTime(ExcelDateTime::new(1e18, ExcelDateTimeType::DateTime, false)),
        );

        let rows = rows_from_range(&range);

        assert_eq!(rows.len(), 1);
        assert!(matches!(
            rows[0].date("start_date"),
            Err(IngestError::RowCoercion { row: 1, .. })
        ));
    }
}
