use std::path::Path;

use super::errors::IngestError;

/// Tabular formats accepted for bulk upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Comma-separated text with a header row (`.csv`)
    DelimitedText,
    /// Excel workbook (`.xls`, `.xlsx`); only the first sheet is read
    Spreadsheet,
}

impl FileFormat {
    /// Picks the format from the file extension, ignoring case
    ///
    /// # Example
    /// ```
    /// use talentverify_api::ingest::FileFormat;
    ///
    /// assert_eq!(FileFormat::from_file_name("staff.XLSX").unwrap(), FileFormat::Spreadsheet);
    /// assert!(FileFormat::from_file_name("staff.txt").is_err());
    /// ```
    pub fn from_file_name(file_name: &str) -> Result<Self, IngestError> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("csv") => Ok(FileFormat::DelimitedText),
            Some("xls") | Some("xlsx") => Ok(FileFormat::Spreadsheet),
            _ => Err(IngestError::UnsupportedFormat(format!(
                "'{}' is not a .csv, .xls or .xlsx file",
                file_name
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_known_extensions() {
        assert_eq!(FileFormat::from_file_name("a.csv").unwrap(), FileFormat::DelimitedText);
        assert_eq!(FileFormat::from_file_name("a.xls").unwrap(), FileFormat::Spreadsheet);
        assert_eq!(FileFormat::from_file_name("a.xlsx").unwrap(), FileFormat::Spreadsheet);
        assert_eq!(FileFormat::from_file_name("A.CSV").unwrap(), FileFormat::DelimitedText);
    }

    #[test]
    fn rejects_other_names() {
        for name in ["a.txt", "csv", "", "archive.csv.zip"] {
            assert!(matches!(
                FileFormat::from_file_name(name),
                Err(IngestError::UnsupportedFormat(_))
            ));
        }
    }
}
