use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use uuid::Uuid;

use super::errors::IngestError;
use super::format::FileFormat;
use super::parser;
use super::row::Row;
use crate::domain::company::{Company, CompanyDetails, Departments};
use crate::domain::employee::{Employee, EmployeeDetails};
use crate::domain::repositories::{CompanyRepository, EmployeeRepository};

/// Kind of record an upload creates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Company,
    Employee,
}

impl RecordKind {
    fn plural(&self) -> &'static str {
        match self {
            RecordKind::Company => "companies",
            RecordKind::Employee => "employees",
        }
    }
}

/// File received from a multipart upload
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Outcome of a successful upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestReport {
    pub kind: RecordKind,
    pub created: usize,
}

impl IngestReport {
    pub fn message(&self) -> String {
        format!("{} {} created successfully", self.created, self.kind.plural())
    }
}

/// Turns an uploaded file into stored records, all or nothing
///
/// Every row is coerced before anything is written; the first bad row aborts
/// the upload. The records are then handed to the repository as one batch,
/// which the storage adapters insert atomically.
pub struct BulkIngestionCoordinator {
    companies: Arc<dyn CompanyRepository>,
    employees: Arc<dyn EmployeeRepository>,
}

impl BulkIngestionCoordinator {
    pub fn new(companies: Arc<dyn CompanyRepository>, employees: Arc<dyn EmployeeRepository>) -> Self {
        Self {
            companies,
            employees,
        }
    }

    pub async fn ingest(
        &self,
        file: Option<UploadedFile>,
        kind: RecordKind,
    ) -> Result<IngestReport, IngestError> {
        let file = file.ok_or(IngestError::MissingFile)?;
        let format = FileFormat::from_file_name(&file.file_name)?;
        let rows = parser::parse(format, file.bytes)?.collect::<Result<Vec<Row>, _>>()?;

        let report = self.store_rows(&rows, kind).await?;

        tracing::info!(
            file = %file.file_name,
            ?format,
            created = report.created,
            "Bulk upload of {} stored",
            kind.plural()
        );

        Ok(report)
    }

    /// Coerces already parsed rows and stores them as one batch
    pub async fn store_rows(&self, rows: &[Row], kind: RecordKind) -> Result<IngestReport, IngestError> {
        let created = match kind {
            RecordKind::Company => {
                let companies = rows
                    .iter()
                    .map(company_from_row)
                    .collect::<Result<Vec<_>, _>>()?;
                self.companies.create_batch(&companies).await?
            }
            RecordKind::Employee => {
                let companies = self.resolve_companies(rows).await?;
                let employees = rows
                    .iter()
                    .map(|row| employee_from_row(row, &companies))
                    .collect::<Result<Vec<_>, _>>()?;
                self.employees.create_batch(&employees).await?
            }
        };

        Ok(IngestReport { kind, created })
    }

    /// Looks up every distinct company reference of the file in one query
    async fn resolve_companies(&self, rows: &[Row]) -> Result<HashMap<String, Uuid>, IngestError> {
        let references: BTreeSet<String> = rows
            .iter()
            .filter_map(|row| row.text("company").ok())
            .collect();
        let references: Vec<String> = references.into_iter().collect();

        Ok(self.companies.resolve_references(&references).await?)
    }
}

fn company_from_row(row: &Row) -> Result<Company, IngestError> {
    let employee_count = row.integer("employee_count")?;
    let employee_count = i32::try_from(employee_count)
        .map_err(|_| IngestError::row(row.line(), "employee_count", "value is out of range"))?;

    let details = CompanyDetails {
        name: row.text("name")?,
        registration_date: row.date("registration_date")?,
        registration_number: row.text("registration_number")?,
        address: row.optional_text("address")?,
        contact_person: row.optional_text("contact_person")?,
        departments: Departments::from_joined(&row.optional_text("departments")?),
        employee_count,
        phone: row.optional_text("phone")?,
        email: row.optional_text("email")?,
    };

    Company::new(details).map_err(|e| IngestError::row(row.line(), "record", e))
}

fn employee_from_row(row: &Row, companies: &HashMap<String, Uuid>) -> Result<Employee, IngestError> {
    let reference = row.text("company")?;
    let company_id = *companies.get(&reference).ok_or_else(|| {
        IngestError::row(row.line(), "company", format!("no company matches '{}'", reference))
    })?;

    let details = EmployeeDetails {
        name: row.text("name")?,
        employee_id: row.text("employee_id")?,
        company_id,
        department: row.optional_text("department")?,
        role: row.optional_text("role")?,
        start_date: row.date("start_date")?,
        end_date: row.optional_date("end_date")?,
        duties: row.optional_text("duties")?,
    };

    Employee::new(details).map_err(|e| IngestError::row(row.line(), "record", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::employee::EmployeeFilter;
    use crate::domain::repositories::CompanyQuery;
    use crate::infrastructure::repositories::InMemoryStore;
    use chrono::NaiveDate;

    const COMPANIES_CSV: &str = "name,registration_date,registration_number,address,contact_person,departments,employee_count,phone,email\n\
        Acme,2015-02-01,REG-1,1 Main St,Jane,\"Sales, HR ,\",12,555-0100,info@acme.test\n\
        Globex,2016-03-04,REG-2,,,Engineering,7,,\n";

    fn setup() -> (Arc<InMemoryStore>, BulkIngestionCoordinator) {
        let store = Arc::new(InMemoryStore::new());
        let coordinator = BulkIngestionCoordinator::new(store.clone(), store.clone());
        (store, coordinator)
    }

    fn csv(name: &str, body: &str) -> Option<UploadedFile> {
        Some(UploadedFile {
            file_name: name.to_string(),
            bytes: body.as_bytes().to_vec(),
        })
    }

    #[tokio::test]
    async fn creates_companies_with_split_departments() {
        let (store, coordinator) = setup();

        let report = coordinator
            .ingest(csv("companies.csv", COMPANIES_CSV), RecordKind::Company)
            .await
            .unwrap();

        assert_eq!(report.message(), "2 companies created successfully");
        let companies = CompanyRepository::list(store.as_ref(), &CompanyQuery::default())
            .await
            .unwrap();
        assert_eq!(companies[0].name(), "Acme");
        assert_eq!(companies[0].departments().as_slice(), ["Sales", "HR"]);
        assert_eq!(companies[0].employee_count(), 12);
        assert!(companies[1].address().is_empty());
    }

    #[tokio::test]
    async fn missing_file_is_reported() {
        let (_, coordinator) = setup();

        let result = coordinator.ingest(None, RecordKind::Company).await;

        assert!(matches!(result, Err(IngestError::MissingFile)));
    }

    #[tokio::test]
    async fn non_numeric_count_aborts_whole_batch() {
        let (store, coordinator) = setup();
        let body = COMPANIES_CSV.replace(",7,", ",seven,");

        let result = coordinator
            .ingest(csv("companies.csv", &body), RecordKind::Company)
            .await;

        match result {
            Err(IngestError::RowCoercion { row, message }) => {
                assert_eq!(row, 2);
                assert!(message.starts_with("employee_count"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(CompanyRepository::count(store.as_ref()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn employees_resolve_company_by_number_or_name() {
        let (store, coordinator) = setup();
        coordinator
            .ingest(csv("companies.csv", COMPANIES_CSV), RecordKind::Company)
            .await
            .unwrap();

        let body = "name,employee_id,company,department,role,start_date,end_date,duties\n\
            Ada,E1,REG-1,Sales,Rep,2020-01-01,,Sells\n\
            Bob,E2,globex,Engineering,Dev,2019-05-01,2021-06-30,Builds\n";
        let report = coordinator
            .ingest(csv("staff.CSV", body), RecordKind::Employee)
            .await
            .unwrap();

        assert_eq!(report.message(), "2 employees created successfully");
        let rows = EmployeeRepository::list(store.as_ref(), &Default::default())
            .await
            .unwrap();
        assert_eq!(rows[0].company_name, "Acme");
        assert_eq!(rows[0].employee.end_date(), None);
        assert_eq!(rows[1].company_name, "Globex");
        assert_eq!(rows[1].employee.end_date(), NaiveDate::from_ymd_opt(2021, 6, 30));
    }

    #[tokio::test]
    async fn spreadsheet_row_without_end_date_is_active() {
        use crate::ingest::parser::rows_from_range;
        use calamine::{Data, Range};

        let (store, coordinator) = setup();
        coordinator
            .ingest(csv("companies.csv", COMPANIES_CSV), RecordKind::Company)
            .await
            .unwrap();

        let headers = [
            "name", "employee_id", "company", "department", "role", "start_date", "end_date",
            "duties",
        ];
        let mut range: Range<Data> = Range::new((0, 0), (2, 7));
        for (column, header) in headers.iter().enumerate() {
            range.set_value((0, column as u32), Data::String(header.to_string()));
        }
        for (row, name) in [(1u32, "Ada"), (2u32, "Bob")] {
            range.set_value((row, 0), Data::String(name.to_string()));
            range.set_value((row, 1), Data::Float(1000.0 + row as f64));
            range.set_value((row, 2), Data::String("REG-2".to_string()));
            range.set_value((row, 5), Data::String("2020-01-01".to_string()));
        }
        range.set_value((1, 6), Data::Float(f64::NAN));
        range.set_value((2, 6), Data::String("2022-12-31".to_string()));

        let rows = rows_from_range(&range);
        let report = coordinator.store_rows(&rows, RecordKind::Employee).await.unwrap();

        assert_eq!(report.created, 2);
        let stored = EmployeeRepository::list(store.as_ref(), &Default::default())
            .await
            .unwrap();
        assert_eq!(stored[0].employee.name(), "Ada");
        assert_eq!(stored[0].employee.employee_id(), "1001");
        assert!(stored[0].employee.is_active());
        assert_eq!(stored[1].employee.end_date(), NaiveDate::from_ymd_opt(2022, 12, 31));
    }

    #[tokio::test]
    async fn unknown_company_aborts_employee_upload() {
        let (store, coordinator) = setup();
        let body = "name,employee_id,company,department,role,start_date,end_date,duties\n\
            Ada,E1,Nowhere Ltd,Sales,Rep,2020-01-01,,\n";

        let result = coordinator
            .ingest(csv("staff.csv", body), RecordKind::Employee)
            .await;

        assert!(matches!(result, Err(IngestError::RowCoercion { row: 1, .. })));
        let total = EmployeeRepository::count(store.as_ref(), &EmployeeFilter::new())
            .await
            .unwrap();
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn unsupported_extension_is_rejected_before_parsing() {
        let (_, coordinator) = setup();

        let result = coordinator
            .ingest(csv("companies.json", COMPANIES_CSV), RecordKind::Company)
            .await;

        assert!(matches!(result, Err(IngestError::UnsupportedFormat(_))));
    }
}
