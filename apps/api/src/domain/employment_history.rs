use chrono::NaiveDate;
use uuid::Uuid;

/// A single tenure of one employee at one company
///
/// Entries are written by the verification back office and are only ever read
/// through this API.
#[derive(Debug, Clone, PartialEq)]
pub struct EmploymentHistory {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub company_id: Uuid,
    pub department: String,
    pub role: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

/// Optional narrowing of a history listing
///
/// Department and dates match exactly; `search` is a case-insensitive
/// substring match on the employee's name, the company's name or the role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    pub employee_id: Option<Uuid>,
    pub company_id: Option<Uuid>,
    pub department: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub search: Option<String>,
}

impl HistoryFilter {
    /// True when the entry satisfies every supplied constraint
    ///
    /// The names are those of the employee and company the entry refers to.
    pub fn matches(&self, entry: &EmploymentHistory, employee_name: &str, company_name: &str) -> bool {
        self.employee_id.map_or(true, |id| entry.employee_id == id)
            && self.company_id.map_or(true, |id| entry.company_id == id)
            && self
                .department
                .as_ref()
                .map_or(true, |department| &entry.department == department)
            && self.start_date.map_or(true, |date| entry.start_date == date)
            && self.end_date.map_or(true, |date| entry.end_date == Some(date))
            && self.search.as_ref().map_or(true, |term| {
                let term = term.to_lowercase();
                [employee_name, company_name, entry.role.as_str()]
                    .iter()
                    .any(|text| text.to_lowercase().contains(&term))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(employee_id: Uuid, company_id: Uuid) -> EmploymentHistory {
        EmploymentHistory {
            id: Uuid::new_v4(),
            employee_id,
            company_id,
            department: "Sales".to_string(),
            role: "Clerk".to_string(),
            start_date: NaiveDate::from_ymd_opt(2018, 1, 1).unwrap(),
            end_date: None,
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(HistoryFilter::default().matches(&entry(Uuid::new_v4(), Uuid::new_v4()), "", ""));
    }

    #[test]
    fn filters_combine_with_and() {
        let employee_id = Uuid::new_v4();
        let company_id = Uuid::new_v4();
        let filter = HistoryFilter {
            employee_id: Some(employee_id),
            company_id: Some(company_id),
            department: Some("Sales".to_string()),
            ..HistoryFilter::default()
        };

        assert!(filter.matches(&entry(employee_id, company_id), "", ""));
        assert!(!filter.matches(&entry(employee_id, Uuid::new_v4()), "", ""));
        assert!(!filter.matches(&entry(Uuid::new_v4(), company_id), "", ""));

        let other_department = HistoryFilter {
            department: Some("sales".to_string()),
            ..filter
        };
        assert!(!other_department.matches(&entry(employee_id, company_id), "", ""));
    }

    #[test]
    fn dates_match_exactly() {
        let mut left = entry(Uuid::new_v4(), Uuid::new_v4());
        left.end_date = NaiveDate::from_ymd_opt(2020, 6, 30);

        let filter = HistoryFilter {
            start_date: NaiveDate::from_ymd_opt(2018, 1, 1),
            end_date: NaiveDate::from_ymd_opt(2020, 6, 30),
            ..HistoryFilter::default()
        };

        assert!(filter.matches(&left, "", ""));
        assert!(!filter.matches(&entry(Uuid::new_v4(), Uuid::new_v4()), "", ""));
    }

    #[test]
    fn search_covers_names_and_role() {
        let record = entry(Uuid::new_v4(), Uuid::new_v4());
        let search = |term: &str| HistoryFilter {
            search: Some(term.to_string()),
            ..HistoryFilter::default()
        };

        assert!(search("lovelace").matches(&record, "Ada Lovelace", "Acme"));
        assert!(search("ACME").matches(&record, "Ada Lovelace", "Acme"));
        assert!(search("clerk").matches(&record, "Ada Lovelace", "Acme"));
        assert!(!search("globex").matches(&record, "Ada Lovelace", "Acme"));
    }
}
