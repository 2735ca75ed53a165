use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered list of department names belonging to a company
///
/// # Invariants
/// - Every entry is trimmed
/// - Empty entries are never stored
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Departments(Vec<String>);

impl Departments {
    /// Builds a department list from individual names
    ///
    /// # Example
    /// ```
    /// use talentverify_api::domain::company::Departments;
    ///
    /// let departments = Departments::new(vec![" Sales ".to_string(), "".to_string()]);
    /// assert_eq!(departments.as_slice(), &["Sales".to_string()]);
    /// ```
    pub fn new(names: Vec<String>) -> Self {
        Self(
            names
                .into_iter()
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .collect(),
        )
    }

    /// Splits a comma-joined department string as found in upload files
    ///
    /// # Example
    /// ```
    /// use talentverify_api::domain::company::Departments;
    ///
    /// let departments = Departments::from_joined("Sales, Engineering,,HR ");
    /// assert_eq!(departments.len(), 3);
    /// ```
    pub fn from_joined(joined: &str) -> Self {
        Self::new(joined.split(',').map(str::to_string).collect())
    }

    /// Returns the department names
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Number of departments
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the company lists no departments
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the list, returning the raw names
    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for Departments {
    fn from(names: Vec<String>) -> Self {
        Self::new(names)
    }
}

impl From<Departments> for Vec<String> {
    fn from(departments: Departments) -> Self {
        departments.0
    }
}

impl fmt::Display for Departments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_trims_entries() {
        let departments = Departments::from_joined("Sales , Engineering");
        assert_eq!(
            departments.as_slice(),
            &["Sales".to_string(), "Engineering".to_string()]
        );
    }

    #[test]
    fn split_drops_empty_entries() {
        let departments = Departments::from_joined(",Sales,, ,");
        assert_eq!(departments.as_slice(), &["Sales".to_string()]);
    }

    #[test]
    fn empty_string_yields_no_departments() {
        assert!(Departments::from_joined("").is_empty());
    }

    #[test]
    fn single_department_without_commas() {
        let departments = Departments::from_joined("Finance");
        assert_eq!(departments.len(), 1);
    }

    #[test]
    fn deserializes_from_json_array() {
        let departments: Departments = serde_json::from_str(r#"[" HR ", ""]"#).unwrap();
        assert_eq!(departments.as_slice(), &["HR".to_string()]);
    }

    #[test]
    fn display_joins_with_commas() {
        let departments = Departments::from_joined("Sales,HR");
        assert_eq!(departments.to_string(), "Sales, HR");
    }
}
