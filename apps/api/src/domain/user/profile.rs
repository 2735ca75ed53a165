use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Role granted to a user, used by the permission gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Full access, including audit logs
    Admin,
    /// Maintains company records
    CompanyManager,
    /// Maintains employee records
    HrStaff,
    /// Read-only access
    Viewer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::CompanyManager => "company_manager",
            UserRole::HrStaff => "hr_staff",
            UserRole::Viewer => "viewer",
        }
    }
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::Viewer
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(UserRole::Admin),
            "company_manager" => Ok(UserRole::CompanyManager),
            "hr_staff" => Ok(UserRole::HrStaff),
            "viewer" => Ok(UserRole::Viewer),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// Authorization profile attached to a user
///
/// Links the identity to a role and, optionally, to the company it acts for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub role: UserRole,
    pub company_id: Option<Uuid>,
}
