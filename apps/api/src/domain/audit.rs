use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Kind of change recorded in the audit trail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "audit_action", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    BulkUpload,
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditAction::Create => write!(f, "create"),
            AuditAction::Update => write!(f, "update"),
            AuditAction::Delete => write!(f, "delete"),
            AuditAction::BulkUpload => write!(f, "bulk_upload"),
        }
    }
}

/// Append-only record of who changed what
#[derive(Debug, Clone, PartialEq)]
pub struct AuditLog {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub action: AuditAction,
    pub entity_type: String,
    pub entity_id: String,
    pub timestamp: DateTime<Utc>,
}

impl AuditLog {
    /// Creates a new entry stamped with the current time
    ///
    /// # Example
    /// ```
    /// use talentverify_api::domain::audit::{AuditAction, AuditLog};
    /// use uuid::Uuid;
    ///
    /// let entry = AuditLog::record(Some(Uuid::new_v4()), AuditAction::Create, "company", "42");
    /// assert_eq!(entry.entity_type, "company");
    /// ```
    pub fn record(
        user_id: Option<Uuid>,
        action: AuditAction,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            action,
            entity_type: entity_type.into(),
            entity_id: entity_id.into(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_display() {
        assert_eq!(AuditAction::Create.to_string(), "create");
        assert_eq!(AuditAction::BulkUpload.to_string(), "bulk_upload");
    }

    #[test]
    fn record_sets_fields() {
        let user_id = Uuid::new_v4();
        let entry = AuditLog::record(Some(user_id), AuditAction::Delete, "employee", "abc");

        assert_eq!(entry.user_id, Some(user_id));
        assert_eq!(entry.action, AuditAction::Delete);
        assert_eq!(entry.entity_id, "abc");
    }
}
