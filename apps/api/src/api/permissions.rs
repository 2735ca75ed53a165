use crate::api::errors::ApiError;
use crate::api::middleware::AuthenticatedUser;
use crate::domain::user::UserRole;

/// Operations guarded by the permission gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Listing and reading companies, employees, history, search, dashboard
    ReadRecords,
    /// Creating, changing, deleting and bulk-uploading companies
    ManageCompanies,
    /// Creating, changing, deleting and bulk-uploading employees
    ManageEmployees,
    ViewAuditLogs,
    /// Listing users and changing their role or company
    ManageUsers,
}

/// Role-based access decisions, consulted explicitly by each handler
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissionGate;

impl PermissionGate {
    pub fn allows(&self, role: UserRole, permission: Permission) -> bool {
        match permission {
            Permission::ReadRecords => true,
            Permission::ManageCompanies => {
                matches!(role, UserRole::Admin | UserRole::CompanyManager)
            }
            Permission::ManageEmployees => matches!(role, UserRole::Admin | UserRole::HrStaff),
            Permission::ViewAuditLogs | Permission::ManageUsers => role == UserRole::Admin,
        }
    }

    pub fn authorize(&self, user: &AuthenticatedUser, permission: Permission) -> Result<(), ApiError> {
        if self.allows(user.profile.role, permission) {
            return Ok(());
        }

        tracing::warn!(
            user_id = %user.user_id,
            role = %user.profile.role,
            ?permission,
            "Permission denied"
        );
        Err(ApiError::forbidden(
            "You do not have permission to perform this action",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn everyone_reads() {
        let gate = PermissionGate;
        for role in [UserRole::Admin, UserRole::CompanyManager, UserRole::HrStaff, UserRole::Viewer] {
            assert!(gate.allows(role, Permission::ReadRecords));
        }
    }

    #[test]
    fn writes_follow_role() {
        let gate = PermissionGate;

        assert!(gate.allows(UserRole::CompanyManager, Permission::ManageCompanies));
        assert!(!gate.allows(UserRole::CompanyManager, Permission::ManageEmployees));
        assert!(gate.allows(UserRole::HrStaff, Permission::ManageEmployees));
        assert!(!gate.allows(UserRole::HrStaff, Permission::ManageCompanies));
        assert!(!gate.allows(UserRole::Viewer, Permission::ManageCompanies));
        assert!(gate.allows(UserRole::Admin, Permission::ManageEmployees));
    }

    #[test]
    fn audit_logs_are_admin_only() {
        let gate = PermissionGate;

        assert!(gate.allows(UserRole::Admin, Permission::ViewAuditLogs));
        assert!(!gate.allows(UserRole::HrStaff, Permission::ViewAuditLogs));
    }

    #[test]
    fn only_admins_manage_users() {
        let gate = PermissionGate;

        assert!(gate.allows(UserRole::Admin, Permission::ManageUsers));
        for role in [UserRole::CompanyManager, UserRole::HrStaff, UserRole::Viewer] {
            assert!(!gate.allows(role, Permission::ManageUsers));
        }
    }
}
