use serde::Serialize;

use super::{Action, Resource};
use crate::models::users::entities::UserRole;

/// 角色权限表
pub fn role_allows(role: UserRole, resource: Resource, action: Action) -> bool {
    use Action::{Read, Write};
    use Resource::*;

    match role {
        UserRole::SuperAdmin => !(resource == AuditLog && action == Write),
        UserRole::TenantAdmin => match resource {
            Tenant | AuditLog => action == Read,
            _ => true,
        },
        UserRole::CampusAdmin => match resource {
            Tenant | Campus | AcademicYear | Setting | AuditLog => action == Read,
            _ => true,
        },
        UserRole::Teacher => match resource {
            Tenant | User | AuditLog => false,
            Exam | Question => true,
            _ => action == Read,
        },
        UserRole::Staff => match resource {
            Tenant | User | AuditLog | Exam | Question => false,
            Student | Enrollment => true,
            _ => action == Read,
        },
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PermissionEntry {
    pub resource: Resource,
    pub read: bool,
    pub write: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RolePermissions {
    pub role: UserRole,
    pub permissions: Vec<PermissionEntry>,
}

/// 权限面板展示用的完整矩阵
pub fn permission_matrix() -> Vec<RolePermissions> {
    UserRole::all_roles()
        .iter()
        .map(|&role| RolePermissions {
            role,
            permissions: Resource::ALL
                .iter()
                .map(|&resource| PermissionEntry {
                    resource,
                    read: role_allows(role, resource, Action::Read),
                    write: role_allows(role, resource, Action::Write),
                })
                .collect(),
        })
        .collect()
}

/// 角色拥有的权限字符串，如 `student:read`
pub fn permission_strings(role: UserRole) -> Vec<String> {
    let mut permissions = Vec::new();
    for resource in Resource::ALL {
        for action in [Action::Read, Action::Write] {
            if role_allows(role, resource, action) {
                permissions.push(format!("{resource}:{action}"));
            }
        }
    }
    permissions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rw(role: UserRole, resource: Resource) -> (bool, bool) {
        (
            role_allows(role, resource, Action::Read),
            role_allows(role, resource, Action::Write),
        )
    }

    #[test]
    fn test_super_admin_cannot_write_audit_log() {
        assert_eq!(rw(UserRole::SuperAdmin, Resource::AuditLog), (true, false));
        assert_eq!(rw(UserRole::SuperAdmin, Resource::Tenant), (true, true));
    }

    #[test]
    fn test_tenant_admin_row() {
        let role = UserRole::TenantAdmin;
        assert_eq!(rw(role, Resource::Tenant), (true, false));
        assert_eq!(rw(role, Resource::Campus), (true, true));
        assert_eq!(rw(role, Resource::Setting), (true, true));
        assert_eq!(rw(role, Resource::AuditLog), (true, false));
    }

    #[test]
    fn test_campus_admin_row() {
        let role = UserRole::CampusAdmin;
        assert_eq!(rw(role, Resource::Campus), (true, false));
        assert_eq!(rw(role, Resource::AcademicYear), (true, false));
        assert_eq!(rw(role, Resource::User), (true, true));
        assert_eq!(rw(role, Resource::Section), (true, true));
        assert_eq!(rw(role, Resource::Setting), (true, false));
    }

    #[test]
    fn test_teacher_row() {
        let role = UserRole::Teacher;
        assert_eq!(rw(role, Resource::Tenant), (false, false));
        assert_eq!(rw(role, Resource::User), (false, false));
        assert_eq!(rw(role, Resource::Student), (true, false));
        assert_eq!(rw(role, Resource::Exam), (true, true));
        assert_eq!(rw(role, Resource::Question), (true, true));
        assert_eq!(rw(role, Resource::AuditLog), (false, false));
    }

    #[test]
    fn test_staff_row() {
        let role = UserRole::Staff;
        assert_eq!(rw(role, Resource::Student), (true, true));
        assert_eq!(rw(role, Resource::Enrollment), (true, true));
        assert_eq!(rw(role, Resource::Class), (true, false));
        assert_eq!(rw(role, Resource::Exam), (false, false));
        assert_eq!(rw(role, Resource::Question), (false, false));
    }

    #[test]
    fn test_matrix_covers_every_role_and_resource() {
        let matrix = permission_matrix();
        assert_eq!(matrix.len(), UserRole::all_roles().len());
        for row in &matrix {
            assert_eq!(row.permissions.len(), Resource::ALL.len());
            for entry in &row.permissions {
                // 可写必可读
                assert!(!entry.write || entry.read);
            }
        }
    }

    #[test]
    fn test_permission_strings() {
        let perms = permission_strings(UserRole::Staff);
        assert!(perms.contains(&"student:write".to_string()));
        assert!(perms.contains(&"class:read".to_string()));
        assert!(!perms.iter().any(|p| p.starts_with("exam:")));
    }
}
