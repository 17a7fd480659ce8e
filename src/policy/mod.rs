//! 集中授权
//!
//! 所有服务在读写数据前都通过 [`Principal`] 判断：先查角色权限表，
//! 再判断资源所属的租户与校区是否在当前用户的范围内。

mod matrix;

pub use matrix::{PermissionEntry, RolePermissions, permission_matrix, permission_strings, role_allows};

use serde::{Deserialize, Serialize};

use crate::models::users::entities::{User, UserRole};

/// 受保护的资源类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Tenant,
    Campus,
    User,
    AcademicYear,
    Class,
    Section,
    Student,
    Enrollment,
    Exam,
    Question,
    Setting,
    AuditLog,
}

impl Resource {
    pub const ALL: [Resource; 12] = [
        Resource::Tenant,
        Resource::Campus,
        Resource::User,
        Resource::AcademicYear,
        Resource::Class,
        Resource::Section,
        Resource::Student,
        Resource::Enrollment,
        Resource::Exam,
        Resource::Question,
        Resource::Setting,
        Resource::AuditLog,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Tenant => "tenant",
            Resource::Campus => "campus",
            Resource::User => "user",
            Resource::AcademicYear => "academic_year",
            Resource::Class => "class",
            Resource::Section => "section",
            Resource::Student => "student",
            Resource::Enrollment => "enrollment",
            Resource::Exam => "exam",
            Resource::Question => "question",
            Resource::Setting => "setting",
            Resource::AuditLog => "audit_log",
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Read,
    Write,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Read => write!(f, "read"),
            Action::Write => write!(f, "write"),
        }
    }
}

/// 资源所在范围，`campus_id` 为空表示整个租户共用
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceScope {
    pub tenant_id: i64,
    pub campus_id: Option<i64>,
}

impl ResourceScope {
    pub fn tenant(tenant_id: i64) -> Self {
        Self {
            tenant_id,
            campus_id: None,
        }
    }

    pub fn campus(tenant_id: i64, campus_id: i64) -> Self {
        Self {
            tenant_id,
            campus_id: Some(campus_id),
        }
    }
}

/// 列表查询的范围过滤条件，`None` 表示不限制
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScopeFilter {
    pub tenant_id: Option<i64>,
    pub campus_id: Option<i64>,
}

/// 拒绝原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyDenial {
    RoleLacksPermission { resource: Resource, action: Action },
    NoTenant,
    OutsideTenant,
    OutsideCampus,
    TenantWideWrite,
    RoleNotAssignable(UserRole),
    MissingTenant,
    MissingCampus,
    SelfModification,
}

impl PolicyDenial {
    pub fn message(&self) -> String {
        match self {
            PolicyDenial::RoleLacksPermission { resource, action } => {
                format!("Your role may not {action} {resource} records")
            }
            PolicyDenial::NoTenant => "Your account is not attached to a tenant".to_string(),
            PolicyDenial::OutsideTenant => "The resource belongs to another tenant".to_string(),
            PolicyDenial::OutsideCampus => "The resource belongs to another campus".to_string(),
            PolicyDenial::TenantWideWrite => {
                "Tenant-wide records can only be changed by tenant administrators".to_string()
            }
            PolicyDenial::RoleNotAssignable(role) => {
                format!("You may not assign the role '{role}'")
            }
            PolicyDenial::MissingTenant => "tenant_id is required for this role".to_string(),
            PolicyDenial::MissingCampus => "campus_id is required for this role".to_string(),
            PolicyDenial::SelfModification => {
                "You cannot delete your own account or change your own role".to_string()
            }
        }
    }
}

impl std::fmt::Display for PolicyDenial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

/// 当前请求的身份
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i64,
    pub role: UserRole,
    pub tenant_id: Option<i64>,
    pub campus_id: Option<i64>,
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            role: user.role,
            tenant_id: user.tenant_id,
            campus_id: user.campus_id,
        }
    }
}

type PolicyResult<T = ()> = Result<T, PolicyDenial>;

impl Principal {
    pub fn is_super_admin(&self) -> bool {
        self.role == UserRole::SuperAdmin
    }

    /// 仅检查角色权限表，用于尚无具体资源的列表接口
    pub fn require(&self, resource: Resource, action: Action) -> PolicyResult {
        if role_allows(self.role, resource, action) {
            Ok(())
        } else {
            Err(PolicyDenial::RoleLacksPermission { resource, action })
        }
    }

    /// 判断资源范围是否在当前身份的管辖内
    pub fn covers(&self, scope: ResourceScope, action: Action) -> PolicyResult {
        if self.is_super_admin() {
            return Ok(());
        }
        let tenant_id = self.tenant_id.ok_or(PolicyDenial::NoTenant)?;
        if tenant_id != scope.tenant_id {
            return Err(PolicyDenial::OutsideTenant);
        }
        if self.role == UserRole::TenantAdmin {
            return Ok(());
        }

        match scope.campus_id {
            None if action == Action::Read => Ok(()),
            None => Err(PolicyDenial::TenantWideWrite),
            Some(campus_id) if self.campus_id == Some(campus_id) => Ok(()),
            Some(_) => Err(PolicyDenial::OutsideCampus),
        }
    }

    /// 权限表检查 + 范围检查
    pub fn authorize(&self, resource: Resource, action: Action, scope: ResourceScope) -> PolicyResult {
        self.require(resource, action)?;
        self.covers(scope, action)
    }

    /// 列表查询时附加的范围条件
    pub fn scope_filter(&self) -> PolicyResult<ScopeFilter> {
        match self.role {
            UserRole::SuperAdmin => Ok(ScopeFilter::default()),
            UserRole::TenantAdmin => Ok(ScopeFilter {
                tenant_id: Some(self.tenant_id.ok_or(PolicyDenial::NoTenant)?),
                campus_id: None,
            }),
            _ => Ok(ScopeFilter {
                tenant_id: Some(self.tenant_id.ok_or(PolicyDenial::NoTenant)?),
                campus_id: Some(self.campus_id.ok_or(PolicyDenial::OutsideCampus)?),
            }),
        }
    }

    /// 新建资源时确定所属租户：非超级管理员固定为本租户
    pub fn resolve_tenant(&self, requested: Option<i64>) -> PolicyResult<i64> {
        if self.is_super_admin() {
            return requested.ok_or(PolicyDenial::MissingTenant);
        }
        let own = self.tenant_id.ok_or(PolicyDenial::NoTenant)?;
        match requested {
            Some(tenant_id) if tenant_id != own => Err(PolicyDenial::OutsideTenant),
            _ => Ok(own),
        }
    }

    /// 新建资源时确定所属校区：绑定校区的角色固定为本校区
    pub fn resolve_campus(&self, requested: Option<i64>) -> PolicyResult<i64> {
        if self.is_super_admin() || self.role == UserRole::TenantAdmin {
            return requested.ok_or(PolicyDenial::MissingCampus);
        }
        let own = self.campus_id.ok_or(PolicyDenial::OutsideCampus)?;
        match requested {
            Some(campus_id) if campus_id != own => Err(PolicyDenial::OutsideCampus),
            _ => Ok(own),
        }
    }

    pub fn can_assign_role(&self, target: UserRole) -> bool {
        match self.role {
            UserRole::SuperAdmin => true,
            UserRole::TenantAdmin => matches!(
                target,
                UserRole::CampusAdmin | UserRole::Teacher | UserRole::Staff
            ),
            UserRole::CampusAdmin => matches!(target, UserRole::Teacher | UserRole::Staff),
            UserRole::Teacher | UserRole::Staff => false,
        }
    }

    /// 计算新账号的 `(tenant_id, campus_id)`
    pub fn resolve_placement(
        &self,
        role: UserRole,
        requested_tenant: Option<i64>,
        requested_campus: Option<i64>,
    ) -> PolicyResult<(Option<i64>, Option<i64>)> {
        if !self.can_assign_role(role) {
            return Err(PolicyDenial::RoleNotAssignable(role));
        }

        let mut tenant_id = requested_tenant;
        let mut campus_id = requested_campus;
        if !self.is_super_admin() {
            let own = self.tenant_id.ok_or(PolicyDenial::NoTenant)?;
            if tenant_id.is_some_and(|t| t != own) {
                return Err(PolicyDenial::OutsideTenant);
            }
            tenant_id = Some(own);
        }
        if self.role == UserRole::CampusAdmin {
            let own = self.campus_id.ok_or(PolicyDenial::OutsideCampus)?;
            if campus_id.is_some_and(|c| c != own) {
                return Err(PolicyDenial::OutsideCampus);
            }
            campus_id = Some(own);
        }

        match role {
            UserRole::SuperAdmin => Ok((None, None)),
            UserRole::TenantAdmin => Ok((Some(tenant_id.ok_or(PolicyDenial::MissingTenant)?), None)),
            _ => {
                let tenant_id = tenant_id.ok_or(PolicyDenial::MissingTenant)?;
                let campus_id = campus_id.ok_or(PolicyDenial::MissingCampus)?;
                Ok((Some(tenant_id), Some(campus_id)))
            }
        }
    }

    /// 目标账号在管辖范围内，且其角色可由当前身份分配；本人账号始终可管理
    pub fn can_manage_user(&self, target: &User) -> PolicyResult {
        self.require(Resource::User, Action::Write)?;
        if target.id == self.user_id {
            return Ok(());
        }
        match target.tenant_id {
            Some(tenant_id) => {
                let scope = ResourceScope {
                    tenant_id,
                    campus_id: target.campus_id,
                };
                self.covers(scope, Action::Write)?;
            }
            None if !self.is_super_admin() => return Err(PolicyDenial::OutsideTenant),
            None => {}
        }
        if self.can_assign_role(target.role) {
            Ok(())
        } else {
            Err(PolicyDenial::RoleNotAssignable(target.role))
        }
    }

    /// 查看账号：在范围内即可
    pub fn can_view_user(&self, target: &User) -> PolicyResult {
        if target.id == self.user_id {
            return Ok(());
        }
        self.require(Resource::User, Action::Read)?;
        match target.tenant_id {
            Some(tenant_id) => self.covers(
                ResourceScope {
                    tenant_id,
                    campus_id: target.campus_id,
                },
                Action::Read,
            ),
            None if self.is_super_admin() => Ok(()),
            None => Err(PolicyDenial::OutsideTenant),
        }
    }

    pub fn permissions(&self) -> Vec<String> {
        permission_strings(self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(role: UserRole, tenant_id: Option<i64>, campus_id: Option<i64>) -> Principal {
        Principal {
            user_id: 100,
            role,
            tenant_id,
            campus_id,
        }
    }

    fn super_admin() -> Principal {
        principal(UserRole::SuperAdmin, None, None)
    }

    fn tenant_admin() -> Principal {
        principal(UserRole::TenantAdmin, Some(1), None)
    }

    fn campus_admin() -> Principal {
        principal(UserRole::CampusAdmin, Some(1), Some(10))
    }

    fn teacher() -> Principal {
        principal(UserRole::Teacher, Some(1), Some(10))
    }

    fn target_user(id: i64, role: UserRole, tenant_id: Option<i64>, campus_id: Option<i64>) -> User {
        let now = chrono::Utc::now();
        User {
            id,
            tenant_id,
            campus_id,
            username: format!("user{id}"),
            email: format!("user{id}@school.test"),
            password_hash: String::new(),
            role,
            status: crate::models::users::entities::UserStatus::Active,
            display_name: None,
            job_title: None,
            phone: None,
            last_login: None,
            created_at: now,
            updated_at: now,
            created_by: None,
        }
    }

    #[test]
    fn test_super_admin_covers_everything() {
        let p = super_admin();
        assert!(p.covers(ResourceScope::campus(5, 50), Action::Write).is_ok());
        assert!(p.covers(ResourceScope::tenant(9), Action::Write).is_ok());
        assert_eq!(p.scope_filter(), Ok(ScopeFilter::default()));
    }

    #[test]
    fn test_tenant_isolation() {
        let p = tenant_admin();
        assert!(p.covers(ResourceScope::campus(1, 99), Action::Write).is_ok());
        assert_eq!(
            p.covers(ResourceScope::campus(2, 20), Action::Read),
            Err(PolicyDenial::OutsideTenant)
        );
        assert_eq!(
            teacher().covers(ResourceScope::tenant(2), Action::Read),
            Err(PolicyDenial::OutsideTenant)
        );
    }

    #[test]
    fn test_missing_tenant_denies_everything() {
        let p = principal(UserRole::TenantAdmin, None, None);
        assert_eq!(
            p.covers(ResourceScope::tenant(1), Action::Read),
            Err(PolicyDenial::NoTenant)
        );
        assert_eq!(p.scope_filter(), Err(PolicyDenial::NoTenant));
    }

    #[test]
    fn test_campus_bound_roles() {
        let p = campus_admin();
        assert!(p.covers(ResourceScope::campus(1, 10), Action::Write).is_ok());
        assert_eq!(
            p.covers(ResourceScope::campus(1, 11), Action::Read),
            Err(PolicyDenial::OutsideCampus)
        );
        assert!(p.covers(ResourceScope::tenant(1), Action::Read).is_ok());
        assert_eq!(
            p.covers(ResourceScope::tenant(1), Action::Write),
            Err(PolicyDenial::TenantWideWrite)
        );
        assert_eq!(
            p.scope_filter(),
            Ok(ScopeFilter {
                tenant_id: Some(1),
                campus_id: Some(10)
            })
        );
    }

    #[test]
    fn test_authorize_checks_table_first() {
        let p = teacher();
        assert_eq!(
            p.authorize(Resource::Student, Action::Write, ResourceScope::campus(1, 10)),
            Err(PolicyDenial::RoleLacksPermission {
                resource: Resource::Student,
                action: Action::Write
            })
        );
        assert!(
            p.authorize(Resource::Exam, Action::Write, ResourceScope::campus(1, 10))
                .is_ok()
        );
    }

    #[test]
    fn test_can_assign_role() {
        assert!(super_admin().can_assign_role(UserRole::TenantAdmin));
        assert!(!tenant_admin().can_assign_role(UserRole::TenantAdmin));
        assert!(tenant_admin().can_assign_role(UserRole::CampusAdmin));
        assert!(!campus_admin().can_assign_role(UserRole::CampusAdmin));
        assert!(campus_admin().can_assign_role(UserRole::Staff));
        assert!(!teacher().can_assign_role(UserRole::Staff));
    }

    #[test]
    fn test_resolve_placement() {
        assert_eq!(
            super_admin().resolve_placement(UserRole::SuperAdmin, Some(3), Some(4)),
            Ok((None, None))
        );
        assert_eq!(
            super_admin().resolve_placement(UserRole::TenantAdmin, Some(3), Some(4)),
            Ok((Some(3), None))
        );
        assert_eq!(
            super_admin().resolve_placement(UserRole::Teacher, Some(3), None),
            Err(PolicyDenial::MissingCampus)
        );
        assert_eq!(
            super_admin().resolve_placement(UserRole::TenantAdmin, None, None),
            Err(PolicyDenial::MissingTenant)
        );
        assert_eq!(
            tenant_admin().resolve_placement(UserRole::Teacher, None, Some(12)),
            Ok((Some(1), Some(12)))
        );
        assert_eq!(
            tenant_admin().resolve_placement(UserRole::Teacher, Some(2), Some(12)),
            Err(PolicyDenial::OutsideTenant)
        );
        assert_eq!(
            tenant_admin().resolve_placement(UserRole::TenantAdmin, None, None),
            Err(PolicyDenial::RoleNotAssignable(UserRole::TenantAdmin))
        );
        assert_eq!(
            campus_admin().resolve_placement(UserRole::Staff, None, None),
            Ok((Some(1), Some(10)))
        );
        assert_eq!(
            campus_admin().resolve_placement(UserRole::Staff, None, Some(11)),
            Err(PolicyDenial::OutsideCampus)
        );
    }

    #[test]
    fn test_resolve_tenant_and_campus() {
        assert_eq!(super_admin().resolve_tenant(None), Err(PolicyDenial::MissingTenant));
        assert_eq!(super_admin().resolve_tenant(Some(4)), Ok(4));
        assert_eq!(tenant_admin().resolve_tenant(None), Ok(1));
        assert_eq!(tenant_admin().resolve_tenant(Some(2)), Err(PolicyDenial::OutsideTenant));
        assert_eq!(tenant_admin().resolve_campus(None), Err(PolicyDenial::MissingCampus));
        assert_eq!(campus_admin().resolve_campus(None), Ok(10));
        assert_eq!(campus_admin().resolve_campus(Some(11)), Err(PolicyDenial::OutsideCampus));
    }

    #[test]
    fn test_can_manage_user() {
        let teacher_same_campus = target_user(1, UserRole::Teacher, Some(1), Some(10));
        let teacher_other_campus = target_user(2, UserRole::Teacher, Some(1), Some(11));
        let other_tenant_admin = target_user(3, UserRole::TenantAdmin, Some(1), None);
        let platform_admin = target_user(4, UserRole::SuperAdmin, None, None);

        assert!(campus_admin().can_manage_user(&teacher_same_campus).is_ok());
        assert_eq!(
            campus_admin().can_manage_user(&teacher_other_campus),
            Err(PolicyDenial::OutsideCampus)
        );
        assert!(tenant_admin().can_manage_user(&teacher_other_campus).is_ok());
        assert_eq!(
            tenant_admin().can_manage_user(&other_tenant_admin),
            Err(PolicyDenial::RoleNotAssignable(UserRole::TenantAdmin))
        );
        assert_eq!(
            tenant_admin().can_manage_user(&platform_admin),
            Err(PolicyDenial::OutsideTenant)
        );
        assert!(super_admin().can_manage_user(&platform_admin).is_ok());
    }

    #[test]
    fn test_can_view_user() {
        let own = target_user(100, UserRole::Teacher, Some(1), Some(10));
        let colleague = target_user(5, UserRole::Teacher, Some(1), Some(10));
        assert!(teacher().can_view_user(&own).is_ok());
        assert!(teacher().can_view_user(&colleague).is_err());
        assert!(campus_admin().can_view_user(&colleague).is_ok());
    }

    #[test]
    fn test_resource_serde_names() {
        assert_eq!(
            serde_json::to_string(&Resource::AcademicYear).unwrap(),
            "\"academic_year\""
        );
        let parsed: Resource = serde_json::from_str("\"audit_log\"").unwrap();
        assert_eq!(parsed, Resource::AuditLog);
        assert_eq!(Resource::AuditLog.to_string(), "audit_log");
    }
}
