use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{UserService, load_campus_in_tenant, load_user, validate_optional_phone};
use crate::models::users::entities::{User, UserRole};
use crate::models::users::requests::{UpdateUserRequest, UserUpdate};
use crate::models::users::responses::UserResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{PolicyDenial, Principal, Resource, ResourceScope};
use crate::services::common::{
    AuditEvent, OptionExt, PolicyResultExt, Reply, StorageResultExt, bad_request,
    current_principal, deny, record_audit, respond, storage_failure,
};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password_simple};

pub async fn update_user(
    service: &UserService,
    user_id: i64,
    update_data: UpdateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(update(service, user_id, update_data, request).await)
}

/// 计算角色或校区变更后的 `campus_id` 更新值
///
/// 返回 `None` 表示校区不变，`Some(None)` 表示清空。
fn plan_placement(
    principal: &Principal,
    target: &User,
    role: Option<UserRole>,
    campus_id: Option<i64>,
) -> Result<Option<Option<i64>>, PolicyDenial> {
    let new_role = role.unwrap_or(target.role);
    if new_role != target.role {
        if target.id == principal.user_id {
            return Err(PolicyDenial::SelfModification);
        }
        if !principal.can_assign_role(new_role) {
            return Err(PolicyDenial::RoleNotAssignable(new_role));
        }
        // 平台账号与租户账号之间不能互相转换
        if (new_role == UserRole::SuperAdmin) != target.tenant_id.is_none() {
            return Err(PolicyDenial::RoleNotAssignable(new_role));
        }
    }

    if !new_role.is_campus_bound() {
        return Ok(target.campus_id.map(|_| None));
    }

    let campus_id = campus_id
        .or(target.campus_id)
        .ok_or(PolicyDenial::MissingCampus)?;
    if principal.role == UserRole::CampusAdmin && principal.campus_id != Some(campus_id) {
        return Err(PolicyDenial::OutsideCampus);
    }
    Ok((target.campus_id != Some(campus_id)).then_some(Some(campus_id)))
}

async fn update(
    service: &UserService,
    user_id: i64,
    update_data: UpdateUserRequest,
    request: &HttpRequest,
) -> Reply {
    let principal = current_principal(request)?;
    let storage = service.get_storage(request)?;
    let target = load_user(&storage, user_id).await?;
    principal.can_manage_user(&target).or_forbidden()?;

    if target.id == principal.user_id
        && update_data.status.is_some_and(|status| status != target.status)
    {
        return Err(deny(PolicyDenial::SelfModification));
    }

    let email = match update_data.email {
        Some(email) => {
            let email = email.trim().to_lowercase();
            validate_email(&email).map_err(|msg| bad_request(ErrorCode::UserEmailInvalid, msg))?;
            Some(email)
        }
        None => None,
    };
    validate_optional_phone(update_data.phone.as_deref())?;

    let campus_update =
        plan_placement(&principal, &target, update_data.role, update_data.campus_id)
            .or_forbidden()?;
    if let Some(Some(campus_id)) = campus_update
        && let Some(tenant_id) = target.tenant_id
    {
        load_campus_in_tenant(&storage, campus_id, tenant_id).await?;
    }

    let password_hash = match update_data.password {
        Some(password) => {
            validate_password_simple(&password)
                .map_err(|msg| bad_request(ErrorCode::UserPasswordInvalid, msg))?;
            Some(hash_password(&password).map_err(|e| storage_failure("Password hashing failed", e))?)
        }
        None => None,
    };

    let user = storage
        .update_user(
            user_id,
            UserUpdate {
                email,
                password_hash,
                role: update_data.role,
                status: update_data.status,
                campus_id: campus_update,
                display_name: update_data.display_name,
                job_title: update_data.job_title,
                phone: update_data.phone,
            },
        )
        .await
        .or_conflict(
            ErrorCode::UserAlreadyExists,
            "Email already in use",
            "User update failed",
        )?
        .or_not_found(ErrorCode::UserNotFound, "User not found")?;

    let mut event = AuditEvent::updated(Resource::User, user.id)
        .summary(format!("updated account {}", user.username));
    if let Some(tenant_id) = user.tenant_id {
        event = event.in_scope(ResourceScope {
            tenant_id,
            campus_id: user.campus_id,
        });
    }
    record_audit(&storage, request, &principal, event).await;

    info!("User {} updated by {}", user.username, principal.user_id);
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UserResponse { user },
        "User updated successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserStatus;

    fn principal(role: UserRole, tenant_id: Option<i64>, campus_id: Option<i64>) -> Principal {
        Principal {
            user_id: 1,
            role,
            tenant_id,
            campus_id,
        }
    }

    fn user(id: i64, role: UserRole, tenant_id: Option<i64>, campus_id: Option<i64>) -> User {
        let now = chrono::Utc::now();
        User {
            id,
            tenant_id,
            campus_id,
            username: format!("staff{id}"),
            email: format!("staff{id}@school.test"),
            password_hash: String::new(),
            role,
            status: UserStatus::Active,
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
    fn test_unchanged_placement() {
        let admin = principal(UserRole::TenantAdmin, Some(1), None);
        let teacher = user(5, UserRole::Teacher, Some(1), Some(10));
        assert_eq!(plan_placement(&admin, &teacher, None, None), Ok(None));
        assert_eq!(plan_placement(&admin, &teacher, None, Some(10)), Ok(None));
    }

    #[test]
    fn test_move_to_other_campus() {
        let admin = principal(UserRole::TenantAdmin, Some(1), None);
        let teacher = user(5, UserRole::Teacher, Some(1), Some(10));
        assert_eq!(
            plan_placement(&admin, &teacher, None, Some(11)),
            Ok(Some(Some(11)))
        );

        let campus_admin = principal(UserRole::CampusAdmin, Some(1), Some(10));
        assert_eq!(
            plan_placement(&campus_admin, &teacher, None, Some(11)),
            Err(PolicyDenial::OutsideCampus)
        );
    }

    #[test]
    fn test_promotion_to_tenant_admin_clears_campus() {
        let root = principal(UserRole::SuperAdmin, None, None);
        let teacher = user(5, UserRole::Teacher, Some(1), Some(10));
        assert_eq!(
            plan_placement(&root, &teacher, Some(UserRole::TenantAdmin), None),
            Ok(Some(None))
        );
    }

    #[test]
    fn test_role_escalation_rejected() {
        let campus_admin = principal(UserRole::CampusAdmin, Some(1), Some(10));
        let staff = user(5, UserRole::Staff, Some(1), Some(10));
        assert_eq!(
            plan_placement(&campus_admin, &staff, Some(UserRole::CampusAdmin), None),
            Err(PolicyDenial::RoleNotAssignable(UserRole::CampusAdmin))
        );
        assert_eq!(
            plan_placement(&campus_admin, &staff, Some(UserRole::Teacher), None),
            Ok(None)
        );
    }

    #[test]
    fn test_tenant_account_cannot_become_super_admin() {
        let root = principal(UserRole::SuperAdmin, None, None);
        let head = user(5, UserRole::TenantAdmin, Some(1), None);
        assert_eq!(
            plan_placement(&root, &head, Some(UserRole::SuperAdmin), None),
            Err(PolicyDenial::RoleNotAssignable(UserRole::SuperAdmin))
        );
    }

    #[test]
    fn test_own_role_change_rejected() {
        let admin = principal(UserRole::TenantAdmin, Some(1), None);
        let me = user(1, UserRole::TenantAdmin, Some(1), None);
        assert_eq!(
            plan_placement(&admin, &me, Some(UserRole::Teacher), Some(10)),
            Err(PolicyDenial::SelfModification)
        );
    }

    #[test]
    fn test_campus_required_for_campus_roles() {
        let root = principal(UserRole::SuperAdmin, None, None);
        let head = user(5, UserRole::TenantAdmin, Some(1), None);
        assert_eq!(
            plan_placement(&root, &head, Some(UserRole::Teacher), None),
            Err(PolicyDenial::MissingCampus)
        );
    }
}
