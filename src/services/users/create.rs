use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{UserService, load_campus_in_tenant, validate_optional_phone};
use crate::models::users::requests::{CreateUserRequest, NewUser};
use crate::models::users::responses::UserResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{Action, Resource, ResourceScope};
use crate::services::common::{
    AuditEvent, OptionExt, PolicyResultExt, Reply, StorageResultExt, bad_request,
    current_principal, record_audit, respond, storage_failure,
};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password_simple, validate_username};

pub async fn create_user(
    service: &UserService,
    user_data: CreateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(create(service, user_data, request).await)
}

async fn create(service: &UserService, user_data: CreateUserRequest, request: &HttpRequest) -> Reply {
    let principal = current_principal(request)?;
    principal.require(Resource::User, Action::Write).or_forbidden()?;

    let username = user_data.username.trim().to_string();
    validate_username(&username).map_err(|msg| bad_request(ErrorCode::UserNameInvalid, msg))?;
    let email = user_data.email.trim().to_lowercase();
    validate_email(&email).map_err(|msg| bad_request(ErrorCode::UserEmailInvalid, msg))?;
    validate_password_simple(&user_data.password)
        .map_err(|msg| bad_request(ErrorCode::UserPasswordInvalid, msg))?;
    validate_optional_phone(user_data.phone.as_deref())?;

    let (tenant_id, campus_id) = principal
        .resolve_placement(user_data.role, user_data.tenant_id, user_data.campus_id)
        .or_forbidden()?;

    let storage = service.get_storage(request)?;
    if let Some(tenant_id) = tenant_id {
        storage
            .get_tenant_by_id(tenant_id)
            .await
            .or_storage_failure("Failed to load tenant")?
            .or_not_found(ErrorCode::TenantNotFound, "Tenant not found")?;
        if let Some(campus_id) = campus_id {
            load_campus_in_tenant(&storage, campus_id, tenant_id).await?;
        }
    }

    let password_hash = hash_password(&user_data.password)
        .map_err(|e| storage_failure("Password hashing failed", e))?;

    let user = storage
        .create_user(NewUser {
            tenant_id,
            campus_id,
            username,
            email,
            password_hash,
            role: user_data.role,
            display_name: user_data.display_name,
            job_title: user_data.job_title,
            phone: user_data.phone,
            created_by: Some(principal.user_id),
        })
        .await
        .or_conflict(
            ErrorCode::UserAlreadyExists,
            "Username or email already exists",
            "User creation failed",
        )?;

    let mut event = AuditEvent::created(Resource::User, user.id)
        .summary(format!("created {} account {}", user.role, user.username));
    if let Some(tenant_id) = user.tenant_id {
        event = event.in_scope(ResourceScope {
            tenant_id,
            campus_id: user.campus_id,
        });
    }
    record_audit(&storage, request, &principal, event).await;

    info!("User {} ({}) created by {}", user.username, user.role, principal.user_id);
    Ok(HttpResponse::Created().json(ApiResponse::success(
        UserResponse { user },
        "User created successfully",
    )))
}
