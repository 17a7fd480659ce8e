use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AuthService;
use crate::cache::user_key;
use crate::middlewares::RequireJWT;
use crate::models::auth::responses::MeResponse;
use crate::models::users::requests::{ChangePasswordRequest, UserUpdate};
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{Principal, Resource, ResourceScope};
use crate::services::common::{
    AuditEvent, OptionExt, Reply, StorageResultExt, bad_request, cache_from_request,
    current_principal, record_audit, respond, storage_failure,
};
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validate::validate_password_simple;

pub async fn handle_me(request: &HttpRequest) -> ActixResult<HttpResponse> {
    respond(me(request))
}

fn me(request: &HttpRequest) -> Reply {
    let principal = current_principal(request)?;
    let user = RequireJWT::extract_user(request)
        .or_not_found(ErrorCode::UserNotFound, "User not found")?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        MeResponse {
            user,
            permissions: principal.permissions(),
        },
        "Current user",
    )))
}

pub async fn handle_change_password(
    service: &AuthService,
    change_request: ChangePasswordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(change_password(service, change_request, request).await)
}

async fn change_password(
    service: &AuthService,
    change_request: ChangePasswordRequest,
    request: &HttpRequest,
) -> Reply {
    let principal: Principal = current_principal(request)?;
    let storage = service.get_storage(request)?;

    // 缓存中的用户不含密码哈希，从数据库重新读取
    let user = storage
        .get_user_by_id(principal.user_id)
        .await
        .or_storage_failure("Failed to load user")?
        .or_not_found(ErrorCode::UserNotFound, "User not found")?;

    if !verify_password(&change_request.old_password, &user.password_hash) {
        return Err(bad_request(
            ErrorCode::PasswordInvalid,
            "The current password is incorrect",
        ));
    }

    validate_password_simple(&change_request.new_password)
        .map_err(|msg| bad_request(ErrorCode::UserPasswordInvalid, msg))?;

    if change_request.old_password == change_request.new_password {
        return Err(bad_request(
            ErrorCode::UserPasswordInvalid,
            "The new password must differ from the current one",
        ));
    }

    let password_hash = hash_password(&change_request.new_password)
        .map_err(|e| storage_failure("Failed to hash password", e))?;

    storage
        .update_user(
            user.id,
            UserUpdate {
                password_hash: Some(password_hash),
                ..Default::default()
            },
        )
        .await
        .or_storage_failure("Failed to change password")?
        .or_not_found(ErrorCode::UserNotFound, "User not found")?;

    if let (Some(token), Some(cache)) =
        (RequireJWT::extract_token(request), cache_from_request(request))
    {
        cache.remove(&user_key(&token)).await;
    }

    let mut event = AuditEvent::updated(Resource::User, user.id).summary("changed own password");
    if let Some(tenant_id) = user.tenant_id {
        event = event.in_scope(ResourceScope {
            tenant_id,
            campus_id: user.campus_id,
        });
    }
    record_audit(&storage, request, &principal, event).await;

    info!("User {} changed their password", user.username);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Password changed successfully")))
}
