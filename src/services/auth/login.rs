use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::{info, warn};

use super::AuthService;
use crate::models::tenants::entities::TenantStatus;
use crate::models::users::entities::User;
use crate::policy::Principal;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::{requests::LoginRequest, responses::LoginResponse},
};
use crate::services::common::{Reply, StorageResultExt, internal_error, respond};
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use crate::utils::password::verify_password;

fn auth_failed() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::AuthFailed,
        "Username or password is incorrect",
    ))
}

/// 账号必须为 active，且所属租户存在并处于 active 状态
pub(super) async fn ensure_account_usable(
    storage: &Arc<dyn Storage>,
    user: &User,
) -> Result<(), HttpResponse> {
    if !user.is_active() {
        return Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::AccountDisabled,
            "Your account is not active",
        )));
    }

    if let Some(tenant_id) = user.tenant_id {
        let tenant = storage
            .get_tenant_by_id(tenant_id)
            .await
            .or_storage_failure("Failed to load tenant")?;
        if tenant.is_none_or(|t| t.status == TenantStatus::Suspended) {
            return Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::TenantSuspended,
                "Your school's account is suspended",
            )));
        }
    }
    Ok(())
}

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(login(service, login_request, request).await)
}

async fn login(service: &AuthService, login_request: LoginRequest, request: &HttpRequest) -> Reply {
    let storage = service.get_storage(request)?;

    let identifier = login_request.normalized_identifier();
    if identifier.is_empty() || login_request.password.is_empty() {
        return Err(auth_failed());
    }

    // 1. 根据用户名或邮箱查找账号（已删除的账号不可见）
    let user = storage
        .get_user_by_username_or_email(&identifier)
        .await
        .or_storage_failure("Login failed")?
        .ok_or_else(auth_failed)?;

    // 2. 验证密码
    if !verify_password(&login_request.password, &user.password_hash) {
        info!("Failed login attempt for {}", identifier);
        return Err(auth_failed());
    }

    // 3. 账号与租户状态
    ensure_account_usable(&storage, &user).await?;

    // 4. 更新最后登录时间
    if let Err(e) = storage.update_last_login(user.id).await {
        warn!("Failed to update last login for user {}: {}", user.id, e);
    }

    // 5. 签发令牌
    let token_pair = user.generate_token_pair(login_request.remember_me).map_err(|e| {
        tracing::error!("Failed to generate JWT token: {}", e);
        internal_error("Login failed, unable to generate token")
    })?;

    info!("User {} logged in successfully", user.username);

    let refresh_cookie = JwtUtils::create_refresh_token_cookie(
        &token_pair.refresh_token,
        token_pair.refresh_expires_in,
    );
    let response = LoginResponse {
        access_token: token_pair.access_token,
        expires_in: JwtUtils::access_token_ttl(),
        permissions: Principal::from(&user).permissions(),
        user,
    };

    Ok(HttpResponse::Ok()
        .cookie(refresh_cookie)
        .json(ApiResponse::success(response, "Login successful")))
}
