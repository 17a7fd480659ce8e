use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AuthService;
use super::login::ensure_account_usable;
use crate::models::auth::responses::RefreshTokenResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::{Reply, StorageResultExt, internal_error, respond};
use crate::utils::jwt::JwtUtils;

fn session_expired() -> HttpResponse {
    // 同时清除无效的 refresh token cookie
    HttpResponse::Unauthorized()
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Login expired or invalid, please login again",
        ))
}

pub async fn handle_refresh_token(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(refresh(service, request).await)
}

async fn refresh(service: &AuthService, request: &HttpRequest) -> Reply {
    let refresh_token = JwtUtils::extract_refresh_token_from_cookie(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        ))
    })?;

    let claims = JwtUtils::verify_refresh_token(&refresh_token).map_err(|e| {
        info!("Refresh token rejected: {}", e);
        session_expired()
    })?;
    let user_id = claims.user_id().ok_or_else(session_expired)?;

    // 以数据库中的当前状态为准，角色变更或停用后立即生效
    let storage = service.get_storage(request)?;
    let user = storage
        .get_user_by_id(user_id)
        .await
        .or_storage_failure("Failed to refresh token")?
        .ok_or_else(session_expired)?;
    ensure_account_usable(&storage, &user).await?;

    let access_token = JwtUtils::generate_access_token(user.id, user.role.as_str())
        .map_err(|e| {
            tracing::error!("Failed to generate access token: {}", e);
            internal_error("Unable to generate token")
        })?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        RefreshTokenResponse {
            access_token,
            expires_in: JwtUtils::access_token_ttl(),
        },
        "Token refreshed successfully",
    )))
}
