use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header::AUTHORIZATION};

use crate::cache::user_key;
use crate::models::ApiResponse;
use crate::services::common::cache_from_request;
use crate::utils::jwt::JwtUtils;

/// 处理用户登出
///
/// 清除 refresh token cookie；若请求携带 access token，同时移除对应的用户缓存。
pub async fn handle_logout(request: &HttpRequest) -> ActixResult<HttpResponse> {
    let bearer = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|s| !s.is_empty());

    if let (Some(token), Some(cache)) = (bearer, cache_from_request(request)) {
        cache.remove(&user_key(token)).await;
    }

    Ok(HttpResponse::Ok()
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::success_empty("Logged out successfully")))
}
