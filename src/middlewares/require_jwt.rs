/*!
 * JWT 认证中间件
 *
 * 校验 `Authorization: Bearer <token>` 中的 access token，并把当前用户写入请求扩展。
 *
 * ```rust,ignore
 * web::scope("/api/v1/students")
 *     .wrap(RequireJWT)
 *     .route("", web::get().to(list_students))
 * ```
 *
 * 处理程序中通过 [`RequireJWT::extract_user`] 或 [`RequireJWT::extract_principal`] 取得身份。
 *
 * ## 拒绝条件
 *
 * - 缺少或无法验证的 token：401
 * - 账号不存在、已删除或非 active：401 / 403
 * - 账号所属租户已删除或已停用：403
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpRequest,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, info, warn};

use super::create_error_response;
use crate::cache::{CacheResult, ObjectCache, ObjectCacheExt, tenant_key, user_key};
use crate::models::ErrorCode;
use crate::models::tenants::entities::TenantStatus;
use crate::models::users::entities::User;
use crate::policy::Principal;
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Clone)]
pub struct RequireJWT;

/// 当前请求携带的 access token，注销时用于清除用户缓存
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

struct Rejection {
    status: StatusCode,
    code: ErrorCode,
    message: String,
}

impl Rejection {
    fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            code: ErrorCode::Unauthorized,
            message: message.into(),
        }
    }

    fn forbidden(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            code,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: ErrorCode::InternalServerError,
            message: message.into(),
        }
    }
}

fn app_data<T: ?Sized + 'static>(req: &ServiceRequest) -> Result<Arc<T>, Rejection> {
    req.app_data::<web::Data<Arc<T>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| Rejection::internal("Server is not fully initialised"))
}

fn bearer_token(req: &ServiceRequest) -> Result<String, Rejection> {
    req.headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Rejection::unauthorized("Missing or invalid Authorization header"))
}

async fn load_user(
    token: &str,
    cache: &Arc<dyn ObjectCache>,
    storage: &Arc<dyn Storage>,
) -> Result<User, Rejection> {
    let claims = JwtUtils::verify_access_token(token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        Rejection::unauthorized("Invalid or expired token")
    })?;

    let key = user_key(token);
    if let CacheResult::Found(user) = cache.get_json::<User>(&key).await {
        return Ok(user);
    }

    let user_id = claims
        .user_id()
        .ok_or_else(|| Rejection::unauthorized("Invalid user ID in token"))?;

    let user = storage
        .get_user_by_id(user_id)
        .await
        .map_err(|e| {
            warn!("Failed to load user {} during authentication: {}", user_id, e);
            Rejection::internal("Failed to load the authenticated user")
        })?
        .ok_or_else(|| Rejection::unauthorized("User not found"))?;

    if !user.is_active() {
        return Err(Rejection::forbidden(
            ErrorCode::AccountDisabled,
            "Your account is not active",
        ));
    }

    cache.insert_json(key, &user, 0).await;
    Ok(user)
}

/// 账号所属租户必须存在且处于 active 状态
async fn ensure_tenant_active(
    tenant_id: i64,
    cache: &Arc<dyn ObjectCache>,
    storage: &Arc<dyn Storage>,
) -> Result<(), Rejection> {
    let key = tenant_key(tenant_id);
    let status = match cache.get_json::<TenantStatus>(&key).await {
        CacheResult::Found(status) => status,
        _ => {
            let tenant = storage
                .get_tenant_by_id(tenant_id)
                .await
                .map_err(|e| {
                    warn!("Failed to load tenant {}: {}", tenant_id, e);
                    Rejection::internal("Failed to load the account's tenant")
                })?
                .ok_or_else(|| {
                    Rejection::forbidden(ErrorCode::TenantSuspended, "Your school no longer exists")
                })?;
            cache.insert_json(key, &tenant.status, 0).await;
            tenant.status
        }
    };

    match status {
        TenantStatus::Active => Ok(()),
        TenantStatus::Suspended => Err(Rejection::forbidden(
            ErrorCode::TenantSuspended,
            "Your school's account is suspended",
        )),
    }
}

async fn authenticate(req: &ServiceRequest) -> Result<(User, String), Rejection> {
    let token = bearer_token(req)?;
    let cache = app_data::<dyn ObjectCache>(req)?;
    let storage = app_data::<dyn Storage>(req)?;

    let user = load_user(&token, &cache, &storage).await?;
    if let Some(tenant_id) = user.tenant_id {
        ensure_tenant_active(tenant_id, &cache, &storage).await?;
    }
    Ok((user, token))
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 预检请求交给 CORS 处理
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(srv.call(req).await?.map_into_left_body());
            }

            match authenticate(&req).await {
                Ok((user, token)) => {
                    debug!("JWT authentication successful for ID: {}", user.id);
                    req.extensions_mut().insert(user);
                    req.extensions_mut().insert(BearerToken(token));
                    Ok(srv.call(req).await?.map_into_left_body())
                }
                Err(rejection) => {
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        rejection.message
                    );
                    Ok(req.into_response(
                        create_error_response(rejection.status, rejection.code, &rejection.message)
                            .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

impl RequireJWT {
    /// 取出中间件写入的当前用户
    pub fn extract_user(req: &HttpRequest) -> Option<User> {
        req.extensions().get::<User>().cloned()
    }

    pub fn extract_user_id(req: &HttpRequest) -> Option<i64> {
        req.extensions().get::<User>().map(|user| user.id)
    }

    /// 当前用户对应的授权主体
    pub fn extract_principal(req: &HttpRequest) -> Option<Principal> {
        req.extensions().get::<User>().map(Principal::from)
    }

    pub fn extract_token(req: &HttpRequest) -> Option<String> {
        req.extensions().get::<BearerToken>().map(|t| t.0.clone())
    }
}
