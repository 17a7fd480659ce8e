//! 服务层共用的响应与审计辅助函数

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;
use tracing::{error, warn};

use crate::cache::ObjectCache;
use crate::errors::ScholarPrepError;
use crate::middlewares::RequireJWT;
use crate::models::audit::entities::{AuditAction, NewAuditLog};
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{PolicyDenial, Principal, Resource, ResourceScope};
use crate::storage::Storage;

/// 处理函数内部的返回类型，`Err` 分支是已构造好的错误响应
pub(crate) type Reply = Result<HttpResponse, HttpResponse>;

pub(crate) fn respond(reply: Reply) -> ActixResult<HttpResponse> {
    Ok(reply.unwrap_or_else(|response| response))
}

pub(crate) fn storage_from_request(request: &HttpRequest) -> Result<Arc<dyn Storage>, HttpResponse> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| {
            error!("Storage not found in app data");
            internal_error("Storage is not available")
        })
}

pub(crate) fn cache_from_request(request: &HttpRequest) -> Option<Arc<dyn ObjectCache>> {
    request
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone())
}

/// 当前请求的授权主体，未经认证时返回 401
pub(crate) fn current_principal(request: &HttpRequest) -> Result<Principal, HttpResponse> {
    RequireJWT::extract_principal(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        ))
    })
}

pub(crate) fn bad_request(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn conflict(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn not_found(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn internal_error(message: impl Into<String>) -> HttpResponse {
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::InternalServerError,
        message,
    ))
}

/// 授权失败统一返回 403
pub(crate) fn deny(denial: PolicyDenial) -> HttpResponse {
    let code = match denial {
        PolicyDenial::RoleNotAssignable(_) => ErrorCode::RoleNotAssignable,
        PolicyDenial::SelfModification => ErrorCode::CanNotDeleteCurrentUser,
        _ => ErrorCode::Forbidden,
    };
    HttpResponse::Forbidden().json(ApiResponse::error_empty(code, denial.message()))
}

/// 存储层错误映射为 HTTP 响应
pub(crate) fn storage_failure(context: &str, err: ScholarPrepError) -> HttpResponse {
    match err {
        ScholarPrepError::Conflict(detail) => {
            warn!("{}: {}", context, detail);
            conflict(ErrorCode::Conflict, format!("{context}: record already exists"))
        }
        ScholarPrepError::NotFound(msg) => not_found(ErrorCode::NotFound, msg),
        ScholarPrepError::Validation(msg) => bad_request(ErrorCode::BadRequest, msg),
        other => {
            error!("{}: {}", context, other);
            internal_error(format!("{context}: {}", other.message()))
        }
    }
}

pub(crate) trait PolicyResultExt<T> {
    fn or_forbidden(self) -> Result<T, HttpResponse>;
}

impl<T> PolicyResultExt<T> for Result<T, PolicyDenial> {
    fn or_forbidden(self) -> Result<T, HttpResponse> {
        self.map_err(deny)
    }
}

pub(crate) trait StorageResultExt<T> {
    /// 普通存储错误
    fn or_storage_failure(self, context: &str) -> Result<T, HttpResponse>;

    /// 唯一约束冲突使用指定业务码，其余同 `or_storage_failure`
    fn or_conflict(self, code: ErrorCode, message: &str, context: &str)
    -> Result<T, HttpResponse>;
}

impl<T> StorageResultExt<T> for crate::errors::Result<T> {
    fn or_storage_failure(self, context: &str) -> Result<T, HttpResponse> {
        self.map_err(|e| storage_failure(context, e))
    }

    fn or_conflict(
        self,
        code: ErrorCode,
        message: &str,
        context: &str,
    ) -> Result<T, HttpResponse> {
        self.map_err(|e| match e {
            ScholarPrepError::Conflict(_) => conflict(code, message),
            other => storage_failure(context, other),
        })
    }
}

pub(crate) trait OptionExt<T> {
    fn or_not_found(self, code: ErrorCode, message: &str) -> Result<T, HttpResponse>;
}

impl<T> OptionExt<T> for Option<T> {
    fn or_not_found(self, code: ErrorCode, message: &str) -> Result<T, HttpResponse> {
        self.ok_or_else(|| not_found(code, message))
    }
}

/// 客户端 IP（用于审计）
pub(crate) fn client_ip(request: &HttpRequest) -> Option<String> {
    request
        .connection_info()
        .realip_remote_addr()
        .map(|s| s.to_string())
}

/// 一条待记录的审计事件
#[derive(Debug, Clone)]
pub(crate) struct AuditEvent {
    action: AuditAction,
    resource: Resource,
    resource_id: Option<i64>,
    tenant_id: Option<i64>,
    campus_id: Option<i64>,
    summary: Option<String>,
}

impl AuditEvent {
    pub(crate) fn new(action: AuditAction, resource: Resource, resource_id: i64) -> Self {
        Self {
            action,
            resource,
            resource_id: Some(resource_id),
            tenant_id: None,
            campus_id: None,
            summary: None,
        }
    }

    pub(crate) fn created(resource: Resource, resource_id: i64) -> Self {
        Self::new(AuditAction::Create, resource, resource_id)
    }

    pub(crate) fn updated(resource: Resource, resource_id: i64) -> Self {
        Self::new(AuditAction::Update, resource, resource_id)
    }

    pub(crate) fn deleted(resource: Resource, resource_id: i64) -> Self {
        Self::new(AuditAction::Delete, resource, resource_id)
    }

    /// 批量操作，不对应单个资源 ID
    pub(crate) fn batch(action: AuditAction, resource: Resource) -> Self {
        Self {
            action,
            resource,
            resource_id: None,
            tenant_id: None,
            campus_id: None,
            summary: None,
        }
    }

    pub(crate) fn in_scope(mut self, scope: ResourceScope) -> Self {
        self.tenant_id = Some(scope.tenant_id);
        self.campus_id = scope.campus_id;
        self
    }

    pub(crate) fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    fn into_new_log(self, actor_id: i64, ip_address: Option<String>) -> NewAuditLog {
        NewAuditLog {
            tenant_id: self.tenant_id,
            campus_id: self.campus_id,
            actor_id,
            action: self.action,
            resource: self.resource,
            resource_id: self.resource_id,
            summary: self.summary,
            ip_address,
        }
    }
}

/// 写入审计日志；失败只记录告警，不影响已完成的业务操作
pub(crate) async fn record_audit(
    storage: &Arc<dyn Storage>,
    request: &HttpRequest,
    principal: &Principal,
    event: AuditEvent,
) {
    let log = event.into_new_log(principal.user_id, client_ip(request));
    let (action, resource, resource_id) = (log.action, log.resource, log.resource_id);
    if let Err(e) = storage.create_audit_log(log).await {
        warn!(
            "Failed to record audit log ({} {} {:?}): {}",
            action, resource, resource_id, e
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use actix_web::http::StatusCode;

    #[test]
    fn test_deny_maps_to_forbidden() {
        let response = deny(PolicyDenial::OutsideTenant);
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let response = deny(PolicyDenial::RoleNotAssignable(UserRole::TenantAdmin));
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_storage_failure_status() {
        assert_eq!(
            storage_failure("x", ScholarPrepError::conflict("dup")).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            storage_failure("x", ScholarPrepError::not_found("gone")).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            storage_failure("x", ScholarPrepError::validation("bad")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            storage_failure("x", ScholarPrepError::database_operation("down")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_or_conflict_uses_business_code() {
        let result: crate::errors::Result<()> = Err(ScholarPrepError::conflict("uq"));
        let response = result
            .or_conflict(ErrorCode::StudentAlreadyExists, "exists", "ctx")
            .unwrap_err();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_audit_event_builder() {
        let log = AuditEvent::created(Resource::Student, 9)
            .in_scope(ResourceScope::campus(1, 2))
            .summary("created student ADM-9")
            .into_new_log(5, Some("127.0.0.1".to_string()));
        assert_eq!(log.actor_id, 5);
        assert_eq!(log.tenant_id, Some(1));
        assert_eq!(log.campus_id, Some(2));
        assert_eq!(log.resource_id, Some(9));
        assert_eq!(log.action, AuditAction::Create);
    }
}
