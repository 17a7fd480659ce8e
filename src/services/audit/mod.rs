use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::ApiResponse;
use crate::models::audit::requests::{AuditLogListParams, AuditLogListQuery};
use crate::policy::{Action, Resource};
use crate::services::common::{PolicyResultExt, Reply, StorageResultExt, current_principal, respond};
use crate::services::declare_service;

declare_service!(
    /// 审计日志查询（只读）
    AuditService
);

impl AuditService {
    pub async fn list_audit_logs(
        &self,
        query: AuditLogListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(self.list(query, request).await)
    }

    async fn list(&self, query: AuditLogListParams, request: &HttpRequest) -> Reply {
        let principal = current_principal(request)?;
        principal.require(Resource::AuditLog, Action::Read).or_forbidden()?;
        let scope = principal.scope_filter().or_forbidden()?;

        let (page, size) = query.pagination.normalized();
        let storage = self.get_storage(request)?;
        let logs = storage
            .list_audit_logs_with_pagination(AuditLogListQuery {
                page,
                size,
                scope,
                resource: query.resource,
                actor_id: query.actor_id,
            })
            .await
            .or_storage_failure("Failed to retrieve audit logs")?;

        Ok(HttpResponse::Ok().json(ApiResponse::success(
            logs,
            "Audit logs retrieved successfully",
        )))
    }
}
