use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{TenantService, invalidate_tenant_status};
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{Action, Resource, ResourceScope};
use crate::services::common::{
    AuditEvent, PolicyResultExt, Reply, StorageResultExt, current_principal, not_found,
    record_audit, respond,
};

pub async fn delete_tenant(
    service: &TenantService,
    tenant_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(delete(service, tenant_id, request).await)
}

async fn delete(service: &TenantService, tenant_id: i64, request: &HttpRequest) -> Reply {
    let principal = current_principal(request)?;
    principal.require(Resource::Tenant, Action::Write).or_forbidden()?;

    let storage = service.get_storage(request)?;
    let deleted = storage
        .delete_tenant(tenant_id)
        .await
        .or_storage_failure("Failed to delete tenant")?;
    if !deleted {
        return Err(not_found(ErrorCode::TenantNotFound, "Tenant not found"));
    }

    // 已删除租户的账号在下次请求时被拒绝
    invalidate_tenant_status(request, tenant_id).await;

    record_audit(
        &storage,
        request,
        &principal,
        AuditEvent::deleted(Resource::Tenant, tenant_id).in_scope(ResourceScope::tenant(tenant_id)),
    )
    .await;

    info!("Tenant {} deleted by user {}", tenant_id, principal.user_id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Tenant deleted successfully")))
}
