use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{TenantService, invalidate_tenant_status, validate_name};
use crate::models::tenants::requests::UpdateTenantRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{Action, Resource, ResourceScope};
use crate::services::common::{
    AuditEvent, OptionExt, PolicyResultExt, Reply, StorageResultExt, bad_request,
    current_principal, record_audit, respond,
};
use crate::utils::validate::validate_email;

pub async fn update_tenant(
    service: &TenantService,
    tenant_id: i64,
    update_data: UpdateTenantRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(update(service, tenant_id, update_data, request).await)
}

async fn update(
    service: &TenantService,
    tenant_id: i64,
    mut update_data: UpdateTenantRequest,
    request: &HttpRequest,
) -> Reply {
    let principal = current_principal(request)?;
    principal.require(Resource::Tenant, Action::Write).or_forbidden()?;

    if let Some(name) = update_data.name.as_mut() {
        *name = name.trim().to_string();
        validate_name(name).map_err(|msg| bad_request(ErrorCode::BadRequest, msg))?;
    }
    if let Some(email) = update_data.contact_email.as_deref() {
        validate_email(email).map_err(|msg| bad_request(ErrorCode::BadRequest, msg))?;
    }

    let status_changed = update_data.status.is_some();
    let storage = service.get_storage(request)?;
    let tenant = storage
        .update_tenant(tenant_id, update_data)
        .await
        .or_storage_failure("Failed to update tenant")?
        .or_not_found(ErrorCode::TenantNotFound, "Tenant not found")?;

    if status_changed {
        invalidate_tenant_status(request, tenant_id).await;
        info!("Tenant {} status set to {}", tenant.code, tenant.status);
    }

    record_audit(
        &storage,
        request,
        &principal,
        AuditEvent::updated(Resource::Tenant, tenant.id)
            .in_scope(ResourceScope::tenant(tenant.id))
            .summary(format!("updated tenant {}", tenant.code)),
    )
    .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(tenant, "Tenant updated successfully")))
}
