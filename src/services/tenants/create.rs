use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{TenantService, validate_name};
use crate::models::tenants::requests::{CreateTenantRequest, NewTenant};
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{Action, Resource, ResourceScope};
use crate::services::common::{
    AuditEvent, PolicyResultExt, Reply, StorageResultExt, bad_request, current_principal,
    record_audit, respond,
};
use crate::utils::validate::{validate_email, validate_tenant_code};

pub async fn create_tenant(
    service: &TenantService,
    tenant_data: CreateTenantRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(create(service, tenant_data, request).await)
}

async fn create(service: &TenantService, tenant_data: CreateTenantRequest, request: &HttpRequest) -> Reply {
    let principal = current_principal(request)?;
    principal.require(Resource::Tenant, Action::Write).or_forbidden()?;

    let name = tenant_data.name.trim().to_string();
    validate_name(&name).map_err(|msg| bad_request(ErrorCode::BadRequest, msg))?;

    let code = tenant_data.code.trim().to_string();
    validate_tenant_code(&code).map_err(|msg| bad_request(ErrorCode::TenantCodeInvalid, msg))?;

    if let Some(email) = tenant_data.contact_email.as_deref() {
        validate_email(email).map_err(|msg| bad_request(ErrorCode::BadRequest, msg))?;
    }

    let storage = service.get_storage(request)?;
    let tenant = storage
        .create_tenant(NewTenant {
            name,
            code,
            contact_email: tenant_data.contact_email,
            created_by: Some(principal.user_id),
        })
        .await
        .or_conflict(
            ErrorCode::TenantAlreadyExists,
            "A tenant with this code already exists",
            "Failed to create tenant",
        )?;

    record_audit(
        &storage,
        request,
        &principal,
        AuditEvent::created(Resource::Tenant, tenant.id)
            .in_scope(ResourceScope::tenant(tenant.id))
            .summary(format!("created tenant {}", tenant.code)),
    )
    .await;

    info!("Tenant {} created by user {}", tenant.code, principal.user_id);
    Ok(HttpResponse::Created().json(ApiResponse::success(tenant, "Tenant created successfully")))
}
