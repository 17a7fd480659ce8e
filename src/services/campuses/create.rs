use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CampusService;
use crate::models::campuses::requests::{CreateCampusRequest, NewCampus};
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{Action, Resource, ResourceScope};
use crate::services::common::{
    AuditEvent, OptionExt, PolicyResultExt, Reply, StorageResultExt, bad_request,
    current_principal, record_audit, respond,
};
use crate::utils::validate::{validate_campus_code, validate_required_text};

pub async fn create_campus(
    service: &CampusService,
    campus_data: CreateCampusRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(create(service, campus_data, request).await)
}

async fn create(service: &CampusService, campus_data: CreateCampusRequest, request: &HttpRequest) -> Reply {
    let principal = current_principal(request)?;
    let tenant_id = principal.resolve_tenant(campus_data.tenant_id).or_forbidden()?;
    principal
        .authorize(Resource::Campus, Action::Write, ResourceScope::tenant(tenant_id))
        .or_forbidden()?;

    let name = campus_data.name.trim().to_string();
    validate_required_text(&name, 128).map_err(|msg| bad_request(ErrorCode::BadRequest, msg))?;
    let code = campus_data.code.trim().to_string();
    validate_campus_code(&code).map_err(|msg| bad_request(ErrorCode::BadRequest, msg))?;

    let storage = service.get_storage(request)?;
    storage
        .get_tenant_by_id(tenant_id)
        .await
        .or_storage_failure("Failed to load tenant")?
        .or_not_found(ErrorCode::TenantNotFound, "Tenant not found")?;

    let campus = storage
        .create_campus(NewCampus {
            tenant_id,
            name,
            code,
            address: campus_data.address,
            created_by: Some(principal.user_id),
        })
        .await
        .or_conflict(
            ErrorCode::CampusAlreadyExists,
            "A campus with this code already exists in the tenant",
            "Failed to create campus",
        )?;

    record_audit(
        &storage,
        request,
        &principal,
        AuditEvent::created(Resource::Campus, campus.id)
            .in_scope(campus.scope())
            .summary(format!("created campus {}", campus.code)),
    )
    .await;

    Ok(HttpResponse::Created().json(ApiResponse::success(campus, "Campus created successfully")))
}
