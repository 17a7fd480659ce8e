use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AcademicYearService;
use crate::models::academic_years::entities::validate_date_range;
use crate::models::academic_years::requests::{CreateAcademicYearRequest, NewAcademicYear};
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{Action, Resource, ResourceScope};
use crate::services::common::{
    AuditEvent, OptionExt, PolicyResultExt, Reply, StorageResultExt, bad_request,
    current_principal, record_audit, respond,
};
use crate::utils::validate::validate_required_text;

pub async fn create_academic_year(
    service: &AcademicYearService,
    year_data: CreateAcademicYearRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(create(service, year_data, request).await)
}

async fn create(
    service: &AcademicYearService,
    year_data: CreateAcademicYearRequest,
    request: &HttpRequest,
) -> Reply {
    let principal = current_principal(request)?;
    let tenant_id = principal.resolve_tenant(year_data.tenant_id).or_forbidden()?;
    principal
        .authorize(Resource::AcademicYear, Action::Write, ResourceScope::tenant(tenant_id))
        .or_forbidden()?;

    let name = year_data.name.trim().to_string();
    validate_required_text(&name, 64)
        .map_err(|msg| bad_request(ErrorCode::AcademicYearInvalid, msg))?;
    validate_date_range(year_data.start_date, year_data.end_date)
        .map_err(|msg| bad_request(ErrorCode::AcademicYearInvalid, msg))?;

    let storage = service.get_storage(request)?;
    storage
        .get_tenant_by_id(tenant_id)
        .await
        .or_storage_failure("Failed to load tenant")?
        .or_not_found(ErrorCode::TenantNotFound, "Tenant not found")?;

    let year = storage
        .create_academic_year(NewAcademicYear {
            tenant_id,
            name,
            start_date: year_data.start_date,
            end_date: year_data.end_date,
            created_by: Some(principal.user_id),
        })
        .await
        .or_conflict(
            ErrorCode::AcademicYearInvalid,
            "An academic year with this name already exists",
            "Failed to create academic year",
        )?;

    record_audit(
        &storage,
        request,
        &principal,
        AuditEvent::created(Resource::AcademicYear, year.id)
            .in_scope(year.scope())
            .summary(format!("created academic year {}", year.name)),
    )
    .await;

    Ok(HttpResponse::Created().json(ApiResponse::success(
        year,
        "Academic year created successfully",
    )))
}
