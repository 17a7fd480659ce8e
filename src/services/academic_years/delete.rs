use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AcademicYearService, load_academic_year};
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{Action, Resource};
use crate::services::common::{
    AuditEvent, PolicyResultExt, Reply, StorageResultExt, current_principal, not_found,
    record_audit, respond,
};

pub async fn delete_academic_year(
    service: &AcademicYearService,
    year_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(delete(service, year_id, request).await)
}

async fn delete(service: &AcademicYearService, year_id: i64, request: &HttpRequest) -> Reply {
    let principal = current_principal(request)?;
    let storage = service.get_storage(request)?;
    let year = load_academic_year(&storage, year_id).await?;
    principal
        .authorize(Resource::AcademicYear, Action::Write, year.scope())
        .or_forbidden()?;

    if !storage
        .delete_academic_year(year_id)
        .await
        .or_storage_failure("Failed to delete academic year")?
    {
        return Err(not_found(ErrorCode::AcademicYearNotFound, "Academic year not found"));
    }

    record_audit(
        &storage,
        request,
        &principal,
        AuditEvent::deleted(Resource::AcademicYear, year_id)
            .in_scope(year.scope())
            .summary(format!("deleted academic year {}", year.name)),
    )
    .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
        "Academic year deleted successfully",
    )))
}
