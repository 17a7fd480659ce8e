use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AcademicYearService, load_academic_year};
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{Action, Resource};
use crate::services::common::{
    AuditEvent, OptionExt, PolicyResultExt, Reply, StorageResultExt, current_principal,
    record_audit, respond,
};

pub async fn set_current_academic_year(
    service: &AcademicYearService,
    year_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(set_current(service, year_id, request).await)
}

async fn set_current(service: &AcademicYearService, year_id: i64, request: &HttpRequest) -> Reply {
    let principal = current_principal(request)?;
    let storage = service.get_storage(request)?;
    let year = load_academic_year(&storage, year_id).await?;
    principal
        .authorize(Resource::AcademicYear, Action::Write, year.scope())
        .or_forbidden()?;

    // 同一事务内清除租户其它学年的当前标记
    let year = storage
        .set_current_academic_year(year.tenant_id, year_id)
        .await
        .or_storage_failure("Failed to set current academic year")?
        .or_not_found(ErrorCode::AcademicYearNotFound, "Academic year not found")?;

    record_audit(
        &storage,
        request,
        &principal,
        AuditEvent::updated(Resource::AcademicYear, year.id)
            .in_scope(year.scope())
            .summary(format!("set {} as current academic year", year.name)),
    )
    .await;

    info!("Academic year {} is now current for tenant {}", year.name, year.tenant_id);
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        year,
        "Current academic year updated",
    )))
}
