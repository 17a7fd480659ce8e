use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AcademicYearService, load_academic_year};
use crate::models::academic_years::entities::validate_date_range;
use crate::models::academic_years::requests::UpdateAcademicYearRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{Action, Resource};
use crate::services::common::{
    AuditEvent, OptionExt, PolicyResultExt, Reply, StorageResultExt, bad_request,
    current_principal, record_audit, respond,
};
use crate::utils::validate::validate_required_text;

pub async fn update_academic_year(
    service: &AcademicYearService,
    year_id: i64,
    update_data: UpdateAcademicYearRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(update(service, year_id, update_data, request).await)
}

async fn update(
    service: &AcademicYearService,
    year_id: i64,
    mut update_data: UpdateAcademicYearRequest,
    request: &HttpRequest,
) -> Reply {
    let principal = current_principal(request)?;
    let storage = service.get_storage(request)?;
    let year = load_academic_year(&storage, year_id).await?;
    principal
        .authorize(Resource::AcademicYear, Action::Write, year.scope())
        .or_forbidden()?;

    if let Some(name) = update_data.name.as_mut() {
        *name = name.trim().to_string();
        validate_required_text(name, 64)
            .map_err(|msg| bad_request(ErrorCode::AcademicYearInvalid, msg))?;
    }

    // 与未修改的一端组合后校验日期区间
    let start = update_data.start_date.unwrap_or(year.start_date);
    let end = update_data.end_date.unwrap_or(year.end_date);
    validate_date_range(start, end).map_err(|msg| bad_request(ErrorCode::AcademicYearInvalid, msg))?;

    let year = storage
        .update_academic_year(year_id, update_data)
        .await
        .or_conflict(
            ErrorCode::AcademicYearInvalid,
            "An academic year with this name already exists",
            "Failed to update academic year",
        )?
        .or_not_found(ErrorCode::AcademicYearNotFound, "Academic year not found")?;

    record_audit(
        &storage,
        request,
        &principal,
        AuditEvent::updated(Resource::AcademicYear, year.id).in_scope(year.scope()),
    )
    .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        year,
        "Academic year updated successfully",
    )))
}
