use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CampusService, load_campus};
use crate::models::campuses::requests::UpdateCampusRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{Action, Resource};
use crate::services::common::{
    AuditEvent, OptionExt, PolicyResultExt, Reply, StorageResultExt, bad_request,
    current_principal, record_audit, respond,
};
use crate::utils::validate::{validate_campus_code, validate_required_text};

pub async fn update_campus(
    service: &CampusService,
    campus_id: i64,
    update_data: UpdateCampusRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(update(service, campus_id, update_data, request).await)
}

async fn update(
    service: &CampusService,
    campus_id: i64,
    mut update_data: UpdateCampusRequest,
    request: &HttpRequest,
) -> Reply {
    let principal = current_principal(request)?;
    let storage = service.get_storage(request)?;
    let campus = load_campus(&storage, campus_id).await?;
    principal
        .authorize(Resource::Campus, Action::Write, campus.scope())
        .or_forbidden()?;

    if let Some(name) = update_data.name.as_mut() {
        *name = name.trim().to_string();
        validate_required_text(name, 128).map_err(|msg| bad_request(ErrorCode::BadRequest, msg))?;
    }
    if let Some(code) = update_data.code.as_mut() {
        *code = code.trim().to_string();
        validate_campus_code(code).map_err(|msg| bad_request(ErrorCode::BadRequest, msg))?;
    }

    let campus = storage
        .update_campus(campus_id, update_data)
        .await
        .or_conflict(
            ErrorCode::CampusAlreadyExists,
            "A campus with this code already exists in the tenant",
            "Failed to update campus",
        )?
        .or_not_found(ErrorCode::CampusNotFound, "Campus not found")?;

    record_audit(
        &storage,
        request,
        &principal,
        AuditEvent::updated(Resource::Campus, campus.id).in_scope(campus.scope()),
    )
    .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(campus, "Campus updated successfully")))
}
