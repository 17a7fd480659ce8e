use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SectionService, check_capacity, load_section, validate_homeroom_teacher};
use crate::models::sections::requests::UpdateSectionRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{Action, Resource};
use crate::services::common::{
    AuditEvent, OptionExt, PolicyResultExt, Reply, StorageResultExt, bad_request,
    current_principal, record_audit, respond,
};
use crate::utils::validate::validate_required_text;

pub async fn update_section(
    service: &SectionService,
    section_id: i64,
    update_data: UpdateSectionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(update(service, section_id, update_data, request).await)
}

async fn update(
    service: &SectionService,
    section_id: i64,
    mut update_data: UpdateSectionRequest,
    request: &HttpRequest,
) -> Reply {
    let principal = current_principal(request)?;
    let storage = service.get_storage(request)?;
    let section = load_section(&storage, section_id).await?;
    principal
        .authorize(Resource::Section, Action::Write, section.scope())
        .or_forbidden()?;

    if let Some(name) = update_data.name.as_mut() {
        *name = name.trim().to_string();
        validate_required_text(name, 64).map_err(|msg| bad_request(ErrorCode::SectionInvalid, msg))?;
    }
    check_capacity(update_data.capacity)?;
    if let Some(teacher_id) = update_data.homeroom_teacher_id {
        validate_homeroom_teacher(&storage, teacher_id, section.scope()).await?;
    }

    let section = storage
        .update_section(section_id, update_data)
        .await
        .or_conflict(
            ErrorCode::SectionInvalid,
            "A section with this name already exists in the class",
            "Section update failed",
        )?
        .or_not_found(ErrorCode::SectionNotFound, "Section not found")?;

    record_audit(
        &storage,
        request,
        &principal,
        AuditEvent::updated(Resource::Section, section.id).in_scope(section.scope()),
    )
    .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(section, "Section updated successfully")))
}
