use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SectionService, check_capacity, validate_homeroom_teacher};
use crate::models::sections::requests::{CreateSectionRequest, NewSection};
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{Action, Resource};
use crate::services::classes::load_class;
use crate::services::common::{
    AuditEvent, PolicyResultExt, Reply, StorageResultExt, bad_request, current_principal,
    record_audit, respond,
};
use crate::utils::validate::validate_required_text;

pub async fn create_section(
    service: &SectionService,
    section_data: CreateSectionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(create(service, section_data, request).await)
}

async fn create(
    service: &SectionService,
    section_data: CreateSectionRequest,
    request: &HttpRequest,
) -> Reply {
    let principal = current_principal(request)?;

    let name = section_data.name.trim().to_string();
    validate_required_text(&name, 64).map_err(|msg| bad_request(ErrorCode::SectionInvalid, msg))?;
    check_capacity(section_data.capacity)?;

    let storage = service.get_storage(request)?;
    let class = load_class(&storage, section_data.class_id).await?;
    principal
        .authorize(Resource::Section, Action::Write, class.scope())
        .or_forbidden()?;

    if let Some(teacher_id) = section_data.homeroom_teacher_id {
        validate_homeroom_teacher(&storage, teacher_id, class.scope()).await?;
    }

    let section = storage
        .create_section(NewSection {
            tenant_id: class.tenant_id,
            campus_id: class.campus_id,
            class_id: class.id,
            name,
            capacity: section_data.capacity,
            homeroom_teacher_id: section_data.homeroom_teacher_id,
            created_by: Some(principal.user_id),
        })
        .await
        .or_conflict(
            ErrorCode::SectionInvalid,
            "A section with this name already exists in the class",
            "Section creation failed",
        )?;

    record_audit(
        &storage,
        request,
        &principal,
        AuditEvent::created(Resource::Section, section.id)
            .in_scope(section.scope())
            .summary(format!("created section {} of class {}", section.name, class.name)),
    )
    .await;

    Ok(HttpResponse::Created().json(ApiResponse::success(section, "Section created successfully")))
}
