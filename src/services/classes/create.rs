use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ClassService, check_grade_level};
use crate::models::classes::requests::{CreateClassRequest, NewClass};
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{Action, Resource};
use crate::services::campuses::load_campus;
use crate::services::common::{
    AuditEvent, PolicyResultExt, Reply, StorageResultExt, bad_request, current_principal,
    record_audit, respond,
};
use crate::utils::validate::validate_required_text;

pub async fn create_class(
    service: &ClassService,
    class_data: CreateClassRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(create(service, class_data, request).await)
}

async fn create(service: &ClassService, class_data: CreateClassRequest, request: &HttpRequest) -> Reply {
    let principal = current_principal(request)?;
    let campus_id = principal.resolve_campus(class_data.campus_id).or_forbidden()?;

    let name = class_data.name.trim().to_string();
    validate_required_text(&name, 64).map_err(|msg| bad_request(ErrorCode::BadRequest, msg))?;
    check_grade_level(class_data.grade_level)?;

    let storage = service.get_storage(request)?;
    let campus = load_campus(&storage, campus_id).await?;
    principal
        .authorize(Resource::Class, Action::Write, campus.scope())
        .or_forbidden()?;

    let class = storage
        .create_class(NewClass {
            tenant_id: campus.tenant_id,
            campus_id: campus.id,
            name,
            grade_level: class_data.grade_level,
            description: class_data.description,
            created_by: Some(principal.user_id),
        })
        .await
        .or_conflict(
            ErrorCode::ClassAlreadyExists,
            "A class with this name already exists in the campus",
            "Class creation failed",
        )?;

    record_audit(
        &storage,
        request,
        &principal,
        AuditEvent::created(Resource::Class, class.id)
            .in_scope(class.scope())
            .summary(format!("created class {}", class.name)),
    )
    .await;

    Ok(HttpResponse::Created().json(ApiResponse::success(class, "Class created successfully")))
}
