use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ClassService, check_grade_level, load_class};
use crate::models::classes::requests::UpdateClassRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{Action, Resource};
use crate::services::common::{
    AuditEvent, OptionExt, PolicyResultExt, Reply, StorageResultExt, bad_request,
    current_principal, record_audit, respond,
};
use crate::utils::validate::validate_required_text;

pub async fn update_class(
    service: &ClassService,
    class_id: i64,
    update_data: UpdateClassRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(update(service, class_id, update_data, request).await)
}

async fn update(
    service: &ClassService,
    class_id: i64,
    mut update_data: UpdateClassRequest,
    request: &HttpRequest,
) -> Reply {
    let principal = current_principal(request)?;
    let storage = service.get_storage(request)?;
    let class = load_class(&storage, class_id).await?;
    principal
        .authorize(Resource::Class, Action::Write, class.scope())
        .or_forbidden()?;

    if let Some(name) = update_data.name.as_mut() {
        *name = name.trim().to_string();
        validate_required_text(name, 64).map_err(|msg| bad_request(ErrorCode::BadRequest, msg))?;
    }
    if let Some(grade_level) = update_data.grade_level {
        check_grade_level(grade_level)?;
    }

    let class = storage
        .update_class(class_id, update_data)
        .await
        .or_conflict(
            ErrorCode::ClassAlreadyExists,
            "A class with this name already exists in the campus",
            "Class update failed",
        )?
        .or_not_found(ErrorCode::ClassNotFound, "Class not found")?;

    record_audit(
        &storage,
        request,
        &principal,
        AuditEvent::updated(Resource::Class, class.id).in_scope(class.scope()),
    )
    .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(class, "Class updated successfully")))
}
