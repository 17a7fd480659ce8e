use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ExamService, check_duration, check_exam_class, check_title, ensure_editable, load_exam};
use crate::models::exams::requests::UpdateExamRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{Action, Resource};
use crate::services::common::{
    AuditEvent, OptionExt, PolicyResultExt, Reply, StorageResultExt, current_principal,
    record_audit, respond,
};

pub async fn update_exam(
    service: &ExamService,
    exam_id: i64,
    update_data: UpdateExamRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(update(service, exam_id, update_data, request).await)
}

async fn update(
    service: &ExamService,
    exam_id: i64,
    mut update_data: UpdateExamRequest,
    request: &HttpRequest,
) -> Reply {
    let principal = current_principal(request)?;
    let storage = service.get_storage(request)?;
    let exam = load_exam(&storage, exam_id).await?;
    principal
        .authorize(Resource::Exam, Action::Write, exam.scope())
        .or_forbidden()?;
    ensure_editable(&exam)?;

    update_data.title = update_data.title.map(|s| s.trim().to_string());
    if let Some(title) = &update_data.title {
        check_title(title)?;
    }
    if let Some(minutes) = update_data.duration_minutes {
        check_duration(minutes)?;
    }
    if let Some(class_id) = update_data.class_id {
        check_exam_class(&storage, class_id, exam.campus_id).await?;
    }

    let exam = storage
        .update_exam(exam_id, update_data)
        .await
        .or_storage_failure("Exam update failed")?
        .or_not_found(ErrorCode::ExamNotFound, "Exam not found")?;

    record_audit(
        &storage,
        request,
        &principal,
        AuditEvent::updated(Resource::Exam, exam.id).in_scope(exam.scope()),
    )
    .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(exam, "Exam updated successfully")))
}
