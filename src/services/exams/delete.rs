use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ExamService, load_exam};
use crate::models::exams::entities::ExamStatus;
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{Action, Resource};
use crate::services::common::{
    AuditEvent, PolicyResultExt, Reply, StorageResultExt, conflict, current_principal, not_found,
    record_audit, respond,
};

pub async fn delete_exam(
    service: &ExamService,
    exam_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(delete(service, exam_id, request).await)
}

async fn delete(service: &ExamService, exam_id: i64, request: &HttpRequest) -> Reply {
    let principal = current_principal(request)?;
    let storage = service.get_storage(request)?;
    let exam = load_exam(&storage, exam_id).await?;
    principal
        .authorize(Resource::Exam, Action::Write, exam.scope())
        .or_forbidden()?;

    // 已发布的考试须先归档
    if exam.status == ExamStatus::Published {
        return Err(conflict(
            ErrorCode::ExamNotEditable,
            "A published exam cannot be deleted, archive it first",
        ));
    }

    if !storage
        .delete_exam(exam_id)
        .await
        .or_storage_failure("Exam deletion failed")?
    {
        return Err(not_found(ErrorCode::ExamNotFound, "Exam not found"));
    }

    record_audit(
        &storage,
        request,
        &principal,
        AuditEvent::deleted(Resource::Exam, exam_id)
            .in_scope(exam.scope())
            .summary(format!("deleted exam {}", exam.title)),
    )
    .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Exam deleted successfully")))
}
