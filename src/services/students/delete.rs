use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{StudentService, load_student};
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{Action, Resource};
use crate::services::common::{
    AuditEvent, PolicyResultExt, Reply, StorageResultExt, current_principal, not_found,
    record_audit, respond,
};

pub async fn delete_student(
    service: &StudentService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(delete(service, student_id, request).await)
}

async fn delete(service: &StudentService, student_id: i64, request: &HttpRequest) -> Reply {
    let principal = current_principal(request)?;
    let storage = service.get_storage(request)?;
    let student = load_student(&storage, student_id).await?;
    principal
        .authorize(Resource::Student, Action::Write, student.scope())
        .or_forbidden()?;

    if !storage
        .delete_student(student_id)
        .await
        .or_storage_failure("Student deletion failed")?
    {
        return Err(not_found(ErrorCode::StudentNotFound, "Student not found"));
    }

    record_audit(
        &storage,
        request,
        &principal,
        AuditEvent::deleted(Resource::Student, student_id)
            .in_scope(student.scope())
            .summary(format!("deleted student {}", student.admission_no)),
    )
    .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Student deleted successfully")))
}
