use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{StudentFields, StudentService, load_student, normalize_gender};
use crate::models::students::requests::UpdateStudentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{Action, Resource};
use crate::services::common::{
    AuditEvent, OptionExt, PolicyResultExt, Reply, StorageResultExt, current_principal,
    record_audit, respond,
};

pub async fn update_student(
    service: &StudentService,
    student_id: i64,
    update_data: UpdateStudentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(update(service, student_id, update_data, request).await)
}

async fn update(
    service: &StudentService,
    student_id: i64,
    mut update_data: UpdateStudentRequest,
    request: &HttpRequest,
) -> Reply {
    let principal = current_principal(request)?;
    let storage = service.get_storage(request)?;
    let student = load_student(&storage, student_id).await?;
    principal
        .authorize(Resource::Student, Action::Write, student.scope())
        .or_forbidden()?;

    update_data.first_name = update_data.first_name.map(|s| s.trim().to_string());
    update_data.last_name = update_data.last_name.map(|s| s.trim().to_string());
    update_data.gender = normalize_gender(update_data.gender);
    StudentFields {
        admission_no: None,
        first_name: update_data.first_name.as_deref(),
        last_name: update_data.last_name.as_deref(),
        date_of_birth: update_data.date_of_birth,
        gender: update_data.gender.as_deref(),
        guardian_name: update_data.guardian_name.as_deref(),
        guardian_phone: update_data.guardian_phone.as_deref(),
    }
    .check()?;

    let student = storage
        .update_student(student_id, update_data)
        .await
        .or_storage_failure("Student update failed")?
        .or_not_found(ErrorCode::StudentNotFound, "Student not found")?;

    record_audit(
        &storage,
        request,
        &principal,
        AuditEvent::updated(Resource::Student, student.id)
            .in_scope(student.scope())
            .summary(format!("updated student {}", student.admission_no)),
    )
    .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(student, "Student updated successfully")))
}
