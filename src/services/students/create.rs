use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{StudentFields, StudentService, normalize_gender};
use crate::models::students::requests::{CreateStudentRequest, NewStudent};
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{Action, Resource};
use crate::services::campuses::load_campus;
use crate::services::common::{
    AuditEvent, PolicyResultExt, Reply, StorageResultExt, current_principal, record_audit,
    respond,
};

pub async fn create_student(
    service: &StudentService,
    student_data: CreateStudentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(create(service, student_data, request).await)
}

async fn create(
    service: &StudentService,
    student_data: CreateStudentRequest,
    request: &HttpRequest,
) -> Reply {
    let principal = current_principal(request)?;
    let campus_id = principal.resolve_campus(student_data.campus_id).or_forbidden()?;

    let admission_no = student_data.admission_no.trim().to_string();
    let first_name = student_data.first_name.trim().to_string();
    let last_name = student_data.last_name.trim().to_string();
    let gender = normalize_gender(student_data.gender);
    StudentFields {
        admission_no: Some(&admission_no),
        first_name: Some(&first_name),
        last_name: Some(&last_name),
        date_of_birth: student_data.date_of_birth,
        gender: gender.as_deref(),
        guardian_name: student_data.guardian_name.as_deref(),
        guardian_phone: student_data.guardian_phone.as_deref(),
    }
    .check()?;

    let storage = service.get_storage(request)?;
    let campus = load_campus(&storage, campus_id).await?;
    principal
        .authorize(Resource::Student, Action::Write, campus.scope())
        .or_forbidden()?;

    let student = storage
        .create_student(NewStudent {
            tenant_id: campus.tenant_id,
            campus_id: campus.id,
            admission_no,
            first_name,
            last_name,
            date_of_birth: student_data.date_of_birth,
            gender,
            guardian_name: student_data.guardian_name,
            guardian_phone: student_data.guardian_phone,
            created_by: Some(principal.user_id),
        })
        .await
        .or_conflict(
            ErrorCode::StudentAlreadyExists,
            "A student with this admission number already exists",
            "Student creation failed",
        )?;

    record_audit(
        &storage,
        request,
        &principal,
        AuditEvent::created(Resource::Student, student.id)
            .in_scope(student.scope())
            .summary(format!("created student {}", student.admission_no)),
    )
    .await;

    Ok(HttpResponse::Created().json(ApiResponse::success(student, "Student created successfully")))
}
