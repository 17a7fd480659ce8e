use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{EnrollmentService, check_enrollment_scope};
use crate::models::enrollments::requests::{CreateEnrollmentRequest, NewEnrollment};
use crate::models::students::entities::StudentStatus;
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{Action, Resource};
use crate::services::academic_years::load_academic_year;
use crate::services::common::{
    AuditEvent, PolicyResultExt, Reply, StorageResultExt, bad_request, conflict,
    current_principal, record_audit, respond,
};
use crate::services::sections::load_section;
use crate::services::students::load_student;

pub async fn create_enrollment(
    service: &EnrollmentService,
    enrollment_data: CreateEnrollmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(create(service, enrollment_data, request).await)
}

async fn create(
    service: &EnrollmentService,
    enrollment_data: CreateEnrollmentRequest,
    request: &HttpRequest,
) -> Reply {
    let principal = current_principal(request)?;
    let storage = service.get_storage(request)?;

    let section = load_section(&storage, enrollment_data.section_id).await?;
    principal
        .authorize(Resource::Enrollment, Action::Write, section.scope())
        .or_forbidden()?;
    let student = load_student(&storage, enrollment_data.student_id).await?;
    let year = load_academic_year(&storage, enrollment_data.academic_year_id).await?;

    check_enrollment_scope(&student, &section, &year)
        .map_err(|msg| bad_request(ErrorCode::EnrollmentScopeMismatch, msg))?;
    if student.status != StudentStatus::Active {
        return Err(bad_request(
            ErrorCode::StudentInvalid,
            format!("Student {} is {}", student.admission_no, student.status),
        ));
    }

    // 每个学年只能有一条有效注册
    if storage
        .has_active_enrollment(student.id, year.id)
        .await
        .or_storage_failure("Failed to check existing enrollment")?
    {
        return Err(conflict(
            ErrorCode::EnrollmentConflict,
            "The student already has an active enrollment in this academic year",
        ));
    }

    if section.capacity.is_some() {
        let enrolled = storage
            .count_active_enrollments(section.id, year.id)
            .await
            .or_storage_failure("Failed to count enrollments")?;
        if section.remaining_seats(enrolled) == Some(0) {
            return Err(conflict(ErrorCode::SectionFull, "The section is full"));
        }
    }

    let enrollment = storage
        .create_enrollment(NewEnrollment {
            tenant_id: section.tenant_id,
            campus_id: section.campus_id,
            student_id: student.id,
            section_id: section.id,
            academic_year_id: year.id,
            created_by: Some(principal.user_id),
        })
        .await
        .or_conflict(
            ErrorCode::EnrollmentConflict,
            "The student already has an active enrollment in this academic year",
            "Enrollment creation failed",
        )?;

    record_audit(
        &storage,
        request,
        &principal,
        AuditEvent::created(Resource::Enrollment, enrollment.id)
            .in_scope(enrollment.scope())
            .summary(format!(
                "enrolled {} in section {} for {}",
                student.admission_no, section.name, year.name
            )),
    )
    .await;

    Ok(HttpResponse::Created().json(ApiResponse::success(
        enrollment,
        "Enrollment created successfully",
    )))
}
