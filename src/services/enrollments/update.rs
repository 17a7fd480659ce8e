use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{EnrollmentService, load_enrollment};
use crate::models::enrollments::requests::UpdateEnrollmentStatusRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{Action, Resource};
use crate::services::common::{
    AuditEvent, OptionExt, PolicyResultExt, Reply, StorageResultExt, bad_request,
    current_principal, record_audit, respond,
};

pub async fn update_enrollment_status(
    service: &EnrollmentService,
    enrollment_id: i64,
    update_data: UpdateEnrollmentStatusRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(update(service, enrollment_id, update_data, request).await)
}

async fn update(
    service: &EnrollmentService,
    enrollment_id: i64,
    update_data: UpdateEnrollmentStatusRequest,
    request: &HttpRequest,
) -> Reply {
    let principal = current_principal(request)?;
    let storage = service.get_storage(request)?;
    let enrollment = load_enrollment(&storage, enrollment_id).await?;
    principal
        .authorize(Resource::Enrollment, Action::Write, enrollment.scope())
        .or_forbidden()?;

    let next = update_data.status;
    if !enrollment.status.can_transition_to(next) {
        return Err(bad_request(
            ErrorCode::EnrollmentTransitionInvalid,
            format!("Cannot change enrollment from {} to {}", enrollment.status, next),
        ));
    }

    // 结束状态由存储层写入 ended_at
    let enrollment = storage
        .update_enrollment_status(enrollment_id, next)
        .await
        .or_storage_failure("Enrollment update failed")?
        .or_not_found(ErrorCode::EnrollmentNotFound, "Enrollment not found")?;

    record_audit(
        &storage,
        request,
        &principal,
        AuditEvent::updated(Resource::Enrollment, enrollment.id)
            .in_scope(enrollment.scope())
            .summary(format!("enrollment status set to {next}")),
    )
    .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        enrollment,
        "Enrollment updated successfully",
    )))
}
