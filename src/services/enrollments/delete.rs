use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{EnrollmentService, load_enrollment};
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{Action, Resource};
use crate::services::common::{
    AuditEvent, PolicyResultExt, Reply, StorageResultExt, current_principal, not_found,
    record_audit, respond,
};

pub async fn delete_enrollment(
    service: &EnrollmentService,
    enrollment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(delete(service, enrollment_id, request).await)
}

async fn delete(service: &EnrollmentService, enrollment_id: i64, request: &HttpRequest) -> Reply {
    let principal = current_principal(request)?;
    let storage = service.get_storage(request)?;
    let enrollment = load_enrollment(&storage, enrollment_id).await?;
    principal
        .authorize(Resource::Enrollment, Action::Write, enrollment.scope())
        .or_forbidden()?;

    if !storage
        .delete_enrollment(enrollment_id)
        .await
        .or_storage_failure("Enrollment deletion failed")?
    {
        return Err(not_found(ErrorCode::EnrollmentNotFound, "Enrollment not found"));
    }

    record_audit(
        &storage,
        request,
        &principal,
        AuditEvent::deleted(Resource::Enrollment, enrollment_id).in_scope(enrollment.scope()),
    )
    .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Enrollment deleted successfully")))
}
