use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{EnrollmentService, load_enrollment};
use crate::models::ApiResponse;
use crate::policy::{Action, Resource};
use crate::services::common::{PolicyResultExt, Reply, current_principal, respond};

pub async fn get_enrollment(
    service: &EnrollmentService,
    enrollment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(get(service, enrollment_id, request).await)
}

async fn get(service: &EnrollmentService, enrollment_id: i64, request: &HttpRequest) -> Reply {
    let principal = current_principal(request)?;
    let storage = service.get_storage(request)?;
    let enrollment = load_enrollment(&storage, enrollment_id).await?;
    principal
        .authorize(Resource::Enrollment, Action::Read, enrollment.scope())
        .or_forbidden()?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        enrollment,
        "Enrollment retrieved successfully",
    )))
}
