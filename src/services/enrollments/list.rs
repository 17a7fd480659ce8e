use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EnrollmentService;
use crate::models::ApiResponse;
use crate::models::enrollments::requests::{EnrollmentListParams, EnrollmentListQuery};
use crate::policy::{Action, Resource};
use crate::services::common::{PolicyResultExt, Reply, StorageResultExt, current_principal, respond};

pub async fn list_enrollments(
    service: &EnrollmentService,
    query: EnrollmentListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(list(service, query, request).await)
}

async fn list(service: &EnrollmentService, query: EnrollmentListParams, request: &HttpRequest) -> Reply {
    let principal = current_principal(request)?;
    principal.require(Resource::Enrollment, Action::Read).or_forbidden()?;
    let scope = principal.scope_filter().or_forbidden()?;

    let (page, size) = query.pagination.normalized();
    let storage = service.get_storage(request)?;
    let enrollments = storage
        .list_enrollments_with_pagination(EnrollmentListQuery {
            page,
            size,
            scope,
            student_id: query.student_id,
            section_id: query.section_id,
            academic_year_id: query.academic_year_id,
            status: query.status,
        })
        .await
        .or_storage_failure("Failed to retrieve enrollment list")?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        enrollments,
        "Enrollment list retrieved successfully",
    )))
}
