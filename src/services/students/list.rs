use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::models::ApiResponse;
use crate::models::students::requests::{StudentListParams, StudentListQuery};
use crate::policy::{Action, Resource};
use crate::services::common::{PolicyResultExt, Reply, StorageResultExt, current_principal, respond};

pub async fn list_students(
    service: &StudentService,
    query: StudentListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(list(service, query, request).await)
}

async fn list(service: &StudentService, query: StudentListParams, request: &HttpRequest) -> Reply {
    let principal = current_principal(request)?;
    principal.require(Resource::Student, Action::Read).or_forbidden()?;
    let scope = principal.scope_filter().or_forbidden()?;

    let (page, size) = query.pagination.normalized();
    let storage = service.get_storage(request)?;
    let students = storage
        .list_students_with_pagination(StudentListQuery {
            page,
            size,
            scope,
            campus_id: query.campus_id,
            section_id: query.section_id,
            status: query.status,
            search: query.search,
        })
        .await
        .or_storage_failure("Failed to retrieve student list")?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        students,
        "Student list retrieved successfully",
    )))
}
