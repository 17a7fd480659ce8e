use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ExamService;
use crate::models::ApiResponse;
use crate::models::exams::requests::{ExamListParams, ExamListQuery};
use crate::policy::{Action, Resource};
use crate::services::common::{PolicyResultExt, Reply, StorageResultExt, current_principal, respond};

pub async fn list_exams(
    service: &ExamService,
    query: ExamListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(list(service, query, request).await)
}

async fn list(service: &ExamService, query: ExamListParams, request: &HttpRequest) -> Reply {
    let principal = current_principal(request)?;
    principal.require(Resource::Exam, Action::Read).or_forbidden()?;
    let scope = principal.scope_filter().or_forbidden()?;

    let (page, size) = query.pagination.normalized();
    let storage = service.get_storage(request)?;
    let exams = storage
        .list_exams_with_pagination(ExamListQuery {
            page,
            size,
            scope,
            campus_id: query.campus_id,
            class_id: query.class_id,
            status: query.status,
            search: query.search,
        })
        .await
        .or_storage_failure("Failed to retrieve exam list")?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(exams, "Exam list retrieved successfully")))
}
