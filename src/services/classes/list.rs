use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::models::ApiResponse;
use crate::models::classes::requests::{ClassListQuery, ClassQueryParams};
use crate::policy::{Action, Resource};
use crate::services::common::{PolicyResultExt, Reply, StorageResultExt, current_principal, respond};

pub async fn list_classes(
    service: &ClassService,
    query: ClassQueryParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(list(service, query, request).await)
}

async fn list(service: &ClassService, query: ClassQueryParams, request: &HttpRequest) -> Reply {
    let principal = current_principal(request)?;
    principal.require(Resource::Class, Action::Read).or_forbidden()?;
    let scope = principal.scope_filter().or_forbidden()?;

    let (page, size) = query.pagination.normalized();
    let storage = service.get_storage(request)?;
    let classes = storage
        .list_classes_with_pagination(ClassListQuery {
            page,
            size,
            scope,
            campus_id: query.campus_id,
            grade_level: query.grade_level.and_then(|g| i32::try_from(g).ok()),
            search: query.search,
        })
        .await
        .or_storage_failure("Failed to retrieve class list")?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        classes,
        "Class list retrieved successfully",
    )))
}
