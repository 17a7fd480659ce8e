use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CampusService;
use crate::models::ApiResponse;
use crate::models::campuses::requests::{CampusListParams, CampusListQuery};
use crate::policy::{Action, Resource};
use crate::services::common::{PolicyResultExt, Reply, StorageResultExt, current_principal, respond};

pub async fn list_campuses(
    service: &CampusService,
    query: CampusListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(list(service, query, request).await)
}

async fn list(service: &CampusService, query: CampusListParams, request: &HttpRequest) -> Reply {
    let principal = current_principal(request)?;
    principal.require(Resource::Campus, Action::Read).or_forbidden()?;

    // 校区列表按租户过滤，绑定校区的角色也能看到同租户的其它校区
    let mut scope = principal.scope_filter().or_forbidden()?;
    scope.campus_id = None;

    let (page, size) = query.pagination.normalized();
    let storage = service.get_storage(request)?;
    let campuses = storage
        .list_campuses_with_pagination(CampusListQuery {
            page,
            size,
            scope,
            search: query.search,
        })
        .await
        .or_storage_failure("Failed to list campuses")?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        campuses,
        "Campus list retrieved successfully",
    )))
}
