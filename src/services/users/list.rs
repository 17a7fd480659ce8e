use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::ApiResponse;
use crate::models::users::requests::{UserListParams, UserListQuery};
use crate::policy::{Action, Resource};
use crate::services::common::{PolicyResultExt, Reply, StorageResultExt, current_principal, respond};

pub async fn list_users(
    service: &UserService,
    query: UserListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(list(service, query, request).await)
}

async fn list(service: &UserService, query: UserListParams, request: &HttpRequest) -> Reply {
    let principal = current_principal(request)?;
    principal.require(Resource::User, Action::Read).or_forbidden()?;
    let scope = principal.scope_filter().or_forbidden()?;

    let (page, size) = query.pagination.normalized();
    let storage = service.get_storage(request)?;
    let users = storage
        .list_users_with_pagination(UserListQuery {
            page,
            size,
            scope,
            role: query.role,
            status: query.status,
            campus_id: query.campus_id,
            search: query.search,
        })
        .await
        .or_storage_failure("Failed to retrieve user list")?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        users,
        "User list retrieved successfully",
    )))
}
