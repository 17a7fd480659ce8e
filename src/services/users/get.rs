use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{UserService, load_user};
use crate::models::ApiResponse;
use crate::models::users::responses::UserResponse;
use crate::services::common::{PolicyResultExt, Reply, current_principal, respond};

pub async fn get_user(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(get(service, user_id, request).await)
}

async fn get(service: &UserService, user_id: i64, request: &HttpRequest) -> Reply {
    let principal = current_principal(request)?;
    let storage = service.get_storage(request)?;
    let user = load_user(&storage, user_id).await?;
    principal.can_view_user(&user).or_forbidden()?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UserResponse { user },
        "User retrieved successfully",
    )))
}
