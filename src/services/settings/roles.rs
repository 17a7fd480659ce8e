use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::ApiResponse;
use crate::models::settings::responses::RolesResponse;
use crate::policy::{Action, Resource, permission_matrix};
use crate::services::common::{PolicyResultExt, Reply, current_principal, respond};

/// 角色权限矩阵（只读）
pub async fn list_roles(request: &HttpRequest) -> ActixResult<HttpResponse> {
    respond(roles(request))
}

fn roles(request: &HttpRequest) -> Reply {
    let principal = current_principal(request)?;
    principal.require(Resource::Setting, Action::Read).or_forbidden()?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        RolesResponse {
            roles: permission_matrix(),
        },
        "Role permissions retrieved successfully",
    )))
}
