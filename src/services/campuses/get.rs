use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CampusService, load_campus};
use crate::models::ApiResponse;
use crate::policy::{Action, Resource, ResourceScope};
use crate::services::common::{PolicyResultExt, Reply, current_principal, respond};

pub async fn get_campus(
    service: &CampusService,
    campus_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(get(service, campus_id, request).await)
}

async fn get(service: &CampusService, campus_id: i64, request: &HttpRequest) -> Reply {
    let principal = current_principal(request)?;
    let storage = service.get_storage(request)?;
    let campus = load_campus(&storage, campus_id).await?;

    principal
        .authorize(Resource::Campus, Action::Read, ResourceScope::tenant(campus.tenant_id))
        .or_forbidden()?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(campus, "Campus retrieved successfully")))
}
