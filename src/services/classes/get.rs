use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ClassService, load_class};
use crate::models::ApiResponse;
use crate::policy::{Action, Resource};
use crate::services::common::{PolicyResultExt, Reply, current_principal, respond};

pub async fn get_class(
    service: &ClassService,
    class_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(get(service, class_id, request).await)
}

async fn get(service: &ClassService, class_id: i64, request: &HttpRequest) -> Reply {
    let principal = current_principal(request)?;
    let storage = service.get_storage(request)?;
    let class = load_class(&storage, class_id).await?;
    principal
        .authorize(Resource::Class, Action::Read, class.scope())
        .or_forbidden()?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(class, "Class retrieved successfully")))
}
