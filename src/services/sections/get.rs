use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SectionService, load_section};
use crate::models::ApiResponse;
use crate::policy::{Action, Resource};
use crate::services::common::{PolicyResultExt, Reply, current_principal, respond};

pub async fn get_section(
    service: &SectionService,
    section_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(get(service, section_id, request).await)
}

async fn get(service: &SectionService, section_id: i64, request: &HttpRequest) -> Reply {
    let principal = current_principal(request)?;
    let storage = service.get_storage(request)?;
    let section = load_section(&storage, section_id).await?;
    principal
        .authorize(Resource::Section, Action::Read, section.scope())
        .or_forbidden()?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(section, "Section retrieved successfully")))
}
