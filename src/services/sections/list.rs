use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SectionService;
use crate::models::ApiResponse;
use crate::models::sections::requests::{SectionListQuery, SectionQueryParams};
use crate::policy::{Action, Resource};
use crate::services::common::{PolicyResultExt, Reply, StorageResultExt, current_principal, respond};

pub async fn list_sections(
    service: &SectionService,
    query: SectionQueryParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(list(service, query, request).await)
}

async fn list(service: &SectionService, query: SectionQueryParams, request: &HttpRequest) -> Reply {
    let principal = current_principal(request)?;
    principal.require(Resource::Section, Action::Read).or_forbidden()?;
    let scope = principal.scope_filter().or_forbidden()?;

    let (page, size) = query.pagination.normalized();
    let storage = service.get_storage(request)?;
    let sections = storage
        .list_sections_with_pagination(SectionListQuery {
            page,
            size,
            scope,
            class_id: query.class_id,
            campus_id: query.campus_id,
        })
        .await
        .or_storage_failure("Failed to retrieve section list")?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        sections,
        "Section list retrieved successfully",
    )))
}
