use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TenantService;
use crate::models::ApiResponse;
use crate::models::tenants::requests::{TenantListParams, TenantListQuery};
use crate::policy::{Action, PolicyDenial, Resource};
use crate::services::common::{
    PolicyResultExt, Reply, StorageResultExt, current_principal, deny, respond,
};

pub async fn list_tenants(
    service: &TenantService,
    query: TenantListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(list(service, query, request).await)
}

async fn list(service: &TenantService, query: TenantListParams, request: &HttpRequest) -> Reply {
    let principal = current_principal(request)?;
    principal.require(Resource::Tenant, Action::Read).or_forbidden()?;

    let only_id = if principal.is_super_admin() {
        None
    } else {
        Some(principal.tenant_id.ok_or_else(|| deny(PolicyDenial::NoTenant))?)
    };

    let (page, size) = query.pagination.normalized();
    let storage = service.get_storage(request)?;
    let tenants = storage
        .list_tenants_with_pagination(TenantListQuery {
            page,
            size,
            only_id,
            status: query.status,
            search: query.search,
        })
        .await
        .or_storage_failure("Failed to list tenants")?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        tenants,
        "Tenant list retrieved successfully",
    )))
}
