use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TenantService;
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{Action, Resource, ResourceScope};
use crate::services::common::{
    OptionExt, PolicyResultExt, Reply, StorageResultExt, current_principal, respond,
};

pub async fn get_tenant(
    service: &TenantService,
    tenant_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(get(service, tenant_id, request).await)
}

async fn get(service: &TenantService, tenant_id: i64, request: &HttpRequest) -> Reply {
    let principal = current_principal(request)?;
    principal
        .authorize(Resource::Tenant, Action::Read, ResourceScope::tenant(tenant_id))
        .or_forbidden()?;

    let storage = service.get_storage(request)?;
    let tenant = storage
        .get_tenant_by_id(tenant_id)
        .await
        .or_storage_failure("Failed to load tenant")?
        .or_not_found(ErrorCode::TenantNotFound, "Tenant not found")?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(tenant, "Tenant retrieved successfully")))
}

#[cfg(test)]
mod tests {
    use crate::models::ErrorCode;
    use crate::services::testing::*;
    use crate::services::{CampusService, TenantService};
    use actix_web::http::StatusCode;

    #[actix_web::test]
    async fn test_reads_are_confined_to_own_tenant() {
        let storage = memory_storage().await;
        let home = seed_school(&storage, "home", None).await;
        let away = seed_school(&storage, "away", None).await;
        let tenants = TenantService::with_storage(storage.clone());
        let campuses = CampusService::with_storage(storage.clone());
        let request = request_as(&home.admin);

        let response = tenants.get_tenant(home.tenant_id, &request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = tenants.get_tenant(away.tenant_id, &request).await.unwrap();
        assert_eq!(
            status_and_code(response).await,
            (StatusCode::FORBIDDEN, code(ErrorCode::Forbidden))
        );

        let response = campuses.get_campus(away.campus_id, &request).await.unwrap();
        assert_eq!(
            status_and_code(response).await,
            (StatusCode::FORBIDDEN, code(ErrorCode::Forbidden))
        );
    }
}
