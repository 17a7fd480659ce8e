use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::tenants::requests::{CreateTenantRequest, TenantListParams, UpdateTenantRequest};
use crate::services::TenantService;
use crate::utils::SafeIDI64;

// 懒加载的全局 TenantService 实例
static TENANT_SERVICE: Lazy<TenantService> = Lazy::new(TenantService::new_lazy);

// HTTP处理程序
pub async fn list_tenants(
    req: HttpRequest,
    query: web::Query<TenantListParams>,
) -> ActixResult<HttpResponse> {
    TENANT_SERVICE.list_tenants(query.into_inner(), &req).await
}

pub async fn create_tenant(
    req: HttpRequest,
    tenant_data: web::Json<CreateTenantRequest>,
) -> ActixResult<HttpResponse> {
    TENANT_SERVICE.create_tenant(tenant_data.into_inner(), &req).await
}

pub async fn get_tenant(req: HttpRequest, tenant_id: SafeIDI64) -> ActixResult<HttpResponse> {
    TENANT_SERVICE.get_tenant(tenant_id.0, &req).await
}

pub async fn update_tenant(
    req: HttpRequest,
    tenant_id: SafeIDI64,
    update_data: web::Json<UpdateTenantRequest>,
) -> ActixResult<HttpResponse> {
    TENANT_SERVICE
        .update_tenant(tenant_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_tenant(req: HttpRequest, tenant_id: SafeIDI64) -> ActixResult<HttpResponse> {
    TENANT_SERVICE.delete_tenant(tenant_id.0, &req).await
}

// 配置路由
pub fn configure_tenant_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/tenants")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_tenants))
            .route("", web::post().to(create_tenant))
            .route("/{id}", web::get().to(get_tenant))
            .route("/{id}", web::put().to(update_tenant))
            .route("/{id}", web::delete().to(delete_tenant)),
    );
}
