pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::cache::tenant_key;
use crate::models::tenants::requests::{CreateTenantRequest, TenantListParams, UpdateTenantRequest};
use crate::services::common::cache_from_request;
use crate::services::declare_service;

declare_service!(
    /// 租户（学校）管理，写操作仅限超级管理员
    TenantService
);

impl TenantService {
    pub async fn list_tenants(
        &self,
        query: TenantListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_tenants(self, query, request).await
    }

    pub async fn create_tenant(
        &self,
        tenant_data: CreateTenantRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_tenant(self, tenant_data, request).await
    }

    pub async fn get_tenant(&self, tenant_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_tenant(self, tenant_id, request).await
    }

    pub async fn update_tenant(
        &self,
        tenant_id: i64,
        update_data: UpdateTenantRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_tenant(self, tenant_id, update_data, request).await
    }

    pub async fn delete_tenant(
        &self,
        tenant_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_tenant(self, tenant_id, request).await
    }
}

/// 状态变化后清除认证中间件缓存的租户状态
async fn invalidate_tenant_status(request: &HttpRequest, tenant_id: i64) {
    if let Some(cache) = cache_from_request(request) {
        cache.remove(&tenant_key(tenant_id)).await;
    }
}

pub(crate) fn validate_name(name: &str) -> Result<(), String> {
    crate::utils::validate::validate_required_text(name, 128)
}
