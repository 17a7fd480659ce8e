use super::entities::TenantStatus;
use crate::models::common::PaginationQuery;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TenantListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<TenantStatus>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTenantRequest {
    pub name: String,
    pub code: String,
    pub contact_email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateTenantRequest {
    pub name: Option<String>,
    pub status: Option<TenantStatus>,
    pub contact_email: Option<String>,
}

// 存储层参数
#[derive(Debug, Clone)]
pub struct NewTenant {
    pub name: String,
    pub code: String,
    pub contact_email: Option<String>,
    pub created_by: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct TenantListQuery {
    pub page: u64,
    pub size: u64,
    /// 非超级管理员只能看到自己的租户
    pub only_id: Option<i64>,
    pub status: Option<TenantStatus>,
    pub search: Option<String>,
}
