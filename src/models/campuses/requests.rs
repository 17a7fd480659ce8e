use crate::models::common::PaginationQuery;
use crate::policy::ScopeFilter;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CampusListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCampusRequest {
    /// 仅超级管理员需要指定
    pub tenant_id: Option<i64>,
    pub name: String,
    pub code: String,
    pub address: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateCampusRequest {
    pub name: Option<String>,
    pub code: Option<String>,
    pub address: Option<String>,
}

// 存储层参数
#[derive(Debug, Clone)]
pub struct NewCampus {
    pub tenant_id: i64,
    pub name: String,
    pub code: String,
    pub address: Option<String>,
    pub created_by: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct CampusListQuery {
    pub page: u64,
    pub size: u64,
    pub scope: ScopeFilter,
    pub search: Option<String>,
}
