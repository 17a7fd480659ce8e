use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_i64;
use crate::policy::ScopeFilter;
use serde::Deserialize;

// 班级查询参数（来自HTTP请求）
#[derive(Debug, Deserialize)]
pub struct ClassQueryParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub campus_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub grade_level: Option<i64>,
    pub search: Option<String>,
}

// 创建班级请求
//
// 校区级角色不填 campus_id 时使用自己的校区
#[derive(Debug, Deserialize)]
pub struct CreateClassRequest {
    pub campus_id: Option<i64>,
    pub name: String,
    pub grade_level: i32,
    pub description: Option<String>,
}

// 更新班级请求
#[derive(Debug, Default, Deserialize)]
pub struct UpdateClassRequest {
    pub name: Option<String>,
    pub grade_level: Option<i32>,
    pub description: Option<String>,
}

// 存储层参数
#[derive(Debug, Clone)]
pub struct NewClass {
    pub tenant_id: i64,
    pub campus_id: i64,
    pub name: String,
    pub grade_level: i32,
    pub description: Option<String>,
    pub created_by: Option<i64>,
}

// 班级列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct ClassListQuery {
    pub page: u64,
    pub size: u64,
    pub scope: ScopeFilter,
    pub campus_id: Option<i64>,
    pub grade_level: Option<i32>,
    pub search: Option<String>,
}
