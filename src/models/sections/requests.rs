use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_i64;
use crate::policy::ScopeFilter;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SectionQueryParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub class_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub campus_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSectionRequest {
    pub class_id: i64,
    pub name: String,
    pub capacity: Option<i32>,
    pub homeroom_teacher_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateSectionRequest {
    pub name: Option<String>,
    pub capacity: Option<i32>,
    pub homeroom_teacher_id: Option<i64>,
}

// 存储层参数
#[derive(Debug, Clone)]
pub struct NewSection {
    pub tenant_id: i64,
    pub campus_id: i64,
    pub class_id: i64,
    pub name: String,
    pub capacity: Option<i32>,
    pub homeroom_teacher_id: Option<i64>,
    pub created_by: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct SectionListQuery {
    pub page: u64,
    pub size: u64,
    pub scope: ScopeFilter,
    pub class_id: Option<i64>,
    pub campus_id: Option<i64>,
}
