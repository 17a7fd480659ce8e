use chrono::NaiveDate;
use serde::Deserialize;

use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_i64;

#[derive(Debug, Deserialize)]
pub struct AcademicYearListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    /// 超级管理员按租户筛选
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub tenant_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateAcademicYearRequest {
    /// 仅超级管理员需要指定
    pub tenant_id: Option<i64>,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateAcademicYearRequest {
    pub name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

// 存储层参数
#[derive(Debug, Clone)]
pub struct NewAcademicYear {
    pub tenant_id: i64,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_by: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct AcademicYearListQuery {
    pub page: u64,
    pub size: u64,
    pub tenant_id: Option<i64>,
}
