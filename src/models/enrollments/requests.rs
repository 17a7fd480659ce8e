use serde::Deserialize;

use super::entities::EnrollmentStatus;
use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_i64;
use crate::policy::ScopeFilter;

#[derive(Debug, Deserialize)]
pub struct EnrollmentListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub student_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub section_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub academic_year_id: Option<i64>,
    pub status: Option<EnrollmentStatus>,
}

#[derive(Debug, Deserialize)]
pub struct CreateEnrollmentRequest {
    pub student_id: i64,
    pub section_id: i64,
    pub academic_year_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEnrollmentStatusRequest {
    pub status: EnrollmentStatus,
}

// 存储层参数
#[derive(Debug, Clone)]
pub struct NewEnrollment {
    pub tenant_id: i64,
    pub campus_id: i64,
    pub student_id: i64,
    pub section_id: i64,
    pub academic_year_id: i64,
    pub created_by: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct EnrollmentListQuery {
    pub page: u64,
    pub size: u64,
    pub scope: ScopeFilter,
    pub student_id: Option<i64>,
    pub section_id: Option<i64>,
    pub academic_year_id: Option<i64>,
    pub status: Option<EnrollmentStatus>,
}
