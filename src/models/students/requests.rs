use chrono::NaiveDate;
use serde::Deserialize;

use super::entities::StudentStatus;
use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_i64;
use crate::policy::ScopeFilter;

#[derive(Debug, Deserialize)]
pub struct StudentListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub campus_id: Option<i64>,
    /// 当前在该分班有有效注册的学生
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub section_id: Option<i64>,
    pub status: Option<StudentStatus>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateStudentRequest {
    pub campus_id: Option<i64>,
    pub admission_no: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateStudentRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub status: Option<StudentStatus>,
}

// 存储层参数
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub tenant_id: i64,
    pub campus_id: i64,
    pub admission_no: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub created_by: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct StudentListQuery {
    pub page: u64,
    pub size: u64,
    pub scope: ScopeFilter,
    pub campus_id: Option<i64>,
    pub section_id: Option<i64>,
    pub status: Option<StudentStatus>,
    pub search: Option<String>,
}

/// 一次批量导入：学生与其在目标分班的注册在同一事务中写入
#[derive(Debug, Clone)]
pub struct StudentImportBatch {
    pub section_id: i64,
    pub academic_year_id: i64,
    pub students: Vec<NewStudent>,
}
