use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::entities::ExamStatus;
use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_i64;
use crate::policy::ScopeFilter;

#[derive(Debug, Deserialize)]
pub struct ExamListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub campus_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub class_id: Option<i64>,
    pub status: Option<ExamStatus>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateExamRequest {
    pub campus_id: Option<i64>,
    pub class_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    /// 为空时使用租户设置 exams.default_duration_minutes
    pub duration_minutes: Option<i32>,
    pub scheduled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateExamRequest {
    pub class_id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration_minutes: Option<i32>,
    pub scheduled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct AddExamQuestionRequest {
    pub question_id: i64,
}

// 存储层参数
#[derive(Debug, Clone)]
pub struct NewExam {
    pub tenant_id: i64,
    pub campus_id: i64,
    pub class_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub created_by: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct ExamListQuery {
    pub page: u64,
    pub size: u64,
    pub scope: ScopeFilter,
    pub campus_id: Option<i64>,
    pub class_id: Option<i64>,
    pub status: Option<ExamStatus>,
    pub search: Option<String>,
}
