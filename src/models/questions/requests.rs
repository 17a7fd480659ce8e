use serde::Deserialize;

use super::entities::{Answer, Difficulty, QuestionType};
use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_i64;
use crate::policy::ScopeFilter;

#[derive(Debug, Deserialize)]
pub struct QuestionListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    pub subject: Option<String>,
    pub question_type: Option<QuestionType>,
    pub difficulty: Option<Difficulty>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub campus_id: Option<i64>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateQuestionRequest {
    /// 超级管理员需要指定
    pub tenant_id: Option<i64>,
    /// 为空时：租户管理员创建全租户共享题目，校区级角色默认使用自己的校区
    pub campus_id: Option<i64>,
    pub subject: String,
    pub question_type: QuestionType,
    pub body: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub answer: Answer,
    pub marks: i32,
    pub difficulty: Difficulty,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateQuestionRequest {
    pub subject: Option<String>,
    pub question_type: Option<QuestionType>,
    pub body: Option<String>,
    pub options: Option<Vec<String>>,
    pub answer: Option<Answer>,
    pub marks: Option<i32>,
    pub difficulty: Option<Difficulty>,
}

// 存储层参数
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub tenant_id: i64,
    pub campus_id: Option<i64>,
    pub subject: String,
    pub question_type: QuestionType,
    pub body: String,
    pub options: Vec<String>,
    pub answer: Answer,
    pub marks: i32,
    pub difficulty: Difficulty,
    pub created_by: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct QuestionListQuery {
    pub page: u64,
    pub size: u64,
    /// 校区过滤同时包含全租户共享题目
    pub scope: ScopeFilter,
    pub campus_id: Option<i64>,
    pub subject: Option<String>,
    pub question_type: Option<QuestionType>,
    pub difficulty: Option<Difficulty>,
    pub search: Option<String>,
}
