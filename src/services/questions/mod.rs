pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::ErrorCode;
use crate::models::questions::entities::{Answer, Question, QuestionType, validate_question_content};
use crate::models::questions::requests::{
    CreateQuestionRequest, QuestionListParams, UpdateQuestionRequest,
};
use crate::policy::Principal;
use crate::services::common::{OptionExt, StorageResultExt, bad_request, conflict};
use crate::services::declare_service;
use crate::storage::Storage;
use crate::utils::validate::validate_required_text;

declare_service!(
    /// 题库：租户共享或校区私有的题目
    QuestionService
);

impl QuestionService {
    pub async fn list_questions(
        &self,
        query: QuestionListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_questions(self, query, request).await
    }

    pub async fn create_question(
        &self,
        question_data: CreateQuestionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_question(self, question_data, request).await
    }

    pub async fn get_question(
        &self,
        question_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_question(self, question_id, request).await
    }

    pub async fn update_question(
        &self,
        question_id: i64,
        update_data: UpdateQuestionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_question(self, question_id, update_data, request).await
    }

    pub async fn delete_question(
        &self,
        question_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_question(self, question_id, request).await
    }
}

pub(crate) async fn load_question(
    storage: &Arc<dyn Storage>,
    question_id: i64,
) -> Result<Question, HttpResponse> {
    storage
        .get_question_by_id(question_id)
        .await
        .or_storage_failure("Failed to load question")?
        .or_not_found(ErrorCode::QuestionNotFound, "Question not found")
}

/// 已被非草稿考试引用的题目不可修改或删除
async fn ensure_unlocked(storage: &Arc<dyn Storage>, question_id: i64) -> Result<(), HttpResponse> {
    let locked = storage
        .is_question_locked(question_id)
        .await
        .or_storage_failure("Failed to check question usage")?;
    if locked {
        return Err(conflict(
            ErrorCode::QuestionLocked,
            "The question is used by a published exam and can no longer be changed",
        ));
    }
    Ok(())
}

/// 新题目所属校区；未指定时绑定校区的角色落在自己的校区，管理员创建全租户共享题目
fn question_campus(principal: &Principal, requested: Option<i64>) -> Option<i64> {
    match requested {
        Some(campus_id) => Some(campus_id),
        None if principal.role.is_campus_bound() => principal.campus_id,
        None => None,
    }
}

/// 科目与题干 + 题型相关的内容校验
fn check_question(
    subject: &str,
    body: &str,
    question_type: QuestionType,
    options: &[String],
    answer: &Answer,
    marks: i32,
) -> Result<(), HttpResponse> {
    validate_required_text(subject, 64)
        .map_err(|msg| bad_request(ErrorCode::QuestionInvalid, format!("subject {msg}")))?;
    validate_required_text(body, 4000)
        .map_err(|msg| bad_request(ErrorCode::QuestionInvalid, format!("body {msg}")))?;
    validate_question_content(question_type, options, answer, marks)
        .map_err(|msg| bad_request(ErrorCode::QuestionInvalid, msg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;

    fn principal(role: UserRole, campus_id: Option<i64>) -> Principal {
        Principal {
            user_id: 1,
            role,
            tenant_id: Some(1),
            campus_id,
        }
    }

    #[test]
    fn test_question_campus_defaults() {
        let teacher = principal(UserRole::Teacher, Some(4));
        assert_eq!(question_campus(&teacher, None), Some(4));
        assert_eq!(question_campus(&teacher, Some(5)), Some(5));

        let admin = principal(UserRole::TenantAdmin, None);
        assert_eq!(question_campus(&admin, None), None);
        assert_eq!(question_campus(&admin, Some(2)), Some(2));
    }

    #[test]
    fn test_check_question() {
        let options = vec!["4".to_string(), "5".to_string()];
        assert!(
            check_question("math", "2 + 2 = ?", QuestionType::SingleChoice, &options, &Answer::Choice(0), 1)
                .is_ok()
        );
        assert!(
            check_question("  ", "2 + 2 = ?", QuestionType::SingleChoice, &options, &Answer::Choice(0), 1)
                .is_err()
        );
        assert!(
            check_question("math", "2 + 2 = ?", QuestionType::TrueFalse, &options, &Answer::Boolean(true), 1)
                .is_err()
        );
    }
}
