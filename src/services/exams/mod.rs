pub mod create;
pub mod delete;
pub mod detail;
pub mod list;
pub mod questions;
pub mod status;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::ops::RangeInclusive;
use std::sync::Arc;

use crate::models::ErrorCode;
use crate::models::exams::entities::{Exam, ExamStatus};
use crate::models::exams::requests::{
    AddExamQuestionRequest, CreateExamRequest, ExamListParams, UpdateExamRequest,
};
use crate::services::classes::load_class;
use crate::services::common::{OptionExt, StorageResultExt, bad_request, conflict};
use crate::services::declare_service;
use crate::storage::Storage;
use crate::utils::validate::validate_required_text;

/// 考试时长（分钟）
pub const EXAM_DURATION_RANGE: RangeInclusive<i32> = 1..=600;

declare_service!(
    /// 考试与试卷组卷
    ExamService
);

impl ExamService {
    pub async fn list_exams(
        &self,
        query: ExamListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_exams(self, query, request).await
    }

    pub async fn create_exam(
        &self,
        exam_data: CreateExamRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_exam(self, exam_data, request).await
    }

    /// 考试详情，包含按顺序排列的题目与总分
    pub async fn get_exam(&self, exam_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        detail::get_exam(self, exam_id, request).await
    }

    pub async fn update_exam(
        &self,
        exam_id: i64,
        update_data: UpdateExamRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_exam(self, exam_id, update_data, request).await
    }

    pub async fn delete_exam(&self, exam_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        delete::delete_exam(self, exam_id, request).await
    }

    pub async fn publish_exam(&self, exam_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        status::change_exam_status(self, exam_id, ExamStatus::Published, request).await
    }

    pub async fn archive_exam(&self, exam_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        status::change_exam_status(self, exam_id, ExamStatus::Archived, request).await
    }

    pub async fn add_exam_question(
        &self,
        exam_id: i64,
        question_data: AddExamQuestionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        questions::add_exam_question(self, exam_id, question_data, request).await
    }

    pub async fn remove_exam_question(
        &self,
        exam_id: i64,
        question_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        questions::remove_exam_question(self, exam_id, question_id, request).await
    }
}

pub(crate) async fn load_exam(storage: &Arc<dyn Storage>, exam_id: i64) -> Result<Exam, HttpResponse> {
    storage
        .get_exam_by_id(exam_id)
        .await
        .or_storage_failure("Failed to load exam")?
        .or_not_found(ErrorCode::ExamNotFound, "Exam not found")
}

/// 只有草稿可以修改内容与题目
fn ensure_editable(exam: &Exam) -> Result<(), HttpResponse> {
    if exam.status.is_editable() {
        Ok(())
    } else {
        Err(conflict(
            ErrorCode::ExamNotEditable,
            format!("The exam is {} and can no longer be edited", exam.status),
        ))
    }
}

fn check_duration(duration_minutes: i32) -> Result<(), HttpResponse> {
    if EXAM_DURATION_RANGE.contains(&duration_minutes) {
        Ok(())
    } else {
        Err(bad_request(
            ErrorCode::ExamInvalid,
            format!(
                "duration_minutes must be between {} and {}",
                EXAM_DURATION_RANGE.start(),
                EXAM_DURATION_RANGE.end()
            ),
        ))
    }
}

fn check_title(title: &str) -> Result<(), HttpResponse> {
    validate_required_text(title, 200)
        .map_err(|msg| bad_request(ErrorCode::ExamInvalid, format!("title {msg}")))
}

/// 指定的班级必须与考试在同一校区
async fn check_exam_class(
    storage: &Arc<dyn Storage>,
    class_id: i64,
    campus_id: i64,
) -> Result<(), HttpResponse> {
    let class = load_class(storage, class_id).await?;
    if class.campus_id != campus_id {
        return Err(bad_request(
            ErrorCode::ExamInvalid,
            "The class does not belong to the exam's campus",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use chrono::Utc;

    fn exam(status: ExamStatus) -> Exam {
        Exam {
            id: 1,
            tenant_id: 1,
            campus_id: 1,
            class_id: None,
            title: "Midterm".to_string(),
            description: None,
            status,
            duration_minutes: 60,
            scheduled_at: None,
            published_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            created_by: None,
        }
    }

    #[test]
    fn test_only_drafts_can_be_edited() {
        assert!(ensure_editable(&exam(ExamStatus::Draft)).is_ok());
        let response = ensure_editable(&exam(ExamStatus::Published)).unwrap_err();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert!(ensure_editable(&exam(ExamStatus::Archived)).is_err());
    }

    #[test]
    fn test_duration_bounds() {
        assert!(check_duration(1).is_ok());
        assert!(check_duration(600).is_ok());
        assert!(check_duration(0).is_err());
        assert!(check_duration(601).is_err());
    }

    #[test]
    fn test_title_required() {
        assert!(check_title("Final exam").is_ok());
        assert!(check_title("   ").is_err());
    }
}
