use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ExamService, load_exam};
use crate::models::exams::entities::ExamStatus;
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{Action, Resource};
use crate::services::common::{
    AuditEvent, PolicyResultExt, Reply, StorageResultExt, bad_request, conflict,
    current_principal, record_audit, respond,
};

pub async fn change_exam_status(
    service: &ExamService,
    exam_id: i64,
    next: ExamStatus,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(change_status(service, exam_id, next, request).await)
}

async fn change_status(
    service: &ExamService,
    exam_id: i64,
    next: ExamStatus,
    request: &HttpRequest,
) -> Reply {
    let principal = current_principal(request)?;
    let storage = service.get_storage(request)?;
    let exam = load_exam(&storage, exam_id).await?;
    principal
        .authorize(Resource::Exam, Action::Write, exam.scope())
        .or_forbidden()?;

    if !exam.status.can_transition_to(next) {
        return Err(conflict(
            ErrorCode::ExamTransitionInvalid,
            format!("Cannot change exam from {} to {}", exam.status, next),
        ));
    }

    // 空试卷不能发布
    if next == ExamStatus::Published {
        let questions = storage
            .list_exam_questions(exam_id)
            .await
            .or_storage_failure("Failed to load exam questions")?;
        if questions.is_empty() {
            return Err(bad_request(
                ErrorCode::ExamInvalid,
                "An exam needs at least one question before it can be published",
            ));
        }
    }

    // 读取后状态可能已被其他请求修改
    let exam = storage
        .set_exam_status(exam_id, exam.status, next)
        .await
        .or_storage_failure("Exam status update failed")?
        .ok_or_else(|| {
            conflict(
                ErrorCode::ExamTransitionInvalid,
                "Exam status was changed by another request, reload and retry",
            )
        })?;

    record_audit(
        &storage,
        request,
        &principal,
        AuditEvent::updated(Resource::Exam, exam.id)
            .in_scope(exam.scope())
            .summary(format!("exam status set to {next}")),
    )
    .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(exam, "Exam status updated successfully")))
}

#[cfg(test)]
mod tests {
    use crate::models::ErrorCode;
    use crate::models::exams::entities::ExamStatus;
    use crate::models::questions::entities::{Answer, Difficulty, QuestionType};
    use crate::models::questions::requests::NewQuestion;
    use crate::services::testing::*;
    use crate::services::{ExamService, QuestionService};
    use actix_web::http::StatusCode;

    fn true_false(tenant_id: i64) -> NewQuestion {
        NewQuestion {
            tenant_id,
            campus_id: None,
            subject: "Science".to_string(),
            question_type: QuestionType::TrueFalse,
            body: "Water boils at 100 C at sea level.".to_string(),
            options: Vec::new(),
            answer: Answer::Boolean(true),
            marks: 2,
            difficulty: Difficulty::Easy,
            created_by: None,
        }
    }

    #[actix_web::test]
    async fn test_publish_requires_a_live_question() {
        let storage = memory_storage().await;
        let school = seed_school(&storage, "oak", None).await;
        let exams = ExamService::with_storage(storage.clone());
        let questions = QuestionService::with_storage(storage.clone());
        let request = request_as(&school.admin);
        let exam = seed_exam(&storage, &school).await;

        let response = exams.publish_exam(exam.id, &request).await.unwrap();
        assert_eq!(
            status_and_code(response).await,
            (StatusCode::BAD_REQUEST, code(ErrorCode::ExamInvalid))
        );

        // 唯一的题目被删除后，试卷重新变为空卷
        let dropped = storage.create_question(true_false(school.tenant_id)).await.unwrap();
        storage.add_exam_question(exam.id, dropped.id).await.unwrap();
        let response = questions.delete_question(dropped.id, &request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(storage.list_exam_questions(exam.id).await.unwrap().is_empty());

        let response = exams.publish_exam(exam.id, &request).await.unwrap();
        assert_eq!(
            status_and_code(response).await,
            (StatusCode::BAD_REQUEST, code(ErrorCode::ExamInvalid))
        );

        let kept = storage.create_question(true_false(school.tenant_id)).await.unwrap();
        storage.add_exam_question(exam.id, kept.id).await.unwrap();
        let response = exams.publish_exam(exam.id, &request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let published = storage.get_exam_by_id(exam.id).await.unwrap().unwrap();
        assert_eq!(published.status, ExamStatus::Published);

        let response = exams.publish_exam(exam.id, &request).await.unwrap();
        assert_eq!(
            status_and_code(response).await,
            (StatusCode::CONFLICT, code(ErrorCode::ExamTransitionInvalid))
        );
    }
}
