use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ExamService, ensure_editable, load_exam};
use crate::models::exams::requests::AddExamQuestionRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{Action, Resource};
use crate::services::common::{
    AuditEvent, PolicyResultExt, Reply, StorageResultExt, bad_request, current_principal,
    not_found, record_audit, respond,
};
use crate::services::questions::load_question;

pub async fn add_exam_question(
    service: &ExamService,
    exam_id: i64,
    question_data: AddExamQuestionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(add(service, exam_id, question_data, request).await)
}

pub async fn remove_exam_question(
    service: &ExamService,
    exam_id: i64,
    question_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(remove(service, exam_id, question_id, request).await)
}

async fn add(
    service: &ExamService,
    exam_id: i64,
    question_data: AddExamQuestionRequest,
    request: &HttpRequest,
) -> Reply {
    let principal = current_principal(request)?;
    let storage = service.get_storage(request)?;
    let exam = load_exam(&storage, exam_id).await?;
    principal
        .authorize(Resource::Exam, Action::Write, exam.scope())
        .or_forbidden()?;
    ensure_editable(&exam)?;

    let question = load_question(&storage, question_data.question_id).await?;
    if !question.visible_from(exam.tenant_id, exam.campus_id) {
        return Err(bad_request(
            ErrorCode::QuestionNotFound,
            "The question is not available to this exam's campus",
        ));
    }

    // 新题目追加到末尾
    let item = storage
        .add_exam_question(exam_id, question.id)
        .await
        .or_conflict(
            ErrorCode::ExamQuestionDuplicate,
            "The question is already part of this exam",
            "Failed to add exam question",
        )?;

    record_audit(
        &storage,
        request,
        &principal,
        AuditEvent::updated(Resource::Exam, exam.id)
            .in_scope(exam.scope())
            .summary(format!("added question {} at position {}", question.id, item.position)),
    )
    .await;

    Ok(HttpResponse::Created().json(ApiResponse::success(item, "Question added to exam")))
}

async fn remove(
    service: &ExamService,
    exam_id: i64,
    question_id: i64,
    request: &HttpRequest,
) -> Reply {
    let principal = current_principal(request)?;
    let storage = service.get_storage(request)?;
    let exam = load_exam(&storage, exam_id).await?;
    principal
        .authorize(Resource::Exam, Action::Write, exam.scope())
        .or_forbidden()?;
    ensure_editable(&exam)?;

    if !storage
        .remove_exam_question(exam_id, question_id)
        .await
        .or_storage_failure("Failed to remove exam question")?
    {
        return Err(not_found(
            ErrorCode::QuestionNotFound,
            "The question is not part of this exam",
        ));
    }

    record_audit(
        &storage,
        request,
        &principal,
        AuditEvent::updated(Resource::Exam, exam.id)
            .in_scope(exam.scope())
            .summary(format!("removed question {question_id}")),
    )
    .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Question removed from exam")))
}
