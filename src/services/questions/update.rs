use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{QuestionService, check_question, ensure_unlocked, load_question};
use crate::models::questions::requests::UpdateQuestionRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{Action, Resource};
use crate::services::common::{
    AuditEvent, OptionExt, PolicyResultExt, Reply, StorageResultExt, current_principal,
    record_audit, respond,
};

pub async fn update_question(
    service: &QuestionService,
    question_id: i64,
    update_data: UpdateQuestionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(update(service, question_id, update_data, request).await)
}

async fn update(
    service: &QuestionService,
    question_id: i64,
    mut update_data: UpdateQuestionRequest,
    request: &HttpRequest,
) -> Reply {
    let principal = current_principal(request)?;
    let storage = service.get_storage(request)?;
    let question = load_question(&storage, question_id).await?;
    principal
        .authorize(Resource::Question, Action::Write, question.scope())
        .or_forbidden()?;
    ensure_unlocked(&storage, question_id).await?;

    update_data.subject = update_data.subject.map(|s| s.trim().to_string());
    update_data.body = update_data.body.map(|s| s.trim().to_string());
    update_data.options = update_data
        .options
        .map(|opts| opts.iter().map(|o| o.trim().to_string()).collect());

    // 与现有内容合并后整体校验，避免只改题型导致答案不匹配
    check_question(
        update_data.subject.as_deref().unwrap_or(&question.subject),
        update_data.body.as_deref().unwrap_or(&question.body),
        update_data.question_type.unwrap_or(question.question_type),
        update_data.options.as_deref().unwrap_or(&question.options),
        update_data.answer.as_ref().unwrap_or(&question.answer),
        update_data.marks.unwrap_or(question.marks),
    )?;

    let question = storage
        .update_question(question_id, update_data)
        .await
        .or_storage_failure("Question update failed")?
        .or_not_found(ErrorCode::QuestionNotFound, "Question not found")?;

    record_audit(
        &storage,
        request,
        &principal,
        AuditEvent::updated(Resource::Question, question.id).in_scope(question.scope()),
    )
    .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        question,
        "Question updated successfully",
    )))
}
