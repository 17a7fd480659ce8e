use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{QuestionService, ensure_unlocked, load_question};
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{Action, Resource};
use crate::services::common::{
    AuditEvent, PolicyResultExt, Reply, StorageResultExt, current_principal, not_found,
    record_audit, respond,
};

pub async fn delete_question(
    service: &QuestionService,
    question_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(delete(service, question_id, request).await)
}

async fn delete(service: &QuestionService, question_id: i64, request: &HttpRequest) -> Reply {
    let principal = current_principal(request)?;
    let storage = service.get_storage(request)?;
    let question = load_question(&storage, question_id).await?;
    principal
        .authorize(Resource::Question, Action::Write, question.scope())
        .or_forbidden()?;
    ensure_unlocked(&storage, question_id).await?;

    if !storage
        .delete_question(question_id)
        .await
        .or_storage_failure("Question deletion failed")?
    {
        return Err(not_found(ErrorCode::QuestionNotFound, "Question not found"));
    }

    record_audit(
        &storage,
        request,
        &principal,
        AuditEvent::deleted(Resource::Question, question_id).in_scope(question.scope()),
    )
    .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Question deleted successfully")))
}
