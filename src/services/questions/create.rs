use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{QuestionService, check_question, question_campus};
use crate::models::questions::requests::{CreateQuestionRequest, NewQuestion};
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{Action, Resource, ResourceScope};
use crate::services::campuses::load_campus;
use crate::services::common::{
    AuditEvent, PolicyResultExt, Reply, StorageResultExt, bad_request, current_principal,
    record_audit, respond,
};

pub async fn create_question(
    service: &QuestionService,
    question_data: CreateQuestionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(create(service, question_data, request).await)
}

async fn create(
    service: &QuestionService,
    question_data: CreateQuestionRequest,
    request: &HttpRequest,
) -> Reply {
    let principal = current_principal(request)?;
    let tenant_id = principal.resolve_tenant(question_data.tenant_id).or_forbidden()?;

    let subject = question_data.subject.trim().to_string();
    let body = question_data.body.trim().to_string();
    let options: Vec<String> = question_data
        .options
        .iter()
        .map(|o| o.trim().to_string())
        .collect();
    check_question(
        &subject,
        &body,
        question_data.question_type,
        &options,
        &question_data.answer,
        question_data.marks,
    )?;

    let storage = service.get_storage(request)?;
    let scope = match question_campus(&principal, question_data.campus_id) {
        Some(campus_id) => {
            let campus = load_campus(&storage, campus_id).await?;
            if campus.tenant_id != tenant_id {
                return Err(bad_request(
                    ErrorCode::CampusNotFound,
                    "The campus does not belong to this tenant",
                ));
            }
            campus.scope()
        }
        None => ResourceScope::tenant(tenant_id),
    };
    principal
        .authorize(Resource::Question, Action::Write, scope)
        .or_forbidden()?;

    let question = storage
        .create_question(NewQuestion {
            tenant_id,
            campus_id: scope.campus_id,
            subject,
            question_type: question_data.question_type,
            body,
            options,
            answer: question_data.answer,
            marks: question_data.marks,
            difficulty: question_data.difficulty,
            created_by: Some(principal.user_id),
        })
        .await
        .or_storage_failure("Question creation failed")?;

    record_audit(
        &storage,
        request,
        &principal,
        AuditEvent::created(Resource::Question, question.id)
            .in_scope(question.scope())
            .summary(format!("created {} question", question.question_type)),
    )
    .await;

    Ok(HttpResponse::Created().json(ApiResponse::success(
        question,
        "Question created successfully",
    )))
}
