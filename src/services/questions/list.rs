use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::QuestionService;
use crate::models::ApiResponse;
use crate::models::questions::requests::{QuestionListParams, QuestionListQuery};
use crate::policy::{Action, Resource};
use crate::services::common::{PolicyResultExt, Reply, StorageResultExt, current_principal, respond};

pub async fn list_questions(
    service: &QuestionService,
    query: QuestionListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(list(service, query, request).await)
}

async fn list(service: &QuestionService, query: QuestionListParams, request: &HttpRequest) -> Reply {
    let principal = current_principal(request)?;
    principal.require(Resource::Question, Action::Read).or_forbidden()?;
    let scope = principal.scope_filter().or_forbidden()?;

    let (page, size) = query.pagination.normalized();
    let storage = service.get_storage(request)?;
    let questions = storage
        .list_questions_with_pagination(QuestionListQuery {
            page,
            size,
            scope,
            campus_id: query.campus_id,
            subject: query.subject,
            question_type: query.question_type,
            difficulty: query.difficulty,
            search: query.search,
        })
        .await
        .or_storage_failure("Failed to retrieve question list")?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        questions,
        "Question list retrieved successfully",
    )))
}
