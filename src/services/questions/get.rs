use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{QuestionService, load_question};
use crate::models::ApiResponse;
use crate::policy::{Action, Resource};
use crate::services::common::{PolicyResultExt, Reply, current_principal, respond};

pub async fn get_question(
    service: &QuestionService,
    question_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(get(service, question_id, request).await)
}

async fn get(service: &QuestionService, question_id: i64, request: &HttpRequest) -> Reply {
    let principal = current_principal(request)?;
    let storage = service.get_storage(request)?;
    let question = load_question(&storage, question_id).await?;
    principal
        .authorize(Resource::Question, Action::Read, question.scope())
        .or_forbidden()?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        question,
        "Question retrieved successfully",
    )))
}
