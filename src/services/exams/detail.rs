use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ExamService, load_exam};
use crate::models::ApiResponse;
use crate::models::exams::entities::total_marks;
use crate::models::exams::responses::ExamDetailResponse;
use crate::policy::{Action, Resource};
use crate::services::common::{PolicyResultExt, Reply, StorageResultExt, current_principal, respond};

pub async fn get_exam(
    service: &ExamService,
    exam_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(detail(service, exam_id, request).await)
}

async fn detail(service: &ExamService, exam_id: i64, request: &HttpRequest) -> Reply {
    let principal = current_principal(request)?;
    let storage = service.get_storage(request)?;
    let exam = load_exam(&storage, exam_id).await?;
    principal
        .authorize(Resource::Exam, Action::Read, exam.scope())
        .or_forbidden()?;

    let questions = storage
        .list_exam_questions(exam_id)
        .await
        .or_storage_failure("Failed to load exam questions")?;
    let total_marks = total_marks(&questions);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ExamDetailResponse {
            exam,
            questions,
            total_marks,
        },
        "Exam retrieved successfully",
    )))
}
