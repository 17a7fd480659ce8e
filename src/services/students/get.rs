use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{StudentService, load_student};
use crate::models::ApiResponse;
use crate::policy::{Action, Resource};
use crate::services::common::{PolicyResultExt, Reply, current_principal, respond};

pub async fn get_student(
    service: &StudentService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(get(service, student_id, request).await)
}

async fn get(service: &StudentService, student_id: i64, request: &HttpRequest) -> Reply {
    let principal = current_principal(request)?;
    let storage = service.get_storage(request)?;
    let student = load_student(&storage, student_id).await?;
    principal
        .authorize(Resource::Student, Action::Read, student.scope())
        .or_forbidden()?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(student, "Student retrieved successfully")))
}
