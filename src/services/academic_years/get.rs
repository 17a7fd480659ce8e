use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AcademicYearService, load_academic_year};
use crate::models::ApiResponse;
use crate::policy::{Action, Resource};
use crate::services::common::{PolicyResultExt, Reply, current_principal, respond};

pub async fn get_academic_year(
    service: &AcademicYearService,
    year_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(get(service, year_id, request).await)
}

async fn get(service: &AcademicYearService, year_id: i64, request: &HttpRequest) -> Reply {
    let principal = current_principal(request)?;
    let storage = service.get_storage(request)?;
    let year = load_academic_year(&storage, year_id).await?;
    principal
        .authorize(Resource::AcademicYear, Action::Read, year.scope())
        .or_forbidden()?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        year,
        "Academic year retrieved successfully",
    )))
}
