use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AcademicYearService;
use crate::models::ApiResponse;
use crate::models::academic_years::requests::{AcademicYearListParams, AcademicYearListQuery};
use crate::policy::{Action, Resource};
use crate::services::common::{PolicyResultExt, Reply, StorageResultExt, current_principal, respond};

pub async fn list_academic_years(
    service: &AcademicYearService,
    query: AcademicYearListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(list(service, query, request).await)
}

async fn list(
    service: &AcademicYearService,
    query: AcademicYearListParams,
    request: &HttpRequest,
) -> Reply {
    let principal = current_principal(request)?;
    principal.require(Resource::AcademicYear, Action::Read).or_forbidden()?;

    // 超级管理员可按租户筛选，其他角色固定为本租户
    let tenant_id = if principal.is_super_admin() {
        query.tenant_id
    } else {
        Some(principal.resolve_tenant(query.tenant_id).or_forbidden()?)
    };

    let (page, size) = query.pagination.normalized();
    let storage = service.get_storage(request)?;
    let years = storage
        .list_academic_years_with_pagination(AcademicYearListQuery {
            page,
            size,
            tenant_id,
        })
        .await
        .or_storage_failure("Failed to list academic years")?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        years,
        "Academic year list retrieved successfully",
    )))
}
