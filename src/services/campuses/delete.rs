use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CampusService, load_campus};
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{Action, Resource};
use crate::services::common::{
    AuditEvent, PolicyResultExt, Reply, StorageResultExt, current_principal, not_found,
    record_audit, respond,
};

pub async fn delete_campus(
    service: &CampusService,
    campus_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(delete(service, campus_id, request).await)
}

async fn delete(service: &CampusService, campus_id: i64, request: &HttpRequest) -> Reply {
    let principal = current_principal(request)?;
    let storage = service.get_storage(request)?;
    let campus = load_campus(&storage, campus_id).await?;
    principal
        .authorize(Resource::Campus, Action::Write, campus.scope())
        .or_forbidden()?;

    if !storage
        .delete_campus(campus_id)
        .await
        .or_storage_failure("Failed to delete campus")?
    {
        return Err(not_found(ErrorCode::CampusNotFound, "Campus not found"));
    }

    record_audit(
        &storage,
        request,
        &principal,
        AuditEvent::deleted(Resource::Campus, campus_id)
            .in_scope(campus.scope())
            .summary(format!("deleted campus {}", campus.code)),
    )
    .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Campus deleted successfully")))
}
