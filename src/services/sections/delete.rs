use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SectionService, load_section};
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{Action, Resource};
use crate::services::common::{
    AuditEvent, PolicyResultExt, Reply, StorageResultExt, current_principal, not_found,
    record_audit, respond,
};

pub async fn delete_section(
    service: &SectionService,
    section_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(delete(service, section_id, request).await)
}

async fn delete(service: &SectionService, section_id: i64, request: &HttpRequest) -> Reply {
    let principal = current_principal(request)?;
    let storage = service.get_storage(request)?;
    let section = load_section(&storage, section_id).await?;
    principal
        .authorize(Resource::Section, Action::Write, section.scope())
        .or_forbidden()?;

    if !storage
        .delete_section(section_id)
        .await
        .or_storage_failure("Section deletion failed")?
    {
        return Err(not_found(ErrorCode::SectionNotFound, "Section not found"));
    }

    record_audit(
        &storage,
        request,
        &principal,
        AuditEvent::deleted(Resource::Section, section_id)
            .in_scope(section.scope())
            .summary(format!("deleted section {}", section.name)),
    )
    .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Section deleted successfully")))
}
