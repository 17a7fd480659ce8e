use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ClassService, load_class};
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{Action, Resource};
use crate::services::common::{
    AuditEvent, PolicyResultExt, Reply, StorageResultExt, current_principal, not_found,
    record_audit, respond,
};

pub async fn delete_class(
    service: &ClassService,
    class_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(delete(service, class_id, request).await)
}

async fn delete(service: &ClassService, class_id: i64, request: &HttpRequest) -> Reply {
    let principal = current_principal(request)?;
    let storage = service.get_storage(request)?;
    let class = load_class(&storage, class_id).await?;
    principal
        .authorize(Resource::Class, Action::Write, class.scope())
        .or_forbidden()?;

    if !storage
        .delete_class(class_id)
        .await
        .or_storage_failure("Class deletion failed")?
    {
        return Err(not_found(ErrorCode::ClassNotFound, "Class not found"));
    }

    record_audit(
        &storage,
        request,
        &principal,
        AuditEvent::deleted(Resource::Class, class_id)
            .in_scope(class.scope())
            .summary(format!("deleted class {}", class.name)),
    )
    .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Class deleted successfully")))
}
