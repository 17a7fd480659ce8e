use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{UserService, load_user};
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{PolicyDenial, Resource, ResourceScope};
use crate::services::common::{
    AuditEvent, PolicyResultExt, Reply, StorageResultExt, current_principal, deny, not_found,
    record_audit, respond,
};

pub async fn delete_user(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(delete(service, user_id, request).await)
}

async fn delete(service: &UserService, user_id: i64, request: &HttpRequest) -> Reply {
    let principal = current_principal(request)?;
    if user_id == principal.user_id {
        return Err(deny(PolicyDenial::SelfModification));
    }

    let storage = service.get_storage(request)?;
    let target = load_user(&storage, user_id).await?;
    principal.can_manage_user(&target).or_forbidden()?;

    if !storage
        .delete_user(user_id)
        .await
        .or_storage_failure("User deletion failed")?
    {
        return Err(not_found(ErrorCode::UserNotFound, "User not found"));
    }

    let mut event = AuditEvent::deleted(Resource::User, user_id)
        .summary(format!("deleted account {}", target.username));
    if let Some(tenant_id) = target.tenant_id {
        event = event.in_scope(ResourceScope {
            tenant_id,
            campus_id: target.campus_id,
        });
    }
    record_audit(&storage, request, &principal, event).await;

    info!("User {} deleted by {}", target.username, principal.user_id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("User deleted successfully")))
}
