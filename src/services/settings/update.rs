use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SettingsService;
use super::cache::invalidate_settings;
use crate::models::settings::entities::KnownSettingKey;
use crate::models::settings::requests::{SettingsScopeParams, UpdateSettingRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{Action, Resource, ResourceScope};
use crate::services::common::{
    AuditEvent, OptionExt, PolicyResultExt, Reply, StorageResultExt, bad_request,
    current_principal, record_audit, respond,
};

pub async fn update_setting(
    service: &SettingsService,
    key: KnownSettingKey,
    params: SettingsScopeParams,
    body: UpdateSettingRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(update(service, key, params, body, request).await)
}

async fn update(
    service: &SettingsService,
    key: KnownSettingKey,
    params: SettingsScopeParams,
    body: UpdateSettingRequest,
    request: &HttpRequest,
) -> Reply {
    let principal = current_principal(request)?;
    let tenant_id = principal.resolve_tenant(params.tenant_id).or_forbidden()?;
    let scope = ResourceScope::tenant(tenant_id);
    principal
        .authorize(Resource::Setting, Action::Write, scope)
        .or_forbidden()?;

    let value = key
        .normalize_value(&body.value)
        .map_err(|msg| bad_request(ErrorCode::SettingValueInvalid, msg))?;

    let storage = service.get_storage(request)?;
    // 超级管理员可指定任意租户 ID，先确认租户存在
    storage
        .get_tenant_by_id(tenant_id)
        .await
        .or_storage_failure("Failed to load tenant")?
        .or_not_found(ErrorCode::TenantNotFound, "Tenant not found")?;

    let setting = storage
        .upsert_tenant_setting(
            tenant_id,
            key.as_str(),
            &value,
            key.value_type(),
            Some(principal.user_id),
        )
        .await
        .or_storage_failure("Failed to update setting")?;

    invalidate_settings(request, tenant_id).await;

    // 配置没有独立 ID，审计记录以租户 ID 作为资源 ID
    record_audit(
        &storage,
        request,
        &principal,
        AuditEvent::updated(Resource::Setting, tenant_id)
            .in_scope(scope)
            .summary(format!("set {} = {}", key.as_str(), value)),
    )
    .await;

    info!(
        "Setting {} of tenant {} updated by user {}",
        key.as_str(),
        tenant_id,
        principal.user_id
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success(setting, "Setting updated successfully")))
}

#[cfg(test)]
mod tests {
    use crate::models::ErrorCode;
    use crate::models::settings::entities::KnownSettingKey;
    use crate::models::settings::requests::{SettingsScopeParams, UpdateSettingRequest};
    use crate::models::users::entities::UserRole;
    use crate::services::SettingsService;
    use crate::services::testing::*;
    use actix_web::http::StatusCode;

    fn max_rows(value: &str) -> UpdateSettingRequest {
        UpdateSettingRequest {
            value: value.to_string(),
        }
    }

    #[actix_web::test]
    async fn test_setting_for_missing_tenant_is_not_found() {
        let storage = memory_storage().await;
        let root = seed_user(&storage, "root", UserRole::SuperAdmin, None, None).await;
        let service = SettingsService::with_storage(storage.clone());
        let request = request_as(&root);

        let response = service
            .update_setting(
                KnownSettingKey::ImportMaxRows,
                SettingsScopeParams {
                    tenant_id: Some(9999),
                },
                max_rows("200"),
                &request,
            )
            .await
            .unwrap();
        assert_eq!(
            status_and_code(response).await,
            (StatusCode::NOT_FOUND, code(ErrorCode::TenantNotFound))
        );

        let school = seed_school(&storage, "pine", None).await;
        let params = SettingsScopeParams {
            tenant_id: Some(school.tenant_id),
        };
        let response = service
            .update_setting(
                KnownSettingKey::ImportMaxRows,
                params.clone(),
                max_rows("200"),
                &request,
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // 已删除的租户同样不可写
        assert!(storage.delete_tenant(school.tenant_id).await.unwrap());
        let response = service
            .update_setting(KnownSettingKey::ImportMaxRows, params, max_rows("300"), &request)
            .await
            .unwrap();
        assert_eq!(
            status_and_code(response).await,
            (StatusCode::NOT_FOUND, code(ErrorCode::TenantNotFound))
        );
    }
}
