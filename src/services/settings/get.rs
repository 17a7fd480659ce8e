use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SettingsService;
use super::cache::{load_stored_settings, setting_defaults};
use crate::models::ApiResponse;
use crate::models::settings::entities::merge_with_defaults;
use crate::models::settings::requests::SettingsScopeParams;
use crate::models::settings::responses::SettingsResponse;
use crate::policy::{Action, Resource, ResourceScope};
use crate::services::common::{PolicyResultExt, Reply, current_principal, respond};

pub async fn get_settings(
    service: &SettingsService,
    params: SettingsScopeParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(get(service, params, request).await)
}

async fn get(service: &SettingsService, params: SettingsScopeParams, request: &HttpRequest) -> Reply {
    let principal = current_principal(request)?;
    let tenant_id = principal.resolve_tenant(params.tenant_id).or_forbidden()?;
    principal
        .authorize(Resource::Setting, Action::Read, ResourceScope::tenant(tenant_id))
        .or_forbidden()?;

    let storage = service.get_storage(request)?;
    let stored = load_stored_settings(&storage, request, tenant_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SettingsResponse {
            tenant_id,
            settings: merge_with_defaults(&stored, &setting_defaults()),
        },
        "Settings retrieved successfully",
    )))
}
