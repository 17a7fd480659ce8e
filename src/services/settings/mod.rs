pub mod cache;
pub mod get;
pub mod roles;
pub mod update;

pub use cache::load_resolved_settings;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::settings::entities::KnownSettingKey;
use crate::models::settings::requests::{SettingsScopeParams, UpdateSettingRequest};
use crate::services::declare_service;

declare_service!(
    /// 租户配置与角色权限面板
    SettingsService
);

impl SettingsService {
    pub async fn get_settings(
        &self,
        params: SettingsScopeParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_settings(self, params, request).await
    }

    pub async fn update_setting(
        &self,
        key: KnownSettingKey,
        params: SettingsScopeParams,
        body: UpdateSettingRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_setting(self, key, params, body, request).await
    }

    pub async fn list_roles(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        roles::list_roles(request).await
    }
}
