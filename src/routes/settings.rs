use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::settings::requests::{SettingsScopeParams, UpdateSettingRequest};
use crate::services::SettingsService;
use crate::utils::SafeSettingKey;

// 懒加载的全局 SettingsService 实例
static SETTINGS_SERVICE: Lazy<SettingsService> = Lazy::new(SettingsService::new_lazy);

pub async fn get_settings(
    req: HttpRequest,
    params: web::Query<SettingsScopeParams>,
) -> ActixResult<HttpResponse> {
    SETTINGS_SERVICE.get_settings(params.into_inner(), &req).await
}

pub async fn update_setting(
    req: HttpRequest,
    key: SafeSettingKey,
    params: web::Query<SettingsScopeParams>,
    body: web::Json<UpdateSettingRequest>,
) -> ActixResult<HttpResponse> {
    SETTINGS_SERVICE
        .update_setting(key.0, params.into_inner(), body.into_inner(), &req)
        .await
}

// 角色权限矩阵
pub async fn list_roles(req: HttpRequest) -> ActixResult<HttpResponse> {
    SETTINGS_SERVICE.list_roles(&req).await
}

// 配置路由
pub fn configure_settings_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/settings")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(get_settings))
            .route("/{key}", web::put().to(update_setting)),
    )
    .service(
        web::scope("/api/v1/roles")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_roles)),
    );
}
