//! 租户配置缓存
//!
//! 缓存的是数据库中已保存的配置行，默认值在读取时合并，
//! 因此修改 `config.toml` 中的默认值无需清除缓存。

use actix_web::{HttpRequest, HttpResponse};
use std::sync::Arc;
use tracing::debug;

use crate::cache::{CacheResult, ObjectCacheExt, settings_key};
use crate::config::AppConfig;
use crate::models::settings::entities::{ResolvedSettings, SettingDefaults, TenantSetting};
use crate::services::common::{StorageResultExt, cache_from_request};
use crate::storage::Storage;

/// 租户未设置时的默认考试时长（分钟）
pub const DEFAULT_EXAM_DURATION_MINUTES: i32 = 60;

pub fn setting_defaults() -> SettingDefaults {
    let config = AppConfig::get();
    SettingDefaults {
        display_name: config.app.system_name.clone(),
        import_max_rows: config.import.default_max_rows,
        exam_default_duration_minutes: DEFAULT_EXAM_DURATION_MINUTES,
    }
}

/// 读取租户已保存的配置，优先使用缓存
pub async fn load_stored_settings(
    storage: &Arc<dyn Storage>,
    request: &HttpRequest,
    tenant_id: i64,
) -> Result<Vec<TenantSetting>, HttpResponse> {
    let cache = cache_from_request(request);
    let key = settings_key(tenant_id);

    if let Some(cache) = &cache
        && let CacheResult::Found(settings) = cache.get_json::<Vec<TenantSetting>>(&key).await
    {
        debug!("Settings cache hit for tenant {}", tenant_id);
        return Ok(settings);
    }

    let settings = storage
        .list_tenant_settings(tenant_id)
        .await
        .or_storage_failure("Failed to load tenant settings")?;

    if let Some(cache) = &cache {
        cache.insert_json(key, &settings, 0).await;
    }
    Ok(settings)
}

pub async fn invalidate_settings(request: &HttpRequest, tenant_id: i64) {
    if let Some(cache) = cache_from_request(request) {
        cache.remove(&settings_key(tenant_id)).await;
    }
}

/// 业务代码使用的租户配置（已合并默认值）
pub async fn load_resolved_settings(
    storage: &Arc<dyn Storage>,
    request: &HttpRequest,
    tenant_id: i64,
) -> Result<ResolvedSettings, HttpResponse> {
    let stored = load_stored_settings(storage, request, tenant_id).await?;
    Ok(ResolvedSettings::resolve(&stored, &setting_defaults()))
}
