use serde::Deserialize;

use crate::models::common::pagination::deserialize_optional_i64;

/// 更新配置请求
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSettingRequest {
    pub value: String,
}

/// 超级管理员通过 `tenant_id` 指定租户
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsScopeParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub tenant_id: Option<i64>,
}
