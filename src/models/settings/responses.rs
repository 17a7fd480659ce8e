use serde::Serialize;

use super::entities::SettingView;
use crate::policy::RolePermissions;

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub tenant_id: i64,
    pub settings: Vec<SettingView>,
}

#[derive(Debug, Serialize)]
pub struct RolesResponse {
    pub roles: Vec<RolePermissions>,
}
