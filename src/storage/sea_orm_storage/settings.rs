//! 租户配置存储操作

use super::{SeaOrmStorage, db_err};
use crate::entity::tenant_settings::{ActiveModel, Column, Entity as TenantSettings};
use crate::errors::Result;
use crate::models::settings::entities::{SettingValueType, TenantSetting};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, sea_query::OnConflict};

impl SeaOrmStorage {
    pub async fn list_tenant_settings_impl(&self, tenant_id: i64) -> Result<Vec<TenantSetting>> {
        let rows = TenantSettings::find()
            .filter(Column::TenantId.eq(tenant_id))
            .order_by_asc(Column::Key)
            .all(&self.db)
            .await
            .map_err(db_err("Failed to query tenant settings"))?;

        Ok(rows.into_iter().map(|m| m.into_setting()).collect())
    }

    /// 写入或覆盖一项配置
    pub async fn upsert_tenant_setting_impl(
        &self,
        tenant_id: i64,
        key: &str,
        value: &str,
        value_type: SettingValueType,
        updated_by: Option<i64>,
    ) -> Result<TenantSetting> {
        let model = ActiveModel {
            tenant_id: Set(tenant_id),
            key: Set(key.to_string()),
            value: Set(value.to_string()),
            value_type: Set(value_type.to_string()),
            updated_at: Set(chrono::Utc::now().timestamp()),
            updated_by: Set(updated_by),
            ..Default::default()
        };

        TenantSettings::insert(model)
            .on_conflict(
                OnConflict::columns([Column::TenantId, Column::Key])
                    .update_columns([
                        Column::Value,
                        Column::ValueType,
                        Column::UpdatedAt,
                        Column::UpdatedBy,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(db_err("Failed to save tenant setting"))?;

        let saved = TenantSettings::find()
            .filter(Column::TenantId.eq(tenant_id))
            .filter(Column::Key.eq(key))
            .one(&self.db)
            .await
            .map_err(db_err("Failed to query tenant setting"))?
            .ok_or_else(|| {
                crate::errors::ScholarPrepError::database_operation(format!(
                    "Setting {key} missing after save"
                ))
            })?;

        Ok(saved.into_setting())
    }
}
