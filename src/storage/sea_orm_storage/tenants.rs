//! 租户存储操作

use super::{SeaOrmStorage, db_err};
use crate::entity::tenants::{ActiveModel, Column, Entity as Tenants};
use crate::errors::Result;
use crate::models::{
    PaginatedResponse,
    tenants::{
        entities::{Tenant, TenantStatus},
        requests::{NewTenant, TenantListQuery, UpdateTenantRequest},
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};

impl SeaOrmStorage {
    /// 创建租户
    pub async fn create_tenant_impl(&self, req: NewTenant) -> Result<Tenant> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name),
            code: Set(req.code),
            status: Set(TenantStatus::Active.to_string()),
            contact_email: Set(req.contact_email),
            created_at: Set(now),
            updated_at: Set(now),
            created_by: Set(req.created_by),
            is_deleted: Set(false),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(db_err("Failed to create tenant"))?;

        Ok(result.into_tenant())
    }

    /// 通过 ID 获取租户
    pub async fn get_tenant_by_id_impl(&self, id: i64) -> Result<Option<Tenant>> {
        let result = Tenants::find_by_id(id)
            .filter(Column::IsDeleted.eq(false))
            .one(&self.db)
            .await
            .map_err(db_err("Failed to query tenant"))?;

        Ok(result.map(|m| m.into_tenant()))
    }

    /// 分页列出租户
    pub async fn list_tenants_with_pagination_impl(
        &self,
        query: TenantListQuery,
    ) -> Result<PaginatedResponse<Tenant>> {
        let mut select = Tenants::find().filter(Column::IsDeleted.eq(false));

        if let Some(id) = query.only_id {
            select = select.filter(Column::Id.eq(id));
        }

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Name.contains(&escaped))
                    .add(Column::Code.contains(&escaped)),
            );
        }

        select = select.order_by_asc(Column::Name);

        let (items, pagination) = self
            .fetch_page(select, query.page, query.size, "Failed to list tenants")
            .await?;

        Ok(PaginatedResponse {
            items: items.into_iter().map(|m| m.into_tenant()).collect(),
            pagination,
        })
    }

    /// 更新租户
    pub async fn update_tenant_impl(
        &self,
        id: i64,
        update: UpdateTenantRequest,
    ) -> Result<Option<Tenant>> {
        if self.get_tenant_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }
        if let Some(contact_email) = update.contact_email {
            model.contact_email = Set(Some(contact_email));
        }

        model
            .update(&self.db)
            .await
            .map_err(db_err("Failed to update tenant"))?;

        self.get_tenant_by_id_impl(id).await
    }

    /// 软删除租户
    pub async fn delete_tenant_impl(&self, id: i64) -> Result<bool> {
        let result = Tenants::update_many()
            .col_expr(Column::IsDeleted, Expr::value(true))
            .col_expr(Column::UpdatedAt, Expr::value(chrono::Utc::now().timestamp()))
            .filter(Column::Id.eq(id))
            .filter(Column::IsDeleted.eq(false))
            .exec(&self.db)
            .await
            .map_err(db_err("Failed to delete tenant"))?;

        Ok(result.rows_affected > 0)
    }
}
