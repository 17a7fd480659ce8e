//! 校区存储操作

use super::{SeaOrmStorage, db_err};
use crate::entity::campuses::{ActiveModel, Column, Entity as Campuses};
use crate::errors::Result;
use crate::models::{
    PaginatedResponse,
    campuses::{
        entities::Campus,
        requests::{CampusListQuery, NewCampus, UpdateCampusRequest},
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};

impl SeaOrmStorage {
    pub async fn create_campus_impl(&self, req: NewCampus) -> Result<Campus> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            tenant_id: Set(req.tenant_id),
            name: Set(req.name),
            code: Set(req.code),
            address: Set(req.address),
            created_at: Set(now),
            updated_at: Set(now),
            created_by: Set(req.created_by),
            is_deleted: Set(false),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(db_err("Failed to create campus"))?;

        Ok(result.into_campus())
    }

    pub async fn get_campus_by_id_impl(&self, id: i64) -> Result<Option<Campus>> {
        let result = Campuses::find_by_id(id)
            .filter(Column::IsDeleted.eq(false))
            .one(&self.db)
            .await
            .map_err(db_err("Failed to query campus"))?;

        Ok(result.map(|m| m.into_campus()))
    }

    pub async fn list_campuses_with_pagination_impl(
        &self,
        query: CampusListQuery,
    ) -> Result<PaginatedResponse<Campus>> {
        let mut select = Campuses::find().filter(Column::IsDeleted.eq(false));

        if let Some(tenant_id) = query.scope.tenant_id {
            select = select.filter(Column::TenantId.eq(tenant_id));
        }
        if let Some(campus_id) = query.scope.campus_id {
            select = select.filter(Column::Id.eq(campus_id));
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
            .fetch_page(select, query.page, query.size, "Failed to list campuses")
            .await?;

        Ok(PaginatedResponse {
            items: items.into_iter().map(|m| m.into_campus()).collect(),
            pagination,
        })
    }

    pub async fn update_campus_impl(
        &self,
        id: i64,
        update: UpdateCampusRequest,
    ) -> Result<Option<Campus>> {
        if self.get_campus_by_id_impl(id).await?.is_none() {
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
        if let Some(code) = update.code {
            model.code = Set(code);
        }
        if let Some(address) = update.address {
            model.address = Set(Some(address));
        }

        model
            .update(&self.db)
            .await
            .map_err(db_err("Failed to update campus"))?;

        self.get_campus_by_id_impl(id).await
    }

    pub async fn delete_campus_impl(&self, id: i64) -> Result<bool> {
        let result = Campuses::update_many()
            .col_expr(Column::IsDeleted, Expr::value(true))
            .col_expr(Column::UpdatedAt, Expr::value(chrono::Utc::now().timestamp()))
            .filter(Column::Id.eq(id))
            .filter(Column::IsDeleted.eq(false))
            .exec(&self.db)
            .await
            .map_err(db_err("Failed to delete campus"))?;

        Ok(result.rows_affected > 0)
    }
}
