//! 年级存储操作

use super::{SeaOrmStorage, db_err};
use crate::entity::classes::{ActiveModel, Column, Entity as Classes};
use crate::errors::Result;
use crate::models::{
    PaginatedResponse,
    classes::{
        entities::Class,
        requests::{ClassListQuery, NewClass, UpdateClassRequest},
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, sea_query::Expr,
};

impl SeaOrmStorage {
    /// 创建年级
    pub async fn create_class_impl(&self, req: NewClass) -> Result<Class> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            tenant_id: Set(req.tenant_id),
            campus_id: Set(req.campus_id),
            name: Set(req.name),
            grade_level: Set(req.grade_level),
            description: Set(req.description),
            created_at: Set(now),
            updated_at: Set(now),
            created_by: Set(req.created_by),
            is_deleted: Set(false),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(db_err("Failed to create class"))?;

        Ok(result.into_class())
    }

    /// 通过 ID 获取年级
    pub async fn get_class_by_id_impl(&self, id: i64) -> Result<Option<Class>> {
        let result = Classes::find_by_id(id)
            .filter(Column::IsDeleted.eq(false))
            .one(&self.db)
            .await
            .map_err(db_err("Failed to query class"))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 分页列出年级
    pub async fn list_classes_with_pagination_impl(
        &self,
        query: ClassListQuery,
    ) -> Result<PaginatedResponse<Class>> {
        let mut select = Classes::find().filter(Column::IsDeleted.eq(false));

        if let Some(tenant_id) = query.scope.tenant_id {
            select = select.filter(Column::TenantId.eq(tenant_id));
        }
        if let Some(campus_id) = query.scope.campus_id {
            select = select.filter(Column::CampusId.eq(campus_id));
        }

        // 校区筛选
        if let Some(campus_id) = query.campus_id {
            select = select.filter(Column::CampusId.eq(campus_id));
        }

        // 学段筛选
        if let Some(grade_level) = query.grade_level {
            select = select.filter(Column::GradeLevel.eq(grade_level));
        }

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(Column::Name.contains(&escaped));
        }

        select = select
            .order_by_asc(Column::GradeLevel)
            .order_by_asc(Column::Name);

        let (items, pagination) = self
            .fetch_page(select, query.page, query.size, "Failed to list classes")
            .await?;

        Ok(PaginatedResponse {
            items: items.into_iter().map(|m| m.into_class()).collect(),
            pagination,
        })
    }

    /// 更新年级
    pub async fn update_class_impl(
        &self,
        id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>> {
        if self.get_class_by_id_impl(id).await?.is_none() {
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
        if let Some(grade_level) = update.grade_level {
            model.grade_level = Set(grade_level);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }

        model
            .update(&self.db)
            .await
            .map_err(db_err("Failed to update class"))?;

        self.get_class_by_id_impl(id).await
    }

    /// 软删除年级
    pub async fn delete_class_impl(&self, id: i64) -> Result<bool> {
        let result = Classes::update_many()
            .col_expr(Column::IsDeleted, Expr::value(true))
            .col_expr(Column::UpdatedAt, Expr::value(chrono::Utc::now().timestamp()))
            .filter(Column::Id.eq(id))
            .filter(Column::IsDeleted.eq(false))
            .exec(&self.db)
            .await
            .map_err(db_err("Failed to delete class"))?;

        Ok(result.rows_affected > 0)
    }
}
