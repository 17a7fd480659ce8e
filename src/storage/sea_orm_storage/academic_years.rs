//! 学年存储操作

use super::{SeaOrmStorage, db_err};
use crate::entity::academic_years::{ActiveModel, Column, Entity as AcademicYears};
use crate::entity::format_date;
use crate::errors::Result;
use crate::models::{
    PaginatedResponse,
    academic_years::{
        entities::AcademicYear,
        requests::{AcademicYearListQuery, NewAcademicYear, UpdateAcademicYearRequest},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
    sea_query::Expr,
};

impl SeaOrmStorage {
    pub async fn create_academic_year_impl(&self, req: NewAcademicYear) -> Result<AcademicYear> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            tenant_id: Set(req.tenant_id),
            name: Set(req.name),
            start_date: Set(format_date(req.start_date)),
            end_date: Set(format_date(req.end_date)),
            is_current: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            created_by: Set(req.created_by),
            is_deleted: Set(false),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(db_err("Failed to create academic year"))?;

        Ok(result.into_academic_year())
    }

    pub async fn get_academic_year_by_id_impl(&self, id: i64) -> Result<Option<AcademicYear>> {
        let result = AcademicYears::find_by_id(id)
            .filter(Column::IsDeleted.eq(false))
            .one(&self.db)
            .await
            .map_err(db_err("Failed to query academic year"))?;

        Ok(result.map(|m| m.into_academic_year()))
    }

    pub async fn list_academic_years_with_pagination_impl(
        &self,
        query: AcademicYearListQuery,
    ) -> Result<PaginatedResponse<AcademicYear>> {
        let mut select = AcademicYears::find().filter(Column::IsDeleted.eq(false));

        if let Some(tenant_id) = query.tenant_id {
            select = select.filter(Column::TenantId.eq(tenant_id));
        }

        // YYYY-MM-DD 文本按字典序即按日期排序
        select = select.order_by_desc(Column::StartDate);

        let (items, pagination) = self
            .fetch_page(select, query.page, query.size, "Failed to list academic years")
            .await?;

        Ok(PaginatedResponse {
            items: items.into_iter().map(|m| m.into_academic_year()).collect(),
            pagination,
        })
    }

    pub async fn update_academic_year_impl(
        &self,
        id: i64,
        update: UpdateAcademicYearRequest,
    ) -> Result<Option<AcademicYear>> {
        if self.get_academic_year_by_id_impl(id).await?.is_none() {
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
        if let Some(start_date) = update.start_date {
            model.start_date = Set(format_date(start_date));
        }
        if let Some(end_date) = update.end_date {
            model.end_date = Set(format_date(end_date));
        }

        model
            .update(&self.db)
            .await
            .map_err(db_err("Failed to update academic year"))?;

        self.get_academic_year_by_id_impl(id).await
    }

    pub async fn delete_academic_year_impl(&self, id: i64) -> Result<bool> {
        let result = AcademicYears::update_many()
            .col_expr(Column::IsDeleted, Expr::value(true))
            .col_expr(Column::IsCurrent, Expr::value(false))
            .col_expr(Column::UpdatedAt, Expr::value(chrono::Utc::now().timestamp()))
            .filter(Column::Id.eq(id))
            .filter(Column::IsDeleted.eq(false))
            .exec(&self.db)
            .await
            .map_err(db_err("Failed to delete academic year"))?;

        Ok(result.rows_affected > 0)
    }

    /// 在一个事务中切换当前学年
    pub async fn set_current_academic_year_impl(
        &self,
        tenant_id: i64,
        id: i64,
    ) -> Result<Option<AcademicYear>> {
        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(db_err("Failed to begin transaction"))?;

        AcademicYears::update_many()
            .col_expr(Column::IsCurrent, Expr::value(false))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::TenantId.eq(tenant_id))
            .filter(Column::IsCurrent.eq(true))
            .exec(&txn)
            .await
            .map_err(db_err("Failed to clear current academic year"))?;

        let result = AcademicYears::update_many()
            .col_expr(Column::IsCurrent, Expr::value(true))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::TenantId.eq(tenant_id))
            .filter(Column::IsDeleted.eq(false))
            .exec(&txn)
            .await
            .map_err(db_err("Failed to set current academic year"))?;

        if result.rows_affected == 0 {
            // 目标学年不存在时保持原状
            txn.rollback()
                .await
                .map_err(db_err("Failed to roll back transaction"))?;
            return Ok(None);
        }

        txn.commit()
            .await
            .map_err(db_err("Failed to commit transaction"))?;

        self.get_academic_year_by_id_impl(id).await
    }
}
