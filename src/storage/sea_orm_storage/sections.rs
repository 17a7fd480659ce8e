//! 分班存储操作

use super::{SeaOrmStorage, db_err};
use crate::entity::enrollments::{Column as EnrollmentColumn, Entity as Enrollments};
use crate::entity::sections::{ActiveModel, Column, Entity as Sections};
use crate::errors::Result;
use crate::models::{
    PaginatedResponse,
    enrollments::entities::EnrollmentStatus,
    sections::{
        entities::Section,
        requests::{NewSection, SectionListQuery, UpdateSectionRequest},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};

impl SeaOrmStorage {
    pub async fn create_section_impl(&self, req: NewSection) -> Result<Section> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            tenant_id: Set(req.tenant_id),
            campus_id: Set(req.campus_id),
            class_id: Set(req.class_id),
            name: Set(req.name),
            capacity: Set(req.capacity),
            homeroom_teacher_id: Set(req.homeroom_teacher_id),
            created_at: Set(now),
            updated_at: Set(now),
            created_by: Set(req.created_by),
            is_deleted: Set(false),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(db_err("Failed to create section"))?;

        Ok(result.into_section())
    }

    pub async fn get_section_by_id_impl(&self, id: i64) -> Result<Option<Section>> {
        let result = Sections::find_by_id(id)
            .filter(Column::IsDeleted.eq(false))
            .one(&self.db)
            .await
            .map_err(db_err("Failed to query section"))?;

        Ok(result.map(|m| m.into_section()))
    }

    pub async fn list_sections_with_pagination_impl(
        &self,
        query: SectionListQuery,
    ) -> Result<PaginatedResponse<Section>> {
        let mut select = Sections::find().filter(Column::IsDeleted.eq(false));

        if let Some(tenant_id) = query.scope.tenant_id {
            select = select.filter(Column::TenantId.eq(tenant_id));
        }
        if let Some(campus_id) = query.scope.campus_id {
            select = select.filter(Column::CampusId.eq(campus_id));
        }
        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }
        if let Some(campus_id) = query.campus_id {
            select = select.filter(Column::CampusId.eq(campus_id));
        }

        select = select.order_by_asc(Column::ClassId).order_by_asc(Column::Name);

        let (items, pagination) = self
            .fetch_page(select, query.page, query.size, "Failed to list sections")
            .await?;

        Ok(PaginatedResponse {
            items: items.into_iter().map(|m| m.into_section()).collect(),
            pagination,
        })
    }

    pub async fn update_section_impl(
        &self,
        id: i64,
        update: UpdateSectionRequest,
    ) -> Result<Option<Section>> {
        if self.get_section_by_id_impl(id).await?.is_none() {
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
        if let Some(capacity) = update.capacity {
            model.capacity = Set(Some(capacity));
        }
        if let Some(teacher_id) = update.homeroom_teacher_id {
            model.homeroom_teacher_id = Set(Some(teacher_id));
        }

        model
            .update(&self.db)
            .await
            .map_err(db_err("Failed to update section"))?;

        self.get_section_by_id_impl(id).await
    }

    pub async fn delete_section_impl(&self, id: i64) -> Result<bool> {
        let result = Sections::update_many()
            .col_expr(Column::IsDeleted, Expr::value(true))
            .col_expr(Column::UpdatedAt, Expr::value(chrono::Utc::now().timestamp()))
            .filter(Column::Id.eq(id))
            .filter(Column::IsDeleted.eq(false))
            .exec(&self.db)
            .await
            .map_err(db_err("Failed to delete section"))?;

        Ok(result.rows_affected > 0)
    }

    /// 分班在某学年的有效注册人数
    pub async fn count_active_enrollments_impl(
        &self,
        section_id: i64,
        academic_year_id: i64,
    ) -> Result<u64> {
        Enrollments::find()
            .filter(EnrollmentColumn::SectionId.eq(section_id))
            .filter(EnrollmentColumn::AcademicYearId.eq(academic_year_id))
            .filter(EnrollmentColumn::Status.eq(EnrollmentStatus::Active.to_string()))
            .filter(EnrollmentColumn::IsDeleted.eq(false))
            .count(&self.db)
            .await
            .map_err(db_err("Failed to count enrollments"))
    }
}
