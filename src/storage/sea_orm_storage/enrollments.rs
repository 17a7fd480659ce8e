//! 注册存储操作

use super::{SeaOrmStorage, db_err};
use crate::entity::enrollments::{ActiveModel, Column, Entity as Enrollments};
use crate::errors::Result;
use crate::models::{
    PaginatedResponse,
    enrollments::{
        entities::{Enrollment, EnrollmentStatus},
        requests::{EnrollmentListQuery, NewEnrollment},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};

impl SeaOrmStorage {
    pub async fn create_enrollment_impl(&self, req: NewEnrollment) -> Result<Enrollment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            tenant_id: Set(req.tenant_id),
            campus_id: Set(req.campus_id),
            student_id: Set(req.student_id),
            section_id: Set(req.section_id),
            academic_year_id: Set(req.academic_year_id),
            status: Set(EnrollmentStatus::Active.to_string()),
            enrolled_at: Set(now),
            ended_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            created_by: Set(req.created_by),
            is_deleted: Set(false),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(db_err("Failed to create enrollment"))?;

        Ok(result.into_enrollment())
    }

    pub async fn get_enrollment_by_id_impl(&self, id: i64) -> Result<Option<Enrollment>> {
        let result = Enrollments::find_by_id(id)
            .filter(Column::IsDeleted.eq(false))
            .one(&self.db)
            .await
            .map_err(db_err("Failed to query enrollment"))?;

        Ok(result.map(|m| m.into_enrollment()))
    }

    pub async fn list_enrollments_with_pagination_impl(
        &self,
        query: EnrollmentListQuery,
    ) -> Result<PaginatedResponse<Enrollment>> {
        let mut select = Enrollments::find().filter(Column::IsDeleted.eq(false));

        if let Some(tenant_id) = query.scope.tenant_id {
            select = select.filter(Column::TenantId.eq(tenant_id));
        }
        if let Some(campus_id) = query.scope.campus_id {
            select = select.filter(Column::CampusId.eq(campus_id));
        }
        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(section_id) = query.section_id {
            select = select.filter(Column::SectionId.eq(section_id));
        }
        if let Some(academic_year_id) = query.academic_year_id {
            select = select.filter(Column::AcademicYearId.eq(academic_year_id));
        }
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        select = select.order_by_desc(Column::EnrolledAt);

        let (items, pagination) = self
            .fetch_page(select, query.page, query.size, "Failed to list enrollments")
            .await?;

        Ok(PaginatedResponse {
            items: items.into_iter().map(|m| m.into_enrollment()).collect(),
            pagination,
        })
    }

    /// 更新注册状态，结束状态同时记录结束时间
    pub async fn update_enrollment_status_impl(
        &self,
        id: i64,
        status: EnrollmentStatus,
    ) -> Result<Option<Enrollment>> {
        if self.get_enrollment_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();
        let ended_at = (status != EnrollmentStatus::Active).then_some(now);

        ActiveModel {
            id: Set(id),
            status: Set(status.to_string()),
            ended_at: Set(ended_at),
            updated_at: Set(now),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(db_err("Failed to update enrollment"))?;

        self.get_enrollment_by_id_impl(id).await
    }

    pub async fn delete_enrollment_impl(&self, id: i64) -> Result<bool> {
        let result = Enrollments::update_many()
            .col_expr(Column::IsDeleted, Expr::value(true))
            .col_expr(Column::UpdatedAt, Expr::value(chrono::Utc::now().timestamp()))
            .filter(Column::Id.eq(id))
            .filter(Column::IsDeleted.eq(false))
            .exec(&self.db)
            .await
            .map_err(db_err("Failed to delete enrollment"))?;

        Ok(result.rows_affected > 0)
    }

    /// 学生在该学年是否已有有效注册
    pub async fn has_active_enrollment_impl(
        &self,
        student_id: i64,
        academic_year_id: i64,
    ) -> Result<bool> {
        let count = Enrollments::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::AcademicYearId.eq(academic_year_id))
            .filter(Column::Status.eq(EnrollmentStatus::Active.to_string()))
            .filter(Column::IsDeleted.eq(false))
            .count(&self.db)
            .await
            .map_err(db_err("Failed to query enrollments"))?;

        Ok(count > 0)
    }
}
