//! 学生存储操作

use super::{SeaOrmStorage, db_err};
use crate::entity::enrollments::{
    ActiveModel as EnrollmentActiveModel, Column as EnrollmentColumn, Entity as Enrollments,
};
use crate::entity::format_date;
use crate::entity::students::{ActiveModel, Column, Entity as Students};
use crate::errors::Result;
use crate::models::{
    PaginatedResponse,
    enrollments::entities::EnrollmentStatus,
    students::{
        entities::{Student, StudentStatus},
        requests::{NewStudent, StudentImportBatch, StudentListQuery, UpdateStudentRequest},
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set, TransactionTrait, sea_query::Expr,
};

fn new_student_model(req: NewStudent, now: i64) -> ActiveModel {
    ActiveModel {
        tenant_id: Set(req.tenant_id),
        campus_id: Set(req.campus_id),
        admission_no: Set(req.admission_no),
        first_name: Set(req.first_name),
        last_name: Set(req.last_name),
        date_of_birth: Set(req.date_of_birth.map(format_date)),
        gender: Set(req.gender),
        guardian_name: Set(req.guardian_name),
        guardian_phone: Set(req.guardian_phone),
        status: Set(StudentStatus::Active.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        created_by: Set(req.created_by),
        is_deleted: Set(false),
        ..Default::default()
    }
}

impl SeaOrmStorage {
    pub async fn create_student_impl(&self, req: NewStudent) -> Result<Student> {
        let now = chrono::Utc::now().timestamp();

        let result = new_student_model(req, now)
            .insert(&self.db)
            .await
            .map_err(db_err("Failed to create student"))?;

        Ok(result.into_student())
    }

    pub async fn get_student_by_id_impl(&self, id: i64) -> Result<Option<Student>> {
        let result = Students::find_by_id(id)
            .filter(Column::IsDeleted.eq(false))
            .one(&self.db)
            .await
            .map_err(db_err("Failed to query student"))?;

        Ok(result.map(|m| m.into_student()))
    }

    pub async fn list_students_with_pagination_impl(
        &self,
        query: StudentListQuery,
    ) -> Result<PaginatedResponse<Student>> {
        let mut select = Students::find().filter(Column::IsDeleted.eq(false));

        if let Some(tenant_id) = query.scope.tenant_id {
            select = select.filter(Column::TenantId.eq(tenant_id));
        }
        if let Some(campus_id) = query.scope.campus_id {
            select = select.filter(Column::CampusId.eq(campus_id));
        }
        if let Some(campus_id) = query.campus_id {
            select = select.filter(Column::CampusId.eq(campus_id));
        }
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        // 分班筛选：在该分班有有效注册的学生
        if let Some(section_id) = query.section_id {
            let student_ids: Vec<i64> = Enrollments::find()
                .select_only()
                .column(EnrollmentColumn::StudentId)
                .filter(EnrollmentColumn::SectionId.eq(section_id))
                .filter(EnrollmentColumn::Status.eq(EnrollmentStatus::Active.to_string()))
                .filter(EnrollmentColumn::IsDeleted.eq(false))
                .into_tuple()
                .all(&self.db)
                .await
                .map_err(db_err("Failed to query section enrollments"))?;
            select = select.filter(Column::Id.is_in(student_ids));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::AdmissionNo.contains(&escaped))
                    .add(Column::FirstName.contains(&escaped))
                    .add(Column::LastName.contains(&escaped)),
            );
        }

        select = select
            .order_by_asc(Column::LastName)
            .order_by_asc(Column::FirstName);

        let (items, pagination) = self
            .fetch_page(select, query.page, query.size, "Failed to list students")
            .await?;

        Ok(PaginatedResponse {
            items: items.into_iter().map(|m| m.into_student()).collect(),
            pagination,
        })
    }

    pub async fn update_student_impl(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        if self.get_student_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(first_name) = update.first_name {
            model.first_name = Set(first_name);
        }
        if let Some(last_name) = update.last_name {
            model.last_name = Set(last_name);
        }
        if let Some(date_of_birth) = update.date_of_birth {
            model.date_of_birth = Set(Some(format_date(date_of_birth)));
        }
        if let Some(gender) = update.gender {
            model.gender = Set(Some(gender));
        }
        if let Some(guardian_name) = update.guardian_name {
            model.guardian_name = Set(Some(guardian_name));
        }
        if let Some(guardian_phone) = update.guardian_phone {
            model.guardian_phone = Set(Some(guardian_phone));
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        model
            .update(&self.db)
            .await
            .map_err(db_err("Failed to update student"))?;

        self.get_student_by_id_impl(id).await
    }

    /// 软删除学生，并在同一事务中结束其有效注册以释放分班名额
    pub async fn delete_student_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(db_err("Failed to begin transaction"))?;

        let result = Students::update_many()
            .col_expr(Column::IsDeleted, Expr::value(true))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::IsDeleted.eq(false))
            .exec(&txn)
            .await
            .map_err(db_err("Failed to delete student"))?;

        if result.rows_affected == 0 {
            return Ok(false);
        }

        Enrollments::update_many()
            .col_expr(
                EnrollmentColumn::Status,
                Expr::value(EnrollmentStatus::Withdrawn.to_string()),
            )
            .col_expr(EnrollmentColumn::EndedAt, Expr::value(now))
            .col_expr(EnrollmentColumn::UpdatedAt, Expr::value(now))
            .filter(EnrollmentColumn::StudentId.eq(id))
            .filter(EnrollmentColumn::Status.eq(EnrollmentStatus::Active.to_string()))
            .filter(EnrollmentColumn::IsDeleted.eq(false))
            .exec(&txn)
            .await
            .map_err(db_err("Failed to withdraw enrollments of deleted student"))?;

        txn.commit()
            .await
            .map_err(db_err("Failed to commit student deletion"))?;

        Ok(true)
    }

    /// 查找租户内已使用的学号（含已删除学生，唯一索引同样覆盖它们）
    pub async fn find_existing_admission_nos_impl(
        &self,
        tenant_id: i64,
        admission_nos: &[String],
    ) -> Result<Vec<String>> {
        if admission_nos.is_empty() {
            return Ok(Vec::new());
        }

        let mut existing = Vec::new();
        // 分批查询，避免超出数据库参数数量限制
        for chunk in admission_nos.chunks(500) {
            let found: Vec<String> = Students::find()
                .select_only()
                .column(Column::AdmissionNo)
                .filter(Column::TenantId.eq(tenant_id))
                .filter(Column::AdmissionNo.is_in(chunk.iter().cloned()))
                .into_tuple()
                .all(&self.db)
                .await
                .map_err(db_err("Failed to query admission numbers"))?;
            existing.extend(found);
        }

        Ok(existing)
    }

    /// 批量导入学生并注册到指定分班
    ///
    /// 全部写入在一个事务中完成，任一插入失败时事务随 `txn` 释放而回滚。
    pub async fn import_students_impl(&self, batch: StudentImportBatch) -> Result<Vec<Student>> {
        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(db_err("Failed to begin transaction"))?;

        let mut created = Vec::with_capacity(batch.students.len());
        for student in batch.students {
            let created_by = student.created_by;
            let model = new_student_model(student, now)
                .insert(&txn)
                .await
                .map_err(db_err("Failed to import student"))?;

            EnrollmentActiveModel {
                tenant_id: Set(model.tenant_id),
                campus_id: Set(model.campus_id),
                student_id: Set(model.id),
                section_id: Set(batch.section_id),
                academic_year_id: Set(batch.academic_year_id),
                status: Set(EnrollmentStatus::Active.to_string()),
                enrolled_at: Set(now),
                ended_at: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
                created_by: Set(created_by),
                is_deleted: Set(false),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(db_err("Failed to enroll imported student"))?;

            created.push(model.into_student());
        }

        txn.commit()
            .await
            .map_err(db_err("Failed to commit import"))?;

        Ok(created)
    }
}
