//! 考试存储操作

use super::{SeaOrmStorage, db_err};
use crate::entity::exam_questions::{
    ActiveModel as ExamQuestionActiveModel, Column as ExamQuestionColumn, Entity as ExamQuestions,
};
use crate::entity::exams::{ActiveModel, Column, Entity as Exams};
use crate::entity::questions::{Column as QuestionColumn, Entity as Questions};
use crate::errors::{Result, ScholarPrepError};
use crate::models::{
    PaginatedResponse,
    exams::{
        entities::{Exam, ExamQuestionItem, ExamStatus},
        requests::{ExamListQuery, NewExam, UpdateExamRequest},
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    sea_query::Expr,
};
use std::collections::HashMap;

impl SeaOrmStorage {
    pub async fn create_exam_impl(&self, req: NewExam) -> Result<Exam> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            tenant_id: Set(req.tenant_id),
            campus_id: Set(req.campus_id),
            class_id: Set(req.class_id),
            title: Set(req.title),
            description: Set(req.description),
            status: Set(ExamStatus::Draft.to_string()),
            duration_minutes: Set(req.duration_minutes),
            scheduled_at: Set(req.scheduled_at.map(|t| t.timestamp())),
            published_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            created_by: Set(req.created_by),
            is_deleted: Set(false),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(db_err("Failed to create exam"))?;

        Ok(result.into_exam())
    }

    pub async fn get_exam_by_id_impl(&self, id: i64) -> Result<Option<Exam>> {
        let result = Exams::find_by_id(id)
            .filter(Column::IsDeleted.eq(false))
            .one(&self.db)
            .await
            .map_err(db_err("Failed to query exam"))?;

        Ok(result.map(|m| m.into_exam()))
    }

    pub async fn list_exams_with_pagination_impl(
        &self,
        query: ExamListQuery,
    ) -> Result<PaginatedResponse<Exam>> {
        let mut select = Exams::find().filter(Column::IsDeleted.eq(false));

        if let Some(tenant_id) = query.scope.tenant_id {
            select = select.filter(Column::TenantId.eq(tenant_id));
        }
        if let Some(campus_id) = query.scope.campus_id {
            select = select.filter(Column::CampusId.eq(campus_id));
        }
        if let Some(campus_id) = query.campus_id {
            select = select.filter(Column::CampusId.eq(campus_id));
        }
        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(Column::Title.contains(&escaped));
        }

        select = select.order_by_desc(Column::CreatedAt);

        let (items, pagination) = self
            .fetch_page(select, query.page, query.size, "Failed to list exams")
            .await?;

        Ok(PaginatedResponse {
            items: items.into_iter().map(|m| m.into_exam()).collect(),
            pagination,
        })
    }

    pub async fn update_exam_impl(&self, id: i64, update: UpdateExamRequest) -> Result<Option<Exam>> {
        if self.get_exam_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(class_id) = update.class_id {
            model.class_id = Set(Some(class_id));
        }
        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(duration_minutes) = update.duration_minutes {
            model.duration_minutes = Set(duration_minutes);
        }
        if let Some(scheduled_at) = update.scheduled_at {
            model.scheduled_at = Set(Some(scheduled_at.timestamp()));
        }

        model
            .update(&self.db)
            .await
            .map_err(db_err("Failed to update exam"))?;

        self.get_exam_by_id_impl(id).await
    }

    pub async fn delete_exam_impl(&self, id: i64) -> Result<bool> {
        let result = Exams::update_many()
            .col_expr(Column::IsDeleted, Expr::value(true))
            .col_expr(Column::UpdatedAt, Expr::value(chrono::Utc::now().timestamp()))
            .filter(Column::Id.eq(id))
            .filter(Column::IsDeleted.eq(false))
            .exec(&self.db)
            .await
            .map_err(db_err("Failed to delete exam"))?;

        Ok(result.rows_affected > 0)
    }

    /// 仅当考试仍处于 `from` 状态时切换到 `to`，发布时记录发布时间
    ///
    /// 考试不存在、已删除或状态已被并发修改时返回 `None`。
    pub async fn set_exam_status_impl(
        &self,
        id: i64,
        from: ExamStatus,
        to: ExamStatus,
    ) -> Result<Option<Exam>> {
        let now = chrono::Utc::now().timestamp();
        let mut update = Exams::update_many()
            .col_expr(Column::Status, Expr::value(to.to_string()))
            .col_expr(Column::UpdatedAt, Expr::value(now));
        if to == ExamStatus::Published {
            update = update.col_expr(Column::PublishedAt, Expr::value(now));
        }

        let result = update
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(from.to_string()))
            .filter(Column::IsDeleted.eq(false))
            .exec(&self.db)
            .await
            .map_err(db_err("Failed to update exam status"))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.get_exam_by_id_impl(id).await
    }

    /// 按顺序列出试卷题目
    pub async fn list_exam_questions_impl(&self, exam_id: i64) -> Result<Vec<ExamQuestionItem>> {
        let links = ExamQuestions::find()
            .filter(ExamQuestionColumn::ExamId.eq(exam_id))
            .order_by_asc(ExamQuestionColumn::Position)
            .all(&self.db)
            .await
            .map_err(db_err("Failed to query exam questions"))?;

        if links.is_empty() {
            return Ok(Vec::new());
        }

        let question_ids: Vec<i64> = links.iter().map(|l| l.question_id).collect();
        let mut questions: HashMap<i64, _> = Questions::find()
            .filter(QuestionColumn::Id.is_in(question_ids))
            .filter(QuestionColumn::IsDeleted.eq(false))
            .all(&self.db)
            .await
            .map_err(db_err("Failed to query questions"))?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();

        Ok(links
            .into_iter()
            .filter_map(|link| {
                questions
                    .remove(&link.question_id)
                    .map(|q| ExamQuestionItem {
                        position: link.position,
                        question: q.into_question(),
                    })
            })
            .collect())
    }

    /// 将题目追加到试卷末尾
    pub async fn add_exam_question_impl(
        &self,
        exam_id: i64,
        question_id: i64,
    ) -> Result<ExamQuestionItem> {
        let question = self
            .get_question_by_id_impl(question_id)
            .await?
            .ok_or_else(|| ScholarPrepError::not_found(format!("Question {question_id} not found")))?;

        let last_position: Option<Option<i32>> = ExamQuestions::find()
            .select_only()
            .column_as(ExamQuestionColumn::Position.max(), "max_position")
            .filter(ExamQuestionColumn::ExamId.eq(exam_id))
            .into_tuple()
            .one(&self.db)
            .await
            .map_err(db_err("Failed to query exam questions"))?;
        let position = last_position.flatten().unwrap_or(0) + 1;

        ExamQuestionActiveModel {
            exam_id: Set(exam_id),
            question_id: Set(question_id),
            position: Set(position),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_err("Failed to add exam question"))?;

        Ok(ExamQuestionItem { position, question })
    }

    pub async fn remove_exam_question_impl(&self, exam_id: i64, question_id: i64) -> Result<bool> {
        let result = ExamQuestions::delete_many()
            .filter(ExamQuestionColumn::ExamId.eq(exam_id))
            .filter(ExamQuestionColumn::QuestionId.eq(question_id))
            .exec(&self.db)
            .await
            .map_err(db_err("Failed to remove exam question"))?;

        Ok(result.rows_affected > 0)
    }
}
