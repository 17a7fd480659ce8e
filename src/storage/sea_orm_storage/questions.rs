//! 题库存储操作

use super::{SeaOrmStorage, db_err};
use crate::entity::exam_questions::{Column as ExamQuestionColumn, Entity as ExamQuestions};
use crate::entity::exams::{Column as ExamColumn, Entity as Exams};
use crate::entity::questions::{ActiveModel, Column, Entity as Questions};
use crate::errors::Result;
use crate::models::{
    PaginatedResponse,
    exams::entities::ExamStatus,
    questions::{
        entities::Question,
        requests::{NewQuestion, QuestionListQuery, UpdateQuestionRequest},
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait, sea_query::Expr,
};

// 校区可见的题目：本校区题目与全租户共享题目
fn visible_from_campus(campus_id: i64) -> Condition {
    Condition::any()
        .add(Column::CampusId.eq(campus_id))
        .add(Column::CampusId.is_null())
}

impl SeaOrmStorage {
    pub async fn create_question_impl(&self, req: NewQuestion) -> Result<Question> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            tenant_id: Set(req.tenant_id),
            campus_id: Set(req.campus_id),
            subject: Set(req.subject),
            question_type: Set(req.question_type.to_string()),
            body: Set(req.body),
            options: Set(serde_json::to_string(&req.options)?),
            answer: Set(serde_json::to_string(&req.answer)?),
            marks: Set(req.marks),
            difficulty: Set(req.difficulty.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            created_by: Set(req.created_by),
            is_deleted: Set(false),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(db_err("Failed to create question"))?;

        Ok(result.into_question())
    }

    pub async fn get_question_by_id_impl(&self, id: i64) -> Result<Option<Question>> {
        let result = Questions::find_by_id(id)
            .filter(Column::IsDeleted.eq(false))
            .one(&self.db)
            .await
            .map_err(db_err("Failed to query question"))?;

        Ok(result.map(|m| m.into_question()))
    }

    pub async fn list_questions_with_pagination_impl(
        &self,
        query: QuestionListQuery,
    ) -> Result<PaginatedResponse<Question>> {
        let mut select = Questions::find().filter(Column::IsDeleted.eq(false));

        if let Some(tenant_id) = query.scope.tenant_id {
            select = select.filter(Column::TenantId.eq(tenant_id));
        }
        if let Some(campus_id) = query.scope.campus_id {
            select = select.filter(visible_from_campus(campus_id));
        }
        if let Some(campus_id) = query.campus_id {
            select = select.filter(visible_from_campus(campus_id));
        }
        if let Some(ref subject) = query.subject
            && !subject.trim().is_empty()
        {
            select = select.filter(Column::Subject.eq(subject.trim()));
        }
        if let Some(question_type) = query.question_type {
            select = select.filter(Column::QuestionType.eq(question_type.to_string()));
        }
        if let Some(difficulty) = query.difficulty {
            select = select.filter(Column::Difficulty.eq(difficulty.to_string()));
        }
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(Column::Body.contains(&escaped));
        }

        select = select.order_by_desc(Column::CreatedAt);

        let (items, pagination) = self
            .fetch_page(select, query.page, query.size, "Failed to list questions")
            .await?;

        Ok(PaginatedResponse {
            items: items.into_iter().map(|m| m.into_question()).collect(),
            pagination,
        })
    }

    pub async fn update_question_impl(
        &self,
        id: i64,
        update: UpdateQuestionRequest,
    ) -> Result<Option<Question>> {
        if self.get_question_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(subject) = update.subject {
            model.subject = Set(subject);
        }
        if let Some(question_type) = update.question_type {
            model.question_type = Set(question_type.to_string());
        }
        if let Some(body) = update.body {
            model.body = Set(body);
        }
        if let Some(options) = update.options {
            model.options = Set(serde_json::to_string(&options)?);
        }
        if let Some(answer) = update.answer {
            model.answer = Set(serde_json::to_string(&answer)?);
        }
        if let Some(marks) = update.marks {
            model.marks = Set(marks);
        }
        if let Some(difficulty) = update.difficulty {
            model.difficulty = Set(difficulty.to_string());
        }

        model
            .update(&self.db)
            .await
            .map_err(db_err("Failed to update question"))?;

        self.get_question_by_id_impl(id).await
    }

    /// 软删除题目，并在同一事务中把它从草稿试卷中移除
    pub async fn delete_question_impl(&self, id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(db_err("Failed to begin transaction"))?;

        let result = Questions::update_many()
            .col_expr(Column::IsDeleted, Expr::value(true))
            .col_expr(Column::UpdatedAt, Expr::value(chrono::Utc::now().timestamp()))
            .filter(Column::Id.eq(id))
            .filter(Column::IsDeleted.eq(false))
            .exec(&txn)
            .await
            .map_err(db_err("Failed to delete question"))?;

        if result.rows_affected == 0 {
            return Ok(false);
        }

        let linked_exam_ids: Vec<i64> = ExamQuestions::find()
            .select_only()
            .column(ExamQuestionColumn::ExamId)
            .filter(ExamQuestionColumn::QuestionId.eq(id))
            .into_tuple()
            .all(&txn)
            .await
            .map_err(db_err("Failed to query exam questions"))?;

        let draft_exam_ids: Vec<i64> = if linked_exam_ids.is_empty() {
            Vec::new()
        } else {
            Exams::find()
                .select_only()
                .column(ExamColumn::Id)
                .filter(ExamColumn::Id.is_in(linked_exam_ids))
                .filter(ExamColumn::Status.eq(ExamStatus::Draft.to_string()))
                .into_tuple()
                .all(&txn)
                .await
                .map_err(db_err("Failed to query draft exams"))?
        };

        if !draft_exam_ids.is_empty() {
            ExamQuestions::delete_many()
                .filter(ExamQuestionColumn::QuestionId.eq(id))
                .filter(ExamQuestionColumn::ExamId.is_in(draft_exam_ids))
                .exec(&txn)
                .await
                .map_err(db_err("Failed to detach question from draft exams"))?;
        }

        txn.commit()
            .await
            .map_err(db_err("Failed to commit question deletion"))?;

        Ok(true)
    }

    /// 题目是否出现在非草稿状态的考试中
    pub async fn is_question_locked_impl(&self, id: i64) -> Result<bool> {
        let exam_ids: Vec<i64> = ExamQuestions::find()
            .select_only()
            .column(ExamQuestionColumn::ExamId)
            .filter(ExamQuestionColumn::QuestionId.eq(id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err("Failed to query exam questions"))?;

        if exam_ids.is_empty() {
            return Ok(false);
        }

        let locked = Exams::find()
            .filter(ExamColumn::Id.is_in(exam_ids))
            .filter(ExamColumn::Status.ne(ExamStatus::Draft.to_string()))
            .filter(ExamColumn::IsDeleted.eq(false))
            .count(&self.db)
            .await
            .map_err(db_err("Failed to query exams"))?;

        Ok(locked > 0)
    }
}
