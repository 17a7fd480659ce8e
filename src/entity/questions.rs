//! 题目实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "questions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub tenant_id: i64,
    pub campus_id: Option<i64>,
    pub subject: String,
    pub question_type: String,
    pub body: String,
    // JSON 数组
    pub options: String,
    // JSON 值
    pub answer: String,
    pub marks: i32,
    pub difficulty: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub created_by: Option<i64>,
    pub is_deleted: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::exam_questions::Entity")]
    ExamQuestions,
}

impl Related<super::exam_questions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExamQuestions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_question(self) -> crate::models::questions::entities::Question {
        use crate::models::questions::entities::{Answer, Difficulty, Question, QuestionType};

        Question {
            id: self.id,
            tenant_id: self.tenant_id,
            campus_id: self.campus_id,
            subject: self.subject,
            question_type: self
                .question_type
                .parse::<QuestionType>()
                .unwrap_or(QuestionType::ShortAnswer),
            body: self.body,
            options: serde_json::from_str(&self.options).unwrap_or_default(),
            answer: serde_json::from_str(&self.answer).unwrap_or(Answer::Text(self.answer)),
            marks: self.marks,
            difficulty: self
                .difficulty
                .parse::<Difficulty>()
                .unwrap_or(Difficulty::Medium),
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
            created_by: self.created_by,
        }
    }
}
