//! 考试实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "exams")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub tenant_id: i64,
    pub campus_id: i64,
    pub class_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub duration_minutes: i32,
    pub scheduled_at: Option<i64>,
    pub published_at: Option<i64>,
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
    pub fn into_exam(self) -> crate::models::exams::entities::Exam {
        use crate::models::exams::entities::{Exam, ExamStatus};

        Exam {
            id: self.id,
            tenant_id: self.tenant_id,
            campus_id: self.campus_id,
            class_id: self.class_id,
            title: self.title,
            description: self.description,
            status: self.status.parse::<ExamStatus>().unwrap_or(ExamStatus::Draft),
            duration_minutes: self.duration_minutes,
            scheduled_at: self.scheduled_at.map(super::to_datetime),
            published_at: self.published_at.map(super::to_datetime),
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
            created_by: self.created_by,
        }
    }
}
