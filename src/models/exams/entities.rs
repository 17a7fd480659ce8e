use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::questions::entities::Question;
use crate::policy::ResourceScope;

// 考试状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExamStatus {
    Draft,
    Published,
    Archived,
}

impl ExamStatus {
    /// draft → published → archived，draft 也可以直接归档
    pub fn can_transition_to(&self, next: ExamStatus) -> bool {
        matches!(
            (self, next),
            (ExamStatus::Draft, ExamStatus::Published)
                | (ExamStatus::Draft, ExamStatus::Archived)
                | (ExamStatus::Published, ExamStatus::Archived)
        )
    }

    pub fn is_editable(&self) -> bool {
        *self == ExamStatus::Draft
    }
}

impl std::fmt::Display for ExamStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ExamStatus::Draft => "draft",
            ExamStatus::Published => "published",
            ExamStatus::Archived => "archived",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for ExamStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(ExamStatus::Draft),
            "published" => Ok(ExamStatus::Published),
            "archived" => Ok(ExamStatus::Archived),
            _ => Err(format!("Invalid exam status: {s}")),
        }
    }
}

// 考试
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exam {
    pub id: i64,
    pub tenant_id: i64,
    pub campus_id: i64,
    pub class_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub status: ExamStatus,
    pub duration_minutes: i32,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<i64>,
}

impl Exam {
    pub fn scope(&self) -> ResourceScope {
        ResourceScope::campus(self.tenant_id, self.campus_id)
    }
}

// 试卷中的题目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamQuestionItem {
    pub position: i32,
    pub question: Question,
}

/// 试卷总分
pub fn total_marks(items: &[ExamQuestionItem]) -> i64 {
    items.iter().map(|item| item.question.marks as i64).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_machine() {
        use ExamStatus::*;
        assert!(Draft.can_transition_to(Published));
        assert!(Draft.can_transition_to(Archived));
        assert!(Published.can_transition_to(Archived));
        assert!(!Published.can_transition_to(Draft));
        assert!(!Archived.can_transition_to(Published));
        assert!(!Archived.can_transition_to(Draft));
        assert!(!Draft.can_transition_to(Draft));
    }

    #[test]
    fn test_only_drafts_are_editable() {
        assert!(ExamStatus::Draft.is_editable());
        assert!(!ExamStatus::Published.is_editable());
        assert!(!ExamStatus::Archived.is_editable());
    }
}
