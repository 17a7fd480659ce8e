use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::policy::ResourceScope;

// 注册状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    Active,
    Withdrawn,
    Completed,
}

impl EnrollmentStatus {
    /// 只允许 active → withdrawn | completed
    pub fn can_transition_to(&self, next: EnrollmentStatus) -> bool {
        matches!(
            (self, next),
            (
                EnrollmentStatus::Active,
                EnrollmentStatus::Withdrawn | EnrollmentStatus::Completed
            )
        )
    }
}

impl std::fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EnrollmentStatus::Active => "active",
            EnrollmentStatus::Withdrawn => "withdrawn",
            EnrollmentStatus::Completed => "completed",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for EnrollmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(EnrollmentStatus::Active),
            "withdrawn" => Ok(EnrollmentStatus::Withdrawn),
            "completed" => Ok(EnrollmentStatus::Completed),
            _ => Err(format!("Invalid enrollment status: {s}")),
        }
    }
}

// 学生在某学年某分班的注册记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: i64,
    pub tenant_id: i64,
    pub campus_id: i64,
    pub student_id: i64,
    pub section_id: i64,
    pub academic_year_id: i64,
    pub status: EnrollmentStatus,
    pub enrolled_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<i64>,
}

impl Enrollment {
    pub fn scope(&self) -> ResourceScope {
        ResourceScope::campus(self.tenant_id, self.campus_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions() {
        use EnrollmentStatus::*;
        assert!(Active.can_transition_to(Withdrawn));
        assert!(Active.can_transition_to(Completed));
        assert!(!Active.can_transition_to(Active));
        assert!(!Withdrawn.can_transition_to(Active));
        assert!(!Completed.can_transition_to(Withdrawn));
    }
}
