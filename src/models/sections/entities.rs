use serde::{Deserialize, Serialize};

use crate::policy::ResourceScope;

// 班级下的分班（教学班）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub id: i64,
    pub tenant_id: i64,
    pub campus_id: i64,
    pub class_id: i64,
    pub name: String,
    pub capacity: Option<i32>,
    pub homeroom_teacher_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub created_by: Option<i64>,
}

impl Section {
    pub fn scope(&self) -> ResourceScope {
        ResourceScope::campus(self.tenant_id, self.campus_id)
    }

    /// 已有 `enrolled` 名学生时还能再加入的人数，`None` 表示不限
    pub fn remaining_seats(&self, enrolled: u64) -> Option<u64> {
        self.capacity
            .map(|cap| (cap.max(0) as u64).saturating_sub(enrolled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(capacity: Option<i32>) -> Section {
        let now = chrono::Utc::now();
        Section {
            id: 1,
            tenant_id: 1,
            campus_id: 1,
            class_id: 1,
            name: "A".to_string(),
            capacity,
            homeroom_teacher_id: None,
            created_at: now,
            updated_at: now,
            created_by: None,
        }
    }

    #[test]
    fn test_remaining_seats() {
        assert_eq!(section(None).remaining_seats(100), None);
        assert_eq!(section(Some(30)).remaining_seats(28), Some(2));
        assert_eq!(section(Some(30)).remaining_seats(31), Some(0));
    }
}
