use serde::{Deserialize, Serialize};

use crate::policy::ResourceScope;

/// 年级取值范围（0 表示学前）
pub const GRADE_LEVEL_RANGE: std::ops::RangeInclusive<i32> = 0..=20;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Class {
    // 班级ID
    pub id: i64,
    pub tenant_id: i64,
    pub campus_id: i64,
    // 班级（年级）名称
    pub name: String,
    pub grade_level: i32,
    pub description: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub created_by: Option<i64>,
}

impl Class {
    pub fn scope(&self) -> ResourceScope {
        ResourceScope::campus(self.tenant_id, self.campus_id)
    }
}
