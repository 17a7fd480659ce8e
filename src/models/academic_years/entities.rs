use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::policy::ResourceScope;

// 学年（租户级）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcademicYear {
    pub id: i64,
    pub tenant_id: i64,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_current: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<i64>,
}

impl AcademicYear {
    pub fn scope(&self) -> ResourceScope {
        ResourceScope::tenant(self.tenant_id)
    }
}

/// 校验学年起止日期
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), &'static str> {
    if start >= end {
        return Err("start_date must be before end_date");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_range() {
        let d = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        assert!(validate_date_range(d("2025-09-01"), d("2026-06-30")).is_ok());
        assert!(validate_date_range(d("2025-09-01"), d("2025-09-01")).is_err());
        assert!(validate_date_range(d("2026-06-30"), d("2025-09-01")).is_err());
    }
}
