//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod academic_years;
pub mod audit_logs;
pub mod campuses;
pub mod classes;
pub mod enrollments;
pub mod exam_questions;
pub mod exams;
pub mod questions;
pub mod sections;
pub mod students;
pub mod tenant_settings;
pub mod tenants;
pub mod users;

use chrono::{DateTime, NaiveDate, Utc};

// 时间戳（秒）转换为 UTC 时间
pub(crate) fn to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}

// 日期以 YYYY-MM-DD 文本保存
pub(crate) fn to_date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap_or_default()
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
