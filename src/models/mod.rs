//! 数据模型
//!
//! 业务实体、请求与响应结构，与 `entity` 中的数据库模型分离。

pub mod academic_years;
pub mod audit;
pub mod auth;
pub mod campuses;
pub mod classes;
pub mod common;
pub mod enrollments;
pub mod exams;
pub mod questions;
pub mod sections;
pub mod settings;
pub mod students;
pub mod tenants;
pub mod users;

pub use common::{ApiResponse, PaginatedResponse, PaginationInfo, PaginationQuery};

use serde::{Deserialize, Serialize};

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误 1xxx
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    // 认证 2xxx
    AuthFailed = 2000,
    AccountDisabled = 2001,
    TenantSuspended = 2002,
    PasswordInvalid = 2003,

    // 用户 3xxx
    UserNotFound = 3000,
    UserNameInvalid = 3001,
    UserEmailInvalid = 3002,
    UserPasswordInvalid = 3003,
    UserAlreadyExists = 3004,
    CanNotDeleteCurrentUser = 3005,
    RoleNotAssignable = 3006,

    // 租户与校区 4xxx
    TenantNotFound = 4000,
    TenantCodeInvalid = 4001,
    TenantAlreadyExists = 4002,
    CampusNotFound = 4010,
    CampusAlreadyExists = 4011,

    // 学年、年级与班级 5xxx
    AcademicYearNotFound = 5000,
    AcademicYearInvalid = 5001,
    ClassNotFound = 5010,
    ClassAlreadyExists = 5011,
    SectionNotFound = 5020,
    SectionFull = 5021,
    SectionInvalid = 5022,

    // 学生与注册 6xxx
    StudentNotFound = 6000,
    StudentAlreadyExists = 6001,
    StudentInvalid = 6002,
    EnrollmentNotFound = 6010,
    EnrollmentConflict = 6011,
    EnrollmentTransitionInvalid = 6012,
    EnrollmentScopeMismatch = 6013,

    // 导入 61xx
    ImportFileParseFailed = 6100,
    ImportFileMissingColumn = 6101,
    ImportFileDataInvalid = 6102,
    ImportFailed = 6103,
    FileUploadFailed = 6104,

    // 题库与考试 7xxx
    QuestionNotFound = 7000,
    QuestionInvalid = 7001,
    QuestionLocked = 7002,
    ExamNotFound = 7010,
    ExamNotEditable = 7011,
    ExamTransitionInvalid = 7012,
    ExamQuestionDuplicate = 7013,
    ExamInvalid = 7014,

    // 设置 8xxx
    SettingKeyInvalid = 8000,
    SettingValueInvalid = 8001,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success as i32, 0);
        assert_eq!(ErrorCode::Forbidden as i32, 1003);
        assert_eq!(ErrorCode::SectionFull as i32, 5021);
        assert_eq!(ErrorCode::SettingValueInvalid as i32, 8001);
    }
}
