use std::sync::Arc;

use crate::models::{
    PaginatedResponse,
    academic_years::{
        entities::AcademicYear,
        requests::{AcademicYearListQuery, NewAcademicYear, UpdateAcademicYearRequest},
    },
    audit::{
        entities::{AuditLog, NewAuditLog},
        requests::AuditLogListQuery,
    },
    campuses::{
        entities::Campus,
        requests::{CampusListQuery, NewCampus, UpdateCampusRequest},
    },
    classes::{
        entities::Class,
        requests::{ClassListQuery, NewClass, UpdateClassRequest},
    },
    enrollments::{
        entities::{Enrollment, EnrollmentStatus},
        requests::{EnrollmentListQuery, NewEnrollment},
    },
    exams::{
        entities::{Exam, ExamQuestionItem, ExamStatus},
        requests::{ExamListQuery, NewExam, UpdateExamRequest},
    },
    questions::{
        entities::Question,
        requests::{NewQuestion, QuestionListQuery, UpdateQuestionRequest},
    },
    sections::{
        entities::Section,
        requests::{NewSection, SectionListQuery, UpdateSectionRequest},
    },
    settings::entities::{SettingValueType, TenantSetting},
    students::{
        entities::Student,
        requests::{NewStudent, StudentImportBatch, StudentListQuery, UpdateStudentRequest},
    },
    tenants::{
        entities::Tenant,
        requests::{NewTenant, TenantListQuery, UpdateTenantRequest},
    },
    users::{
        entities::User,
        requests::{NewUser, UserListQuery, UserUpdate},
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

/// 数据存储接口
///
/// 所有读取都会排除已软删除的记录，删除操作均为软删除。
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 租户管理方法
    async fn create_tenant(&self, tenant: NewTenant) -> Result<Tenant>;
    async fn get_tenant_by_id(&self, id: i64) -> Result<Option<Tenant>>;
    async fn list_tenants_with_pagination(
        &self,
        query: TenantListQuery,
    ) -> Result<PaginatedResponse<Tenant>>;
    async fn update_tenant(&self, id: i64, update: UpdateTenantRequest) -> Result<Option<Tenant>>;
    async fn delete_tenant(&self, id: i64) -> Result<bool>;

    /// 校区管理方法
    async fn create_campus(&self, campus: NewCampus) -> Result<Campus>;
    async fn get_campus_by_id(&self, id: i64) -> Result<Option<Campus>>;
    async fn list_campuses_with_pagination(
        &self,
        query: CampusListQuery,
    ) -> Result<PaginatedResponse<Campus>>;
    async fn update_campus(&self, id: i64, update: UpdateCampusRequest) -> Result<Option<Campus>>;
    async fn delete_campus(&self, id: i64) -> Result<bool>;

    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: NewUser) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(
        &self,
        query: UserListQuery,
    ) -> Result<PaginatedResponse<User>>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UserUpdate) -> Result<Option<User>>;
    // 删除用户（同时停用账号）
    async fn delete_user(&self, id: i64) -> Result<bool>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;

    /// 学年管理方法
    async fn create_academic_year(&self, year: NewAcademicYear) -> Result<AcademicYear>;
    async fn get_academic_year_by_id(&self, id: i64) -> Result<Option<AcademicYear>>;
    async fn list_academic_years_with_pagination(
        &self,
        query: AcademicYearListQuery,
    ) -> Result<PaginatedResponse<AcademicYear>>;
    async fn update_academic_year(
        &self,
        id: i64,
        update: UpdateAcademicYearRequest,
    ) -> Result<Option<AcademicYear>>;
    async fn delete_academic_year(&self, id: i64) -> Result<bool>;
    // 设为当前学年，同一租户的其他学年取消当前标记
    async fn set_current_academic_year(&self, tenant_id: i64, id: i64) -> Result<Option<AcademicYear>>;

    /// 年级管理方法
    async fn create_class(&self, class: NewClass) -> Result<Class>;
    async fn get_class_by_id(&self, id: i64) -> Result<Option<Class>>;
    async fn list_classes_with_pagination(
        &self,
        query: ClassListQuery,
    ) -> Result<PaginatedResponse<Class>>;
    async fn update_class(&self, id: i64, update: UpdateClassRequest) -> Result<Option<Class>>;
    async fn delete_class(&self, id: i64) -> Result<bool>;

    /// 分班管理方法
    async fn create_section(&self, section: NewSection) -> Result<Section>;
    async fn get_section_by_id(&self, id: i64) -> Result<Option<Section>>;
    async fn list_sections_with_pagination(
        &self,
        query: SectionListQuery,
    ) -> Result<PaginatedResponse<Section>>;
    async fn update_section(&self, id: i64, update: UpdateSectionRequest) -> Result<Option<Section>>;
    async fn delete_section(&self, id: i64) -> Result<bool>;
    // 分班在某学年的有效注册人数
    async fn count_active_enrollments(&self, section_id: i64, academic_year_id: i64) -> Result<u64>;

    /// 学生管理方法
    async fn create_student(&self, student: NewStudent) -> Result<Student>;
    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>>;
    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<PaginatedResponse<Student>>;
    async fn update_student(&self, id: i64, update: UpdateStudentRequest) -> Result<Option<Student>>;
    async fn delete_student(&self, id: i64) -> Result<bool>;
    // 租户内已存在的学号
    async fn find_existing_admission_nos(
        &self,
        tenant_id: i64,
        admission_nos: &[String],
    ) -> Result<Vec<String>>;
    // 批量导入：学生与注册在同一事务中写入，任一失败整体回滚
    async fn import_students(&self, batch: StudentImportBatch) -> Result<Vec<Student>>;

    /// 注册管理方法
    async fn create_enrollment(&self, enrollment: NewEnrollment) -> Result<Enrollment>;
    async fn get_enrollment_by_id(&self, id: i64) -> Result<Option<Enrollment>>;
    async fn list_enrollments_with_pagination(
        &self,
        query: EnrollmentListQuery,
    ) -> Result<PaginatedResponse<Enrollment>>;
    async fn update_enrollment_status(
        &self,
        id: i64,
        status: EnrollmentStatus,
    ) -> Result<Option<Enrollment>>;
    async fn delete_enrollment(&self, id: i64) -> Result<bool>;
    async fn has_active_enrollment(&self, student_id: i64, academic_year_id: i64) -> Result<bool>;

    /// 题库管理方法
    async fn create_question(&self, question: NewQuestion) -> Result<Question>;
    async fn get_question_by_id(&self, id: i64) -> Result<Option<Question>>;
    async fn list_questions_with_pagination(
        &self,
        query: QuestionListQuery,
    ) -> Result<PaginatedResponse<Question>>;
    async fn update_question(
        &self,
        id: i64,
        update: UpdateQuestionRequest,
    ) -> Result<Option<Question>>;
    async fn delete_question(&self, id: i64) -> Result<bool>;
    // 题目是否已被已发布（或已归档）的考试使用
    async fn is_question_locked(&self, id: i64) -> Result<bool>;

    /// 考试管理方法
    async fn create_exam(&self, exam: NewExam) -> Result<Exam>;
    async fn get_exam_by_id(&self, id: i64) -> Result<Option<Exam>>;
    async fn list_exams_with_pagination(
        &self,
        query: ExamListQuery,
    ) -> Result<PaginatedResponse<Exam>>;
    async fn update_exam(&self, id: i64, update: UpdateExamRequest) -> Result<Option<Exam>>;
    async fn delete_exam(&self, id: i64) -> Result<bool>;
    /// 比较并切换考试状态，当前状态不是 `from` 时返回 `None`
    async fn set_exam_status(
        &self,
        id: i64,
        from: ExamStatus,
        to: ExamStatus,
    ) -> Result<Option<Exam>>;
    async fn list_exam_questions(&self, exam_id: i64) -> Result<Vec<ExamQuestionItem>>;
    async fn add_exam_question(&self, exam_id: i64, question_id: i64) -> Result<ExamQuestionItem>;
    async fn remove_exam_question(&self, exam_id: i64, question_id: i64) -> Result<bool>;

    /// 租户配置方法
    async fn list_tenant_settings(&self, tenant_id: i64) -> Result<Vec<TenantSetting>>;
    async fn upsert_tenant_setting(
        &self,
        tenant_id: i64,
        key: &str,
        value: &str,
        value_type: SettingValueType,
        updated_by: Option<i64>,
    ) -> Result<TenantSetting>;

    /// 审计日志方法
    async fn create_audit_log(&self, log: NewAuditLog) -> Result<AuditLog>;
    async fn list_audit_logs_with_pagination(
        &self,
        query: AuditLogListQuery,
    ) -> Result<PaginatedResponse<AuditLog>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
