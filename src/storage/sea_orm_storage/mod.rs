//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod academic_years;
mod audit_logs;
mod campuses;
mod classes;
mod enrollments;
mod exams;
mod questions;
mod sections;
mod settings;
mod students;
mod tenants;
mod users;

#[cfg(test)]
mod tests;

use crate::config::AppConfig;
use crate::errors::{Result, ScholarPrepError};
use crate::models::PaginationInfo;
use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ConnectOptions, Database, DatabaseConnection, DbErr, EntityTrait, FromQueryResult,
    PaginatorTrait, Select,
};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        let storage = Self::from_connection(db).await?;
        info!("SeaORM storage initialized, database: {}", db_url);
        Ok(storage)
    }

    /// 使用已有连接构建存储并执行迁移
    pub async fn from_connection(db: DatabaseConnection) -> Result<Self> {
        Migrator::up(&db, None)
            .await
            .map_err(|e| ScholarPrepError::database_operation(format!("Migration failed: {e}")))?;

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| ScholarPrepError::database_config(format!("Invalid SQLite URL: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| {
                ScholarPrepError::database_connection(format!("SQLite connection failed: {e}"))
            })?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(2)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt).await.map_err(|e| {
            ScholarPrepError::database_connection(format!("Cannot connect to database: {e}"))
        })
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(ScholarPrepError::database_config(format!(
                "Cannot infer database type from URL: {url}. Supported: sqlite://, postgres://, mysql://, or a .db/.sqlite path"
            )))
        }
    }

    /// 分页查询
    pub(crate) async fn fetch_page<E>(
        &self,
        select: Select<E>,
        page: u64,
        size: u64,
        context: &'static str,
    ) -> Result<(Vec<E::Model>, PaginationInfo)>
    where
        E: EntityTrait,
        E::Model: FromQueryResult + Sized + Send + Sync,
    {
        let page = page.max(1);
        let size = size.clamp(1, 100);
        let paginator = select.paginate(&self.db, size);
        let total = paginator.num_items().await.map_err(db_err(context))?;
        let pages = paginator.num_pages().await.map_err(db_err(context))?;
        let items = paginator.fetch_page(page - 1).await.map_err(db_err(context))?;

        Ok((items, PaginationInfo::new(page, size, total, pages)))
    }
}

/// 为数据库错误附加上下文；唯一约束冲突保留为 Conflict
pub(crate) fn db_err(context: &'static str) -> impl Fn(DbErr) -> ScholarPrepError {
    move |e| match ScholarPrepError::from(e) {
        ScholarPrepError::DatabaseOperation(msg) => {
            ScholarPrepError::database_operation(format!("{context}: {msg}"))
        }
        other => other,
    }
}

// Storage trait 实现
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
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 租户模块
    async fn create_tenant(&self, tenant: NewTenant) -> Result<Tenant> {
        self.create_tenant_impl(tenant).await
    }

    async fn get_tenant_by_id(&self, id: i64) -> Result<Option<Tenant>> {
        self.get_tenant_by_id_impl(id).await
    }

    async fn list_tenants_with_pagination(
        &self,
        query: TenantListQuery,
    ) -> Result<PaginatedResponse<Tenant>> {
        self.list_tenants_with_pagination_impl(query).await
    }

    async fn update_tenant(&self, id: i64, update: UpdateTenantRequest) -> Result<Option<Tenant>> {
        self.update_tenant_impl(id, update).await
    }

    async fn delete_tenant(&self, id: i64) -> Result<bool> {
        self.delete_tenant_impl(id).await
    }

    // 校区模块
    async fn create_campus(&self, campus: NewCampus) -> Result<Campus> {
        self.create_campus_impl(campus).await
    }

    async fn get_campus_by_id(&self, id: i64) -> Result<Option<Campus>> {
        self.get_campus_by_id_impl(id).await
    }

    async fn list_campuses_with_pagination(
        &self,
        query: CampusListQuery,
    ) -> Result<PaginatedResponse<Campus>> {
        self.list_campuses_with_pagination_impl(query).await
    }

    async fn update_campus(&self, id: i64, update: UpdateCampusRequest) -> Result<Option<Campus>> {
        self.update_campus_impl(id, update).await
    }

    async fn delete_campus(&self, id: i64) -> Result<bool> {
        self.delete_campus_impl(id).await
    }

    // 用户模块
    async fn create_user(&self, user: NewUser) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn list_users_with_pagination(
        &self,
        query: UserListQuery,
    ) -> Result<PaginatedResponse<User>> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(&self, id: i64, update: UserUpdate) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 学年模块
    async fn create_academic_year(&self, year: NewAcademicYear) -> Result<AcademicYear> {
        self.create_academic_year_impl(year).await
    }

    async fn get_academic_year_by_id(&self, id: i64) -> Result<Option<AcademicYear>> {
        self.get_academic_year_by_id_impl(id).await
    }

    async fn list_academic_years_with_pagination(
        &self,
        query: AcademicYearListQuery,
    ) -> Result<PaginatedResponse<AcademicYear>> {
        self.list_academic_years_with_pagination_impl(query).await
    }

    async fn update_academic_year(
        &self,
        id: i64,
        update: UpdateAcademicYearRequest,
    ) -> Result<Option<AcademicYear>> {
        self.update_academic_year_impl(id, update).await
    }

    async fn delete_academic_year(&self, id: i64) -> Result<bool> {
        self.delete_academic_year_impl(id).await
    }

    async fn set_current_academic_year(
        &self,
        tenant_id: i64,
        id: i64,
    ) -> Result<Option<AcademicYear>> {
        self.set_current_academic_year_impl(tenant_id, id).await
    }

    // 年级模块
    async fn create_class(&self, class: NewClass) -> Result<Class> {
        self.create_class_impl(class).await
    }

    async fn get_class_by_id(&self, id: i64) -> Result<Option<Class>> {
        self.get_class_by_id_impl(id).await
    }

    async fn list_classes_with_pagination(
        &self,
        query: ClassListQuery,
    ) -> Result<PaginatedResponse<Class>> {
        self.list_classes_with_pagination_impl(query).await
    }

    async fn update_class(&self, id: i64, update: UpdateClassRequest) -> Result<Option<Class>> {
        self.update_class_impl(id, update).await
    }

    async fn delete_class(&self, id: i64) -> Result<bool> {
        self.delete_class_impl(id).await
    }

    // 分班模块
    async fn create_section(&self, section: NewSection) -> Result<Section> {
        self.create_section_impl(section).await
    }

    async fn get_section_by_id(&self, id: i64) -> Result<Option<Section>> {
        self.get_section_by_id_impl(id).await
    }

    async fn list_sections_with_pagination(
        &self,
        query: SectionListQuery,
    ) -> Result<PaginatedResponse<Section>> {
        self.list_sections_with_pagination_impl(query).await
    }

    async fn update_section(
        &self,
        id: i64,
        update: UpdateSectionRequest,
    ) -> Result<Option<Section>> {
        self.update_section_impl(id, update).await
    }

    async fn delete_section(&self, id: i64) -> Result<bool> {
        self.delete_section_impl(id).await
    }

    async fn count_active_enrollments(&self, section_id: i64, academic_year_id: i64) -> Result<u64> {
        self.count_active_enrollments_impl(section_id, academic_year_id)
            .await
    }

    // 学生模块
    async fn create_student(&self, student: NewStudent) -> Result<Student> {
        self.create_student_impl(student).await
    }

    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>> {
        self.get_student_by_id_impl(id).await
    }

    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<PaginatedResponse<Student>> {
        self.list_students_with_pagination_impl(query).await
    }

    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        self.update_student_impl(id, update).await
    }

    async fn delete_student(&self, id: i64) -> Result<bool> {
        self.delete_student_impl(id).await
    }

    async fn find_existing_admission_nos(
        &self,
        tenant_id: i64,
        admission_nos: &[String],
    ) -> Result<Vec<String>> {
        self.find_existing_admission_nos_impl(tenant_id, admission_nos)
            .await
    }

    async fn import_students(&self, batch: StudentImportBatch) -> Result<Vec<Student>> {
        self.import_students_impl(batch).await
    }

    // 注册模块
    async fn create_enrollment(&self, enrollment: NewEnrollment) -> Result<Enrollment> {
        self.create_enrollment_impl(enrollment).await
    }

    async fn get_enrollment_by_id(&self, id: i64) -> Result<Option<Enrollment>> {
        self.get_enrollment_by_id_impl(id).await
    }

    async fn list_enrollments_with_pagination(
        &self,
        query: EnrollmentListQuery,
    ) -> Result<PaginatedResponse<Enrollment>> {
        self.list_enrollments_with_pagination_impl(query).await
    }

    async fn update_enrollment_status(
        &self,
        id: i64,
        status: EnrollmentStatus,
    ) -> Result<Option<Enrollment>> {
        self.update_enrollment_status_impl(id, status).await
    }

    async fn delete_enrollment(&self, id: i64) -> Result<bool> {
        self.delete_enrollment_impl(id).await
    }

    async fn has_active_enrollment(&self, student_id: i64, academic_year_id: i64) -> Result<bool> {
        self.has_active_enrollment_impl(student_id, academic_year_id)
            .await
    }

    // 题库模块
    async fn create_question(&self, question: NewQuestion) -> Result<Question> {
        self.create_question_impl(question).await
    }

    async fn get_question_by_id(&self, id: i64) -> Result<Option<Question>> {
        self.get_question_by_id_impl(id).await
    }

    async fn list_questions_with_pagination(
        &self,
        query: QuestionListQuery,
    ) -> Result<PaginatedResponse<Question>> {
        self.list_questions_with_pagination_impl(query).await
    }

    async fn update_question(
        &self,
        id: i64,
        update: UpdateQuestionRequest,
    ) -> Result<Option<Question>> {
        self.update_question_impl(id, update).await
    }

    async fn delete_question(&self, id: i64) -> Result<bool> {
        self.delete_question_impl(id).await
    }

    async fn is_question_locked(&self, id: i64) -> Result<bool> {
        self.is_question_locked_impl(id).await
    }

    // 考试模块
    async fn create_exam(&self, exam: NewExam) -> Result<Exam> {
        self.create_exam_impl(exam).await
    }

    async fn get_exam_by_id(&self, id: i64) -> Result<Option<Exam>> {
        self.get_exam_by_id_impl(id).await
    }

    async fn list_exams_with_pagination(
        &self,
        query: ExamListQuery,
    ) -> Result<PaginatedResponse<Exam>> {
        self.list_exams_with_pagination_impl(query).await
    }

    async fn update_exam(&self, id: i64, update: UpdateExamRequest) -> Result<Option<Exam>> {
        self.update_exam_impl(id, update).await
    }

    async fn delete_exam(&self, id: i64) -> Result<bool> {
        self.delete_exam_impl(id).await
    }

    async fn set_exam_status(
        &self,
        id: i64,
        from: ExamStatus,
        to: ExamStatus,
    ) -> Result<Option<Exam>> {
        self.set_exam_status_impl(id, from, to).await
    }

    async fn list_exam_questions(&self, exam_id: i64) -> Result<Vec<ExamQuestionItem>> {
        self.list_exam_questions_impl(exam_id).await
    }

    async fn add_exam_question(&self, exam_id: i64, question_id: i64) -> Result<ExamQuestionItem> {
        self.add_exam_question_impl(exam_id, question_id).await
    }

    async fn remove_exam_question(&self, exam_id: i64, question_id: i64) -> Result<bool> {
        self.remove_exam_question_impl(exam_id, question_id).await
    }

    // 配置模块
    async fn list_tenant_settings(&self, tenant_id: i64) -> Result<Vec<TenantSetting>> {
        self.list_tenant_settings_impl(tenant_id).await
    }

    async fn upsert_tenant_setting(
        &self,
        tenant_id: i64,
        key: &str,
        value: &str,
        value_type: SettingValueType,
        updated_by: Option<i64>,
    ) -> Result<TenantSetting> {
        self.upsert_tenant_setting_impl(tenant_id, key, value, value_type, updated_by)
            .await
    }

    // 审计模块
    async fn create_audit_log(&self, log: NewAuditLog) -> Result<AuditLog> {
        self.create_audit_log_impl(log).await
    }

    async fn list_audit_logs_with_pagination(
        &self,
        query: AuditLogListQuery,
    ) -> Result<PaginatedResponse<AuditLog>> {
        self.list_audit_logs_with_pagination_impl(query).await
    }
}
