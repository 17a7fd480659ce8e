//! 服务层测试辅助：内存 SQLite 存储、携带当前用户的请求与基础数据

use actix_web::{HttpMessage, HttpRequest, HttpResponse, http::StatusCode, test};
use chrono::NaiveDate;
use sea_orm::{ConnectOptions, Database};
use std::sync::Arc;

use crate::models::academic_years::requests::NewAcademicYear;
use crate::models::campuses::requests::NewCampus;
use crate::models::classes::requests::NewClass;
use crate::models::sections::requests::NewSection;
use crate::models::students::{entities::Student, requests::NewStudent};
use crate::models::tenants::requests::NewTenant;
use crate::models::users::entities::{User, UserRole};
use crate::models::users::requests::NewUser;
use crate::models::{ErrorCode, exams::entities::Exam, exams::requests::NewExam};
use crate::storage::Storage;
use crate::storage::sea_orm_storage::SeaOrmStorage;

pub(crate) async fn memory_storage() -> Arc<dyn Storage> {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.unwrap();
    Arc::new(SeaOrmStorage::from_connection(db).await.unwrap())
}

/// 模拟通过 JWT 认证后的请求
pub(crate) fn request_as(user: &User) -> HttpRequest {
    let request = test::TestRequest::default().to_http_request();
    request.extensions_mut().insert(user.clone());
    request
}

/// HTTP 状态码与响应体中的业务码
pub(crate) async fn status_and_code(response: HttpResponse) -> (StatusCode, i32) {
    let status = response.status();
    let body = actix_web::body::to_bytes(response.into_body()).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    (status, json["code"].as_i64().unwrap() as i32)
}

pub(crate) fn code(code: ErrorCode) -> i32 {
    code as i32
}

pub(crate) async fn seed_user(
    storage: &Arc<dyn Storage>,
    username: &str,
    role: UserRole,
    tenant_id: Option<i64>,
    campus_id: Option<i64>,
) -> User {
    storage
        .create_user(NewUser {
            tenant_id,
            campus_id,
            username: username.to_string(),
            email: format!("{username}@school.test"),
            password_hash: "hash".to_string(),
            role,
            display_name: None,
            job_title: None,
            phone: None,
            created_by: None,
        })
        .await
        .unwrap()
}

/// 一所学校：一个校区、一个分班、一个学年和一名租户管理员
pub(crate) struct School {
    pub tenant_id: i64,
    pub campus_id: i64,
    pub section_id: i64,
    pub academic_year_id: i64,
    pub admin: User,
}

pub(crate) async fn seed_school(
    storage: &Arc<dyn Storage>,
    code: &str,
    capacity: Option<i32>,
) -> School {
    let tenant = storage
        .create_tenant(NewTenant {
            name: format!("School {code}"),
            code: code.to_string(),
            contact_email: None,
            created_by: None,
        })
        .await
        .unwrap();
    let campus_id = seed_campus(storage, tenant.id, "main").await;
    let class = storage
        .create_class(NewClass {
            tenant_id: tenant.id,
            campus_id,
            name: "Grade 4".to_string(),
            grade_level: 4,
            description: None,
            created_by: None,
        })
        .await
        .unwrap();
    let section = storage
        .create_section(NewSection {
            tenant_id: tenant.id,
            campus_id,
            class_id: class.id,
            name: "4B".to_string(),
            capacity,
            homeroom_teacher_id: None,
            created_by: None,
        })
        .await
        .unwrap();
    let year = storage
        .create_academic_year(NewAcademicYear {
            tenant_id: tenant.id,
            name: "2025-2026".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 6, 30).unwrap(),
            created_by: None,
        })
        .await
        .unwrap();
    let admin = seed_user(
        storage,
        &format!("{code}-admin"),
        UserRole::TenantAdmin,
        Some(tenant.id),
        None,
    )
    .await;

    School {
        tenant_id: tenant.id,
        campus_id,
        section_id: section.id,
        academic_year_id: year.id,
        admin,
    }
}

pub(crate) async fn seed_campus(storage: &Arc<dyn Storage>, tenant_id: i64, code: &str) -> i64 {
    storage
        .create_campus(NewCampus {
            tenant_id,
            name: format!("Campus {code}"),
            code: code.to_string(),
            address: None,
            created_by: None,
        })
        .await
        .unwrap()
        .id
}

pub(crate) async fn seed_student(
    storage: &Arc<dyn Storage>,
    tenant_id: i64,
    campus_id: i64,
    admission_no: &str,
) -> Student {
    storage
        .create_student(NewStudent {
            tenant_id,
            campus_id,
            admission_no: admission_no.to_string(),
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(2014, 3, 9),
            gender: None,
            guardian_name: None,
            guardian_phone: None,
            created_by: None,
        })
        .await
        .unwrap()
}

pub(crate) async fn seed_exam(storage: &Arc<dyn Storage>, school: &School) -> Exam {
    storage
        .create_exam(NewExam {
            tenant_id: school.tenant_id,
            campus_id: school.campus_id,
            class_id: None,
            title: "Unit test".to_string(),
            description: None,
            duration_minutes: 40,
            scheduled_at: None,
            created_by: None,
        })
        .await
        .unwrap()
}
