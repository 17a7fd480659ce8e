use super::SeaOrmStorage;
use crate::models::{
    academic_years::requests::NewAcademicYear,
    audit::{
        entities::{AuditAction, NewAuditLog},
        requests::AuditLogListQuery,
    },
    campuses::requests::{CampusListQuery, NewCampus},
    classes::requests::NewClass,
    enrollments::{entities::EnrollmentStatus, requests::NewEnrollment},
    exams::{entities::ExamStatus, requests::NewExam},
    questions::{
        entities::{Answer, Difficulty, QuestionType},
        requests::NewQuestion,
    },
    sections::requests::NewSection,
    settings::entities::SettingValueType,
    students::requests::{NewStudent, StudentImportBatch, StudentListQuery},
    tenants::requests::NewTenant,
    users::{
        entities::{UserRole, UserStatus},
        requests::{NewUser, UserListQuery, UserUpdate},
    },
};
use crate::policy::{Resource, ScopeFilter};
use crate::storage::Storage;
use chrono::NaiveDate;
use sea_orm::{ConnectOptions, Database};

async fn storage() -> SeaOrmStorage {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.unwrap();
    SeaOrmStorage::from_connection(db).await.unwrap()
}

async fn seed_tenant(s: &SeaOrmStorage, code: &str) -> i64 {
    s.create_tenant(NewTenant {
        name: format!("School {code}"),
        code: code.to_string(),
        contact_email: None,
        created_by: None,
    })
    .await
    .unwrap()
    .id
}

async fn seed_campus(s: &SeaOrmStorage, tenant_id: i64, code: &str) -> i64 {
    s.create_campus(NewCampus {
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

fn new_student(tenant_id: i64, campus_id: i64, admission_no: &str) -> NewStudent {
    NewStudent {
        tenant_id,
        campus_id,
        admission_no: admission_no.to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(2012, 5, 1),
        gender: None,
        guardian_name: None,
        guardian_phone: None,
        created_by: None,
    }
}

// 建立 租户-校区-年级-分班-学年 的基础数据
async fn seed_section(s: &SeaOrmStorage) -> (i64, i64, i64, i64) {
    let tenant_id = seed_tenant(s, "greenfield").await;
    let campus_id = seed_campus(s, tenant_id, "north").await;
    let class = s
        .create_class(NewClass {
            tenant_id,
            campus_id,
            name: "Grade 5".to_string(),
            grade_level: 5,
            description: None,
            created_by: None,
        })
        .await
        .unwrap();
    let section = s
        .create_section(NewSection {
            tenant_id,
            campus_id,
            class_id: class.id,
            name: "5A".to_string(),
            capacity: Some(2),
            homeroom_teacher_id: None,
            created_by: None,
        })
        .await
        .unwrap();
    let year = s
        .create_academic_year(NewAcademicYear {
            tenant_id,
            name: "2025-2026".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 6, 30).unwrap(),
            created_by: None,
        })
        .await
        .unwrap();
    (tenant_id, campus_id, section.id, year.id)
}

#[tokio::test]
async fn test_soft_deleted_rows_are_hidden() {
    let s = storage().await;
    let tenant_id = seed_tenant(&s, "alpha").await;
    let campus_id = seed_campus(&s, tenant_id, "main").await;

    assert!(s.delete_campus(campus_id).await.unwrap());
    assert!(s.get_campus_by_id(campus_id).await.unwrap().is_none());
    // 重复删除返回 false
    assert!(!s.delete_campus(campus_id).await.unwrap());

    let list = s
        .list_campuses_with_pagination(CampusListQuery {
            page: 1,
            size: 10,
            scope: ScopeFilter {
                tenant_id: Some(tenant_id),
                campus_id: None,
            },
            search: None,
        })
        .await
        .unwrap();
    assert_eq!(list.pagination.total, 0);
}

#[tokio::test]
async fn test_unique_violation_maps_to_conflict() {
    let s = storage().await;
    seed_tenant(&s, "dup").await;
    let err = s
        .create_tenant(NewTenant {
            name: "Other".to_string(),
            code: "dup".to_string(),
            contact_email: None,
            created_by: None,
        })
        .await
        .unwrap_err();
    assert!(err.is_conflict());
}

#[tokio::test]
async fn test_user_scope_filter_and_soft_delete() {
    let s = storage().await;
    let t1 = seed_tenant(&s, "t-one").await;
    let t2 = seed_tenant(&s, "t-two").await;

    for (i, tenant_id) in [t1, t1, t2].into_iter().enumerate() {
        s.create_user(NewUser {
            tenant_id: Some(tenant_id),
            campus_id: None,
            username: format!("staff{i}"),
            email: format!("staff{i}@school.test"),
            password_hash: "hash".to_string(),
            role: UserRole::TenantAdmin,
            display_name: None,
            job_title: None,
            phone: None,
            created_by: None,
        })
        .await
        .unwrap();
    }

    let query = UserListQuery {
        page: 1,
        size: 10,
        scope: ScopeFilter {
            tenant_id: Some(t1),
            campus_id: None,
        },
        ..Default::default()
    };
    let page = s.list_users_with_pagination(query.clone()).await.unwrap();
    assert_eq!(page.pagination.total, 2);

    let victim = page.items[0].id;
    assert!(s.delete_user(victim).await.unwrap());
    assert!(s.get_user_by_id(victim).await.unwrap().is_none());
    let page = s.list_users_with_pagination(query).await.unwrap();
    assert_eq!(page.pagination.total, 1);
    assert_eq!(s.count_users().await.unwrap(), 3);
}

#[tokio::test]
async fn test_update_user_clears_campus() {
    let s = storage().await;
    let tenant_id = seed_tenant(&s, "upd").await;
    let campus_id = seed_campus(&s, tenant_id, "c1").await;
    let user = s
        .create_user(NewUser {
            tenant_id: Some(tenant_id),
            campus_id: Some(campus_id),
            username: "teacher1".to_string(),
            email: "teacher1@school.test".to_string(),
            password_hash: "hash".to_string(),
            role: UserRole::Teacher,
            display_name: None,
            job_title: None,
            phone: None,
            created_by: None,
        })
        .await
        .unwrap();

    let updated = s
        .update_user(
            user.id,
            UserUpdate {
                role: Some(UserRole::TenantAdmin),
                campus_id: Some(None),
                status: Some(UserStatus::Suspended),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.role, UserRole::TenantAdmin);
    assert_eq!(updated.campus_id, None);
    assert_eq!(updated.status, UserStatus::Suspended);
}

#[tokio::test]
async fn test_set_current_academic_year_is_exclusive() {
    let s = storage().await;
    let tenant_id = seed_tenant(&s, "years").await;
    let mut ids = Vec::new();
    for year in [2024, 2025] {
        let created = s
            .create_academic_year(NewAcademicYear {
                tenant_id,
                name: format!("{year}-{}", year + 1),
                start_date: NaiveDate::from_ymd_opt(year, 9, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(year + 1, 6, 30).unwrap(),
                created_by: None,
            })
            .await
            .unwrap();
        ids.push(created.id);
    }

    s.set_current_academic_year(tenant_id, ids[0]).await.unwrap();
    let current = s.set_current_academic_year(tenant_id, ids[1]).await.unwrap();
    assert!(current.unwrap().is_current);
    assert!(!s.get_academic_year_by_id(ids[0]).await.unwrap().unwrap().is_current);

    // 其他租户的学年无法被设置
    let other = seed_tenant(&s, "other-years").await;
    assert!(s.set_current_academic_year(other, ids[0]).await.unwrap().is_none());
    assert!(s.get_academic_year_by_id(ids[1]).await.unwrap().unwrap().is_current);
}

#[tokio::test]
async fn test_enrollment_counts_and_status() {
    let s = storage().await;
    let (tenant_id, campus_id, section_id, year_id) = seed_section(&s).await;
    let student = s
        .create_student(new_student(tenant_id, campus_id, "A-001"))
        .await
        .unwrap();

    let enrollment = s
        .create_enrollment(NewEnrollment {
            tenant_id,
            campus_id,
            student_id: student.id,
            section_id,
            academic_year_id: year_id,
            created_by: None,
        })
        .await
        .unwrap();
    assert_eq!(s.count_active_enrollments(section_id, year_id).await.unwrap(), 1);
    assert!(s.has_active_enrollment(student.id, year_id).await.unwrap());

    let withdrawn = s
        .update_enrollment_status(enrollment.id, EnrollmentStatus::Withdrawn)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(withdrawn.status, EnrollmentStatus::Withdrawn);
    assert!(withdrawn.ended_at.is_some());
    assert_eq!(s.count_active_enrollments(section_id, year_id).await.unwrap(), 0);
    assert!(!s.has_active_enrollment(student.id, year_id).await.unwrap());
}

#[tokio::test]
async fn test_import_students_commits_students_and_enrollments() {
    let s = storage().await;
    let (tenant_id, campus_id, section_id, year_id) = seed_section(&s).await;

    let created = s
        .import_students(StudentImportBatch {
            section_id,
            academic_year_id: year_id,
            students: vec![
                new_student(tenant_id, campus_id, "B-001"),
                new_student(tenant_id, campus_id, "B-002"),
            ],
        })
        .await
        .unwrap();
    assert_eq!(created.len(), 2);
    assert_eq!(s.count_active_enrollments(section_id, year_id).await.unwrap(), 2);

    let in_section = s
        .list_students_with_pagination(StudentListQuery {
            page: 1,
            size: 10,
            section_id: Some(section_id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(in_section.pagination.total, 2);

    let existing = s
        .find_existing_admission_nos(
            tenant_id,
            &["B-001".to_string(), "B-404".to_string()],
        )
        .await
        .unwrap();
    assert_eq!(existing, vec!["B-001".to_string()]);
}

#[tokio::test]
async fn test_import_students_rolls_back_on_failure() {
    let s = storage().await;
    let (tenant_id, campus_id, section_id, year_id) = seed_section(&s).await;
    s.create_student(new_student(tenant_id, campus_id, "C-002"))
        .await
        .unwrap();

    // 第二行与已有学号冲突，第一行也不应保留
    let err = s
        .import_students(StudentImportBatch {
            section_id,
            academic_year_id: year_id,
            students: vec![
                new_student(tenant_id, campus_id, "C-001"),
                new_student(tenant_id, campus_id, "C-002"),
            ],
        })
        .await
        .unwrap_err();
    assert!(err.is_conflict());

    let existing = s
        .find_existing_admission_nos(tenant_id, &["C-001".to_string()])
        .await
        .unwrap();
    assert!(existing.is_empty());
    assert_eq!(s.count_active_enrollments(section_id, year_id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_exam_questions_and_locking() {
    let s = storage().await;
    let tenant_id = seed_tenant(&s, "exams").await;
    let campus_id = seed_campus(&s, tenant_id, "east").await;

    let question = s
        .create_question(NewQuestion {
            tenant_id,
            campus_id: None,
            subject: "Math".to_string(),
            question_type: QuestionType::SingleChoice,
            body: "2 + 2 = ?".to_string(),
            options: vec!["3".to_string(), "4".to_string()],
            answer: Answer::Choice(1),
            marks: 5,
            difficulty: Difficulty::Easy,
            created_by: None,
        })
        .await
        .unwrap();
    let exam = s
        .create_exam(NewExam {
            tenant_id,
            campus_id,
            class_id: None,
            title: "Midterm".to_string(),
            description: None,
            duration_minutes: 45,
            scheduled_at: None,
            created_by: None,
        })
        .await
        .unwrap();

    let item = s.add_exam_question(exam.id, question.id).await.unwrap();
    assert_eq!(item.position, 1);
    assert_eq!(item.question.options.len(), 2);
    assert!(
        s.add_exam_question(exam.id, question.id)
            .await
            .unwrap_err()
            .is_conflict()
    );
    assert!(!s.is_question_locked(question.id).await.unwrap());

    let published = s
        .set_exam_status(exam.id, ExamStatus::Draft, ExamStatus::Published)
        .await
        .unwrap()
        .unwrap();
    assert!(published.published_at.is_some());
    // 状态已不是草稿，重复切换不生效
    assert!(
        s.set_exam_status(exam.id, ExamStatus::Draft, ExamStatus::Archived)
            .await
            .unwrap()
            .is_none()
    );
    assert!(s.is_question_locked(question.id).await.unwrap());

    let items = s.list_exam_questions(exam.id).await.unwrap();
    assert_eq!(items.len(), 1);
    assert!(matches!(items[0].question.answer, Answer::Choice(1)));
}

#[tokio::test]
async fn test_settings_upsert_overwrites() {
    let s = storage().await;
    let tenant_id = seed_tenant(&s, "settings").await;

    s.upsert_tenant_setting(tenant_id, "import.max_rows", "200", SettingValueType::Integer, None)
        .await
        .unwrap();
    let saved = s
        .upsert_tenant_setting(
            tenant_id,
            "import.max_rows",
            "300",
            SettingValueType::Integer,
            Some(1),
        )
        .await
        .unwrap();
    assert_eq!(saved.value, "300");
    assert_eq!(saved.updated_by, Some(1));

    let all = s.list_tenant_settings(tenant_id).await.unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn test_audit_logs_filtered_by_scope() {
    let s = storage().await;
    for tenant_id in [Some(1), Some(2), None] {
        s.create_audit_log(NewAuditLog {
            tenant_id,
            campus_id: None,
            actor_id: 7,
            action: AuditAction::Create,
            resource: Resource::Student,
            resource_id: Some(1),
            summary: None,
            ip_address: Some("127.0.0.1".to_string()),
        })
        .await
        .unwrap();
    }

    let page = s
        .list_audit_logs_with_pagination(AuditLogListQuery {
            page: 1,
            size: 10,
            scope: ScopeFilter {
                tenant_id: Some(1),
                campus_id: None,
            },
            resource: Some(Resource::Student),
            actor_id: None,
        })
        .await
        .unwrap();
    assert_eq!(page.pagination.total, 1);
    assert_eq!(page.items[0].resource, "student");
    assert_eq!(page.items[0].action, "create");
}

fn short_answer(tenant_id: i64, body: &str) -> NewQuestion {
    NewQuestion {
        tenant_id,
        campus_id: None,
        subject: "History".to_string(),
        question_type: QuestionType::ShortAnswer,
        body: body.to_string(),
        options: Vec::new(),
        answer: Answer::Text("1066".to_string()),
        marks: 3,
        difficulty: Difficulty::Medium,
        created_by: None,
    }
}

fn exam_in(tenant_id: i64, campus_id: i64, title: &str) -> NewExam {
    NewExam {
        tenant_id,
        campus_id,
        class_id: None,
        title: title.to_string(),
        description: None,
        duration_minutes: 30,
        scheduled_at: None,
        created_by: None,
    }
}

#[tokio::test]
async fn test_deleting_question_detaches_it_from_draft_exams() {
    let s = storage().await;
    let tenant_id = seed_tenant(&s, "detach").await;
    let campus_id = seed_campus(&s, tenant_id, "west").await;

    let kept = s
        .create_question(short_answer(tenant_id, "Battle of Hastings year?"))
        .await
        .unwrap();
    let dropped = s
        .create_question(short_answer(tenant_id, "Magna Carta year?"))
        .await
        .unwrap();

    let draft = s.create_exam(exam_in(tenant_id, campus_id, "Quiz")).await.unwrap();
    s.add_exam_question(draft.id, kept.id).await.unwrap();
    s.add_exam_question(draft.id, dropped.id).await.unwrap();

    let published = s.create_exam(exam_in(tenant_id, campus_id, "Final")).await.unwrap();
    s.add_exam_question(published.id, dropped.id).await.unwrap();
    s.set_exam_status(published.id, ExamStatus::Draft, ExamStatus::Published)
        .await
        .unwrap()
        .unwrap();

    assert!(s.delete_question(dropped.id).await.unwrap());
    assert!(s.get_question_by_id(dropped.id).await.unwrap().is_none());

    let items = s.list_exam_questions(draft.id).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].question.id, kept.id);
    // 已删除的题目不能再加入试卷
    assert!(s.add_exam_question(draft.id, dropped.id).await.is_err());

    // 已发布试卷保留关联但不再列出已删除题目
    assert!(s.list_exam_questions(published.id).await.unwrap().is_empty());
    assert!(s.is_question_locked(dropped.id).await.unwrap());
}

#[tokio::test]
async fn test_deleting_student_withdraws_active_enrollment() {
    let s = storage().await;
    let (tenant_id, campus_id, section_id, year_id) = seed_section(&s).await;
    let student = s
        .create_student(new_student(tenant_id, campus_id, "D-001"))
        .await
        .unwrap();
    let enrollment = s
        .create_enrollment(NewEnrollment {
            tenant_id,
            campus_id,
            student_id: student.id,
            section_id,
            academic_year_id: year_id,
            created_by: None,
        })
        .await
        .unwrap();
    assert_eq!(s.count_active_enrollments(section_id, year_id).await.unwrap(), 1);

    assert!(s.delete_student(student.id).await.unwrap());
    assert_eq!(s.count_active_enrollments(section_id, year_id).await.unwrap(), 0);
    let ended = s.get_enrollment_by_id(enrollment.id).await.unwrap().unwrap();
    assert_eq!(ended.status, EnrollmentStatus::Withdrawn);
    assert!(ended.ended_at.is_some());

    // 重复删除不再改动任何数据
    assert!(!s.delete_student(student.id).await.unwrap());
}
