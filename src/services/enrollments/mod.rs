pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::ErrorCode;
use crate::models::academic_years::entities::AcademicYear;
use crate::models::enrollments::entities::Enrollment;
use crate::models::enrollments::requests::{
    CreateEnrollmentRequest, EnrollmentListParams, UpdateEnrollmentStatusRequest,
};
use crate::models::sections::entities::Section;
use crate::models::students::entities::Student;
use crate::services::common::{OptionExt, StorageResultExt};
use crate::services::declare_service;
use crate::storage::Storage;

declare_service!(
    /// 学生在某学年某分班的注册
    EnrollmentService
);

impl EnrollmentService {
    pub async fn list_enrollments(
        &self,
        query: EnrollmentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_enrollments(self, query, request).await
    }

    pub async fn create_enrollment(
        &self,
        enrollment_data: CreateEnrollmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_enrollment(self, enrollment_data, request).await
    }

    pub async fn get_enrollment(
        &self,
        enrollment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_enrollment(self, enrollment_id, request).await
    }

    // 状态流转
    pub async fn update_enrollment_status(
        &self,
        enrollment_id: i64,
        update_data: UpdateEnrollmentStatusRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_enrollment_status(self, enrollment_id, update_data, request).await
    }

    pub async fn delete_enrollment(
        &self,
        enrollment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_enrollment(self, enrollment_id, request).await
    }
}

pub(crate) async fn load_enrollment(
    storage: &Arc<dyn Storage>,
    enrollment_id: i64,
) -> Result<Enrollment, HttpResponse> {
    storage
        .get_enrollment_by_id(enrollment_id)
        .await
        .or_storage_failure("Failed to load enrollment")?
        .or_not_found(ErrorCode::EnrollmentNotFound, "Enrollment not found")
}

/// 学生、分班与学年必须同属一个租户，学生与分班必须同属一个校区
fn check_enrollment_scope(
    student: &Student,
    section: &Section,
    year: &AcademicYear,
) -> Result<(), &'static str> {
    if student.tenant_id != section.tenant_id || year.tenant_id != section.tenant_id {
        return Err("Student, section and academic year must belong to the same tenant");
    }
    if student.campus_id != section.campus_id {
        return Err("Student and section must belong to the same campus");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::students::entities::StudentStatus;
    use chrono::{NaiveDate, Utc};

    fn student(tenant_id: i64, campus_id: i64) -> Student {
        Student {
            id: 1,
            tenant_id,
            campus_id,
            admission_no: "ADM-1".to_string(),
            first_name: "Noah".to_string(),
            last_name: "Smith".to_string(),
            date_of_birth: None,
            gender: None,
            guardian_name: None,
            guardian_phone: None,
            status: StudentStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            created_by: None,
        }
    }

    fn section(tenant_id: i64, campus_id: i64) -> Section {
        Section {
            id: 2,
            tenant_id,
            campus_id,
            class_id: 3,
            name: "7B".to_string(),
            capacity: Some(30),
            homeroom_teacher_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            created_by: None,
        }
    }

    fn year(tenant_id: i64) -> AcademicYear {
        AcademicYear {
            id: 4,
            tenant_id,
            name: "2025-2026".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 6, 30).unwrap(),
            is_current: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            created_by: None,
        }
    }

    #[test]
    fn test_same_campus_is_accepted() {
        assert!(check_enrollment_scope(&student(1, 10), &section(1, 10), &year(1)).is_ok());
    }

    #[test]
    fn test_cross_tenant_is_rejected() {
        assert!(check_enrollment_scope(&student(2, 10), &section(1, 10), &year(1)).is_err());
        assert!(check_enrollment_scope(&student(1, 10), &section(1, 10), &year(2)).is_err());
    }

    #[test]
    fn test_cross_campus_is_rejected() {
        assert!(check_enrollment_scope(&student(1, 11), &section(1, 10), &year(1)).is_err());
    }

    mod handlers {
        use super::super::EnrollmentService;
        use crate::models::ErrorCode;
        use crate::models::enrollments::requests::CreateEnrollmentRequest;
        use crate::services::StudentService;
        use crate::services::testing::*;
        use actix_web::http::StatusCode;

        fn enroll(school: &School, student_id: i64) -> CreateEnrollmentRequest {
            CreateEnrollmentRequest {
                student_id,
                section_id: school.section_id,
                academic_year_id: school.academic_year_id,
            }
        }

        #[actix_web::test]
        async fn test_create_enrollment_status_codes() {
            let storage = memory_storage().await;
            let school = seed_school(&storage, "maple", Some(1)).await;
            let service = EnrollmentService::with_storage(storage.clone());
            let request = request_as(&school.admin);

            let first = seed_student(&storage, school.tenant_id, school.campus_id, "M-1").await;
            let response = service
                .create_enrollment(enroll(&school, first.id), &request)
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);

            // 同一学年已有有效注册
            let response = service
                .create_enrollment(enroll(&school, first.id), &request)
                .await
                .unwrap();
            assert_eq!(
                status_and_code(response).await,
                (StatusCode::CONFLICT, code(ErrorCode::EnrollmentConflict))
            );

            let second = seed_student(&storage, school.tenant_id, school.campus_id, "M-2").await;
            let response = service
                .create_enrollment(enroll(&school, second.id), &request)
                .await
                .unwrap();
            assert_eq!(
                status_and_code(response).await,
                (StatusCode::CONFLICT, code(ErrorCode::SectionFull))
            );

            let south = seed_campus(&storage, school.tenant_id, "south").await;
            let outsider = seed_student(&storage, school.tenant_id, south, "M-3").await;
            let response = service
                .create_enrollment(enroll(&school, outsider.id), &request)
                .await
                .unwrap();
            assert_eq!(
                status_and_code(response).await,
                (StatusCode::BAD_REQUEST, code(ErrorCode::EnrollmentScopeMismatch))
            );
        }

        #[actix_web::test]
        async fn test_deleted_student_releases_seat() {
            let storage = memory_storage().await;
            let school = seed_school(&storage, "birch", Some(1)).await;
            let enrollments = EnrollmentService::with_storage(storage.clone());
            let students = StudentService::with_storage(storage.clone());
            let request = request_as(&school.admin);

            let leaver = seed_student(&storage, school.tenant_id, school.campus_id, "B-1").await;
            let response = enrollments
                .create_enrollment(enroll(&school, leaver.id), &request)
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);

            let response = students.delete_student(leaver.id, &request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert!(
                !storage
                    .has_active_enrollment(leaver.id, school.academic_year_id)
                    .await
                    .unwrap()
            );

            let newcomer = seed_student(&storage, school.tenant_id, school.campus_id, "B-2").await;
            let response = enrollments
                .create_enrollment(enroll(&school, newcomer.id), &request)
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        #[actix_web::test]
        async fn test_other_tenant_cannot_enroll() {
            let storage = memory_storage().await;
            let school = seed_school(&storage, "cedar", None).await;
            let rival = seed_school(&storage, "rival", None).await;
            let service = EnrollmentService::with_storage(storage.clone());

            let student = seed_student(&storage, school.tenant_id, school.campus_id, "C-1").await;
            let response = service
                .create_enrollment(enroll(&school, student.id), &request_as(&rival.admin))
                .await
                .unwrap();
            assert_eq!(
                status_and_code(response).await,
                (StatusCode::FORBIDDEN, code(ErrorCode::Forbidden))
            );
        }
    }
}
