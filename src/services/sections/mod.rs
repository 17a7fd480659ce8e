pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::ErrorCode;
use crate::models::sections::entities::Section;
use crate::models::sections::requests::{CreateSectionRequest, SectionQueryParams, UpdateSectionRequest};
use crate::models::users::entities::{User, UserRole};
use crate::policy::ResourceScope;
use crate::services::common::{OptionExt, StorageResultExt, bad_request};
use crate::services::declare_service;
use crate::storage::Storage;

declare_service!(
    /// 分班管理，分班所属校区取自其班级
    SectionService
);

impl SectionService {
    pub async fn list_sections(
        &self,
        query: SectionQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_sections(self, query, request).await
    }

    pub async fn create_section(
        &self,
        section_data: CreateSectionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_section(self, section_data, request).await
    }

    pub async fn get_section(&self, section_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_section(self, section_id, request).await
    }

    pub async fn update_section(
        &self,
        section_id: i64,
        update_data: UpdateSectionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_section(self, section_id, update_data, request).await
    }

    pub async fn delete_section(
        &self,
        section_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_section(self, section_id, request).await
    }
}

pub(crate) async fn load_section(
    storage: &Arc<dyn Storage>,
    section_id: i64,
) -> Result<Section, HttpResponse> {
    storage
        .get_section_by_id(section_id)
        .await
        .or_storage_failure("Failed to load section")?
        .or_not_found(ErrorCode::SectionNotFound, "Section not found")
}

fn check_capacity(capacity: Option<i32>) -> Result<(), HttpResponse> {
    match capacity {
        Some(capacity) if capacity <= 0 => Err(bad_request(
            ErrorCode::SectionInvalid,
            "capacity must be greater than 0",
        )),
        _ => Ok(()),
    }
}

/// 班主任必须是同一校区的在职教师
fn check_homeroom_teacher(teacher: &User, scope: ResourceScope) -> Result<(), &'static str> {
    if teacher.role != UserRole::Teacher {
        return Err("The homeroom teacher must have the teacher role");
    }
    if !teacher.is_active() {
        return Err("The homeroom teacher's account is not active");
    }
    if teacher.tenant_id != Some(scope.tenant_id) || teacher.campus_id != scope.campus_id {
        return Err("The homeroom teacher must belong to the section's campus");
    }
    Ok(())
}

async fn validate_homeroom_teacher(
    storage: &Arc<dyn Storage>,
    teacher_id: i64,
    scope: ResourceScope,
) -> Result<(), HttpResponse> {
    let teacher = storage
        .get_user_by_id(teacher_id)
        .await
        .or_storage_failure("Failed to load homeroom teacher")?
        .ok_or_else(|| bad_request(ErrorCode::SectionInvalid, "Homeroom teacher not found"))?;
    check_homeroom_teacher(&teacher, scope).map_err(|msg| bad_request(ErrorCode::SectionInvalid, msg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserStatus;

    fn staff(role: UserRole, status: UserStatus, campus_id: Option<i64>) -> User {
        let now = chrono::Utc::now();
        User {
            id: 7,
            tenant_id: Some(1),
            campus_id,
            username: "ms_lee".to_string(),
            email: "lee@school.test".to_string(),
            password_hash: String::new(),
            role,
            status,
            display_name: None,
            job_title: None,
            phone: None,
            last_login: None,
            created_at: now,
            updated_at: now,
            created_by: None,
        }
    }

    #[test]
    fn test_homeroom_teacher_rules() {
        let scope = ResourceScope::campus(1, 10);
        assert!(check_homeroom_teacher(&staff(UserRole::Teacher, UserStatus::Active, Some(10)), scope).is_ok());
        assert!(check_homeroom_teacher(&staff(UserRole::Staff, UserStatus::Active, Some(10)), scope).is_err());
        assert!(
            check_homeroom_teacher(&staff(UserRole::Teacher, UserStatus::Suspended, Some(10)), scope)
                .is_err()
        );
        assert!(check_homeroom_teacher(&staff(UserRole::Teacher, UserStatus::Active, Some(11)), scope).is_err());
    }

    #[test]
    fn test_capacity() {
        assert!(check_capacity(None).is_ok());
        assert!(check_capacity(Some(30)).is_ok());
        assert!(check_capacity(Some(0)).is_err());
        assert!(check_capacity(Some(-5)).is_err());
    }
}
