pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::ErrorCode;
use crate::models::classes::entities::{Class, GRADE_LEVEL_RANGE};
use crate::models::classes::requests::{ClassQueryParams, CreateClassRequest, UpdateClassRequest};
use crate::services::common::{OptionExt, StorageResultExt, bad_request};
use crate::services::declare_service;
use crate::storage::Storage;

declare_service!(
    /// 班级（年级内的教学班）管理，按校区隔离
    ClassService
);

impl ClassService {
    pub async fn list_classes(
        &self,
        query: ClassQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_classes(self, query, request).await
    }

    pub async fn create_class(
        &self,
        class_data: CreateClassRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_class(self, class_data, request).await
    }

    pub async fn get_class(&self, class_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_class(self, class_id, request).await
    }

    pub async fn update_class(
        &self,
        class_id: i64,
        update_data: UpdateClassRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_class(self, class_id, update_data, request).await
    }

    pub async fn delete_class(&self, class_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        delete::delete_class(self, class_id, request).await
    }
}

pub(crate) async fn load_class(storage: &Arc<dyn Storage>, class_id: i64) -> Result<Class, HttpResponse> {
    storage
        .get_class_by_id(class_id)
        .await
        .or_storage_failure("Failed to load class")?
        .or_not_found(ErrorCode::ClassNotFound, "Class not found")
}

fn check_grade_level(grade_level: i32) -> Result<(), HttpResponse> {
    if GRADE_LEVEL_RANGE.contains(&grade_level) {
        Ok(())
    } else {
        Err(bad_request(
            ErrorCode::BadRequest,
            format!(
                "grade_level must be between {} and {}",
                GRADE_LEVEL_RANGE.start(),
                GRADE_LEVEL_RANGE.end()
            ),
        ))
    }
}
