pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod set_current;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::ErrorCode;
use crate::models::academic_years::entities::AcademicYear;
use crate::models::academic_years::requests::{
    AcademicYearListParams, CreateAcademicYearRequest, UpdateAcademicYearRequest,
};
use crate::services::common::{OptionExt, StorageResultExt};
use crate::services::declare_service;
use crate::storage::Storage;

declare_service!(
    /// 学年管理（租户级）
    AcademicYearService
);

impl AcademicYearService {
    pub async fn list_academic_years(
        &self,
        query: AcademicYearListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_academic_years(self, query, request).await
    }

    pub async fn create_academic_year(
        &self,
        year_data: CreateAcademicYearRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_academic_year(self, year_data, request).await
    }

    pub async fn get_academic_year(&self, year_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_academic_year(self, year_id, request).await
    }

    pub async fn update_academic_year(
        &self,
        year_id: i64,
        update_data: UpdateAcademicYearRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_academic_year(self, year_id, update_data, request).await
    }

    pub async fn delete_academic_year(
        &self,
        year_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_academic_year(self, year_id, request).await
    }

    // 设为当前学年
    pub async fn set_current(&self, year_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        set_current::set_current_academic_year(self, year_id, request).await
    }
}

pub(crate) async fn load_academic_year(
    storage: &Arc<dyn Storage>,
    year_id: i64,
) -> Result<AcademicYear, HttpResponse> {
    storage
        .get_academic_year_by_id(year_id)
        .await
        .or_storage_failure("Failed to load academic year")?
        .or_not_found(ErrorCode::AcademicYearNotFound, "Academic year not found")
}
