pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::ErrorCode;
use crate::models::campuses::entities::Campus;
use crate::models::campuses::requests::{CampusListParams, CreateCampusRequest, UpdateCampusRequest};
use crate::services::common::{OptionExt, StorageResultExt};
use crate::services::declare_service;
use crate::storage::Storage;

declare_service!(
    /// 校区管理
    CampusService
);

impl CampusService {
    pub async fn list_campuses(
        &self,
        query: CampusListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_campuses(self, query, request).await
    }

    pub async fn create_campus(
        &self,
        campus_data: CreateCampusRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_campus(self, campus_data, request).await
    }

    pub async fn get_campus(&self, campus_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_campus(self, campus_id, request).await
    }

    pub async fn update_campus(
        &self,
        campus_id: i64,
        update_data: UpdateCampusRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_campus(self, campus_id, update_data, request).await
    }

    pub async fn delete_campus(
        &self,
        campus_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_campus(self, campus_id, request).await
    }
}

/// 读取校区，不存在时返回 404
pub(crate) async fn load_campus(
    storage: &Arc<dyn Storage>,
    campus_id: i64,
) -> Result<Campus, HttpResponse> {
    storage
        .get_campus_by_id(campus_id)
        .await
        .or_storage_failure("Failed to load campus")?
        .or_not_found(ErrorCode::CampusNotFound, "Campus not found")
}
