pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::ErrorCode;
use crate::models::campuses::entities::Campus;
use crate::models::users::entities::User;
use crate::models::users::requests::{CreateUserRequest, UpdateUserRequest, UserListParams};
use crate::services::campuses::load_campus;
use crate::services::common::{OptionExt, StorageResultExt, bad_request};
use crate::services::declare_service;
use crate::storage::Storage;

declare_service!(
    /// 教职工账号管理
    UserService
);

impl UserService {
    // 获取用户列表
    pub async fn list_users(
        &self,
        query: UserListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_users(self, query, request).await
    }

    // 创建用户
    pub async fn create_user(
        &self,
        user_data: CreateUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_user(self, user_data, request).await
    }

    // 根据ID获取用户
    pub async fn get_user(&self, user_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_user(self, user_id, request).await
    }

    // 更新用户信息
    pub async fn update_user(
        &self,
        user_id: i64,
        update_data: UpdateUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_user(self, user_id, update_data, request).await
    }

    // 删除用户
    pub async fn delete_user(
        &self,
        user_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_user(self, user_id, request).await
    }
}

pub(crate) async fn load_user(storage: &Arc<dyn Storage>, user_id: i64) -> Result<User, HttpResponse> {
    storage
        .get_user_by_id(user_id)
        .await
        .or_storage_failure("Failed to load user")?
        .or_not_found(ErrorCode::UserNotFound, "User not found")
}

/// 校区必须存在且属于指定租户
async fn load_campus_in_tenant(
    storage: &Arc<dyn Storage>,
    campus_id: i64,
    tenant_id: i64,
) -> Result<Campus, HttpResponse> {
    let campus = load_campus(storage, campus_id).await?;
    if campus.tenant_id != tenant_id {
        return Err(bad_request(
            ErrorCode::CampusNotFound,
            "The campus does not belong to the user's tenant",
        ));
    }
    Ok(campus)
}

fn validate_optional_phone(phone: Option<&str>) -> Result<(), HttpResponse> {
    match phone {
        Some(phone) => crate::utils::validate::validate_phone(phone)
            .map_err(|msg| bad_request(ErrorCode::BadRequest, msg)),
        None => Ok(()),
    }
}
