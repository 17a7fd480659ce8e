use super::entities::{UserRole, UserStatus};
use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_i64;
use crate::policy::ScopeFilter;
use serde::Deserialize;

// 用户查询参数（来自HTTP请求）
#[derive(Debug, Deserialize)]
pub struct UserListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub campus_id: Option<i64>,
    pub search: Option<String>,
}

// 用户创建请求
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub tenant_id: Option<i64>,
    pub campus_id: Option<i64>,
    pub display_name: Option<String>,
    pub job_title: Option<String>,
    pub phone: Option<String>,
}

// 用户更新请求
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub campus_id: Option<i64>,
    pub display_name: Option<String>,
    pub job_title: Option<String>,
    pub phone: Option<String>,
}

// 修改本人密码
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

// 以下为存储层参数

/// 新建用户（密码已哈希，租户与校区已解析）
#[derive(Debug, Clone)]
pub struct NewUser {
    pub tenant_id: Option<i64>,
    pub campus_id: Option<i64>,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub display_name: Option<String>,
    pub job_title: Option<String>,
    pub phone: Option<String>,
    pub created_by: Option<i64>,
}

/// 用户更新（密码已哈希）
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub campus_id: Option<Option<i64>>,
    pub display_name: Option<String>,
    pub job_title: Option<String>,
    pub phone: Option<String>,
}

// 用户列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct UserListQuery {
    pub page: u64,
    pub size: u64,
    pub scope: ScopeFilter,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub campus_id: Option<i64>,
    pub search: Option<String>,
}
