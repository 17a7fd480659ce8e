use serde::{Deserialize, Serialize};

// 用户角色
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    SuperAdmin,  // 平台超级管理员
    TenantAdmin, // 学校（租户）管理员
    CampusAdmin, // 校区管理员
    Teacher,     // 教师
    Staff,       // 教务人员
}

impl UserRole {
    pub const SUPER_ADMIN: &'static str = "super_admin";
    pub const TENANT_ADMIN: &'static str = "tenant_admin";
    pub const CAMPUS_ADMIN: &'static str = "campus_admin";
    pub const TEACHER: &'static str = "teacher";
    pub const STAFF: &'static str = "staff";

    pub fn all_roles() -> &'static [UserRole] {
        &[
            Self::SuperAdmin,
            Self::TenantAdmin,
            Self::CampusAdmin,
            Self::Teacher,
            Self::Staff,
        ]
    }

    /// 账号绑定到某个校区的角色
    pub fn is_campus_bound(&self) -> bool {
        matches!(self, Self::CampusAdmin | Self::Teacher | Self::Staff)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::SuperAdmin => Self::SUPER_ADMIN,
            UserRole::TenantAdmin => Self::TENANT_ADMIN,
            UserRole::CampusAdmin => Self::CAMPUS_ADMIN,
            UserRole::Teacher => Self::TEACHER,
            UserRole::Staff => Self::STAFF,
        }
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的用户角色: '{s}'. 支持的角色: super_admin, tenant_admin, campus_admin, teacher, staff"
            ))
        })
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            UserRole::SUPER_ADMIN => Ok(UserRole::SuperAdmin),
            UserRole::TENANT_ADMIN => Ok(UserRole::TenantAdmin),
            UserRole::CAMPUS_ADMIN => Ok(UserRole::CampusAdmin),
            UserRole::TEACHER => Ok(UserRole::Teacher),
            UserRole::STAFF => Ok(UserRole::Staff),
            _ => Err(format!("Invalid user role: {s}")),
        }
    }
}

// 用户状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Active,    // 活跃
    Inactive,  // 停用（含已删除账号）
    Suspended, // 暂停
}

impl<'de> Deserialize<'de> for UserStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的用户状态: '{s}'. 支持的状态: active, inactive, suspended"
            ))
        })
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserStatus::Active => write!(f, "active"),
            UserStatus::Inactive => write!(f, "inactive"),
            UserStatus::Suspended => write!(f, "suspended"),
        }
    }
}

impl std::str::FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(UserStatus::Active),
            "inactive" => Ok(UserStatus::Inactive),
            "suspended" => Ok(UserStatus::Suspended),
            _ => Err(format!("Invalid user status: {s}")),
        }
    }
}

// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub tenant_id: Option<i64>,
    pub campus_id: Option<i64>,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    pub password_hash: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub display_name: Option<String>,
    pub job_title: Option<String>,
    pub phone: Option<String>,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub created_by: Option<i64>,
}

impl User {
    // 生成 token 对（access + refresh）
    pub fn generate_token_pair(
        &self,
        remember_me: bool,
    ) -> Result<crate::utils::jwt::TokenPair, String> {
        crate::utils::jwt::JwtUtils::generate_token_pair(self.id, self.role.as_str(), remember_me)
            .map_err(|e| format!("Failed to generate token pair: {e}"))
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_strings() {
        for role in UserRole::all_roles() {
            assert_eq!(role.as_str().parse::<UserRole>(), Ok(*role));
        }
        assert!("admin".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_role_deserialize_error_lists_roles() {
        let err = serde_json::from_str::<UserRole>("\"principal\"").unwrap_err();
        assert!(err.to_string().contains("campus_admin"));
    }

    #[test]
    fn test_campus_bound_roles() {
        assert!(!UserRole::SuperAdmin.is_campus_bound());
        assert!(!UserRole::TenantAdmin.is_campus_bound());
        assert!(UserRole::CampusAdmin.is_campus_bound());
        assert!(UserRole::Teacher.is_campus_bound());
        assert!(UserRole::Staff.is_campus_bound());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let now = chrono::Utc::now();
        let user = User {
            id: 1,
            tenant_id: Some(2),
            campus_id: None,
            username: "head_admin".to_string(),
            email: "head@school.test".to_string(),
            password_hash: "secret-hash".to_string(),
            role: UserRole::TenantAdmin,
            status: UserStatus::Active,
            display_name: None,
            job_title: None,
            phone: None,
            last_login: None,
            created_at: now,
            updated_at: now,
            created_by: None,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(json.contains("\"role\":\"tenant_admin\""));
    }
}
