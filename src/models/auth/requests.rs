use serde::Deserialize;

/// 登录请求，`identifier` 可以是用户名或邮箱
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(alias = "username", alias = "email")]
    pub identifier: String,
    pub password: String,
    /// 延长 refresh token 有效期
    #[serde(default)]
    pub remember_me: bool,
}

impl LoginRequest {
    /// 邮箱不区分大小写，用户名原样保留
    pub fn normalized_identifier(&self) -> String {
        let trimmed = self.identifier.trim();
        if trimmed.contains('@') {
            trimmed.to_lowercase()
        } else {
            trimmed.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_username_or_email_field() {
        let by_name: LoginRequest =
            serde_json::from_str(r#"{"username":"admin","password":"x"}"#).unwrap();
        assert_eq!(by_name.normalized_identifier(), "admin");
        assert!(!by_name.remember_me);

        let by_email: LoginRequest =
            serde_json::from_str(r#"{"email":" Head@School.EDU ","password":"x","remember_me":true}"#)
                .unwrap();
        assert_eq!(by_email.normalized_identifier(), "head@school.edu");
        assert!(by_email.remember_me);
    }
}
