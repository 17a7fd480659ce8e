use actix_web::cookie::{Cookie, SameSite};
use chrono::{TimeDelta, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;

pub const REFRESH_COOKIE_NAME: &str = "refresh_token";

const ACCESS: &str = "access";
const REFRESH: &str = "refresh";

// JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // 用户 ID
    pub role: String,       // 签发时的角色
    pub token_type: String, // "access" | "refresh"
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// refresh token 有效期（秒），同时用作 cookie 的 max-age
    pub refresh_expires_in: i64,
}

pub struct JwtUtils;

impl JwtUtils {
    fn secret() -> &'static str {
        &AppConfig::get().jwt.secret
    }

    /// access token 有效期（秒）
    pub fn access_token_ttl() -> i64 {
        AppConfig::get().jwt.access_token_expiry
    }

    /// refresh token 有效期（秒），记住我时使用更长的期限
    pub fn refresh_token_ttl(remember_me: bool) -> i64 {
        let jwt = &AppConfig::get().jwt;
        if remember_me {
            jwt.refresh_token_remember_me_expiry
        } else {
            jwt.refresh_token_expiry
        }
    }

    pub fn generate_access_token(
        user_id: i64,
        role: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        Self::sign(
            Self::secret(),
            user_id,
            role,
            ACCESS,
            TimeDelta::seconds(Self::access_token_ttl()),
        )
    }

    pub fn generate_refresh_token(
        user_id: i64,
        role: &str,
        ttl_secs: i64,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        Self::sign(
            Self::secret(),
            user_id,
            role,
            REFRESH,
            TimeDelta::seconds(ttl_secs),
        )
    }

    pub fn generate_token_pair(
        user_id: i64,
        role: &str,
        remember_me: bool,
    ) -> Result<TokenPair, jsonwebtoken::errors::Error> {
        let refresh_expires_in = Self::refresh_token_ttl(remember_me);
        Ok(TokenPair {
            access_token: Self::generate_access_token(user_id, role)?,
            refresh_token: Self::generate_refresh_token(user_id, role, refresh_expires_in)?,
            refresh_expires_in,
        })
    }

    fn sign(
        secret: &str,
        user_id: i64,
        role: &str,
        token_type: &str,
        ttl: TimeDelta,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            token_type: token_type.to_string(),
            exp: (now + ttl).timestamp() as usize,
            iat: now.timestamp() as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    fn verify(
        secret: &str,
        token: &str,
        expected_type: &str,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?
        .claims;
        if claims.token_type != expected_type {
            return Err(jsonwebtoken::errors::ErrorKind::InvalidToken.into());
        }
        Ok(claims)
    }

    pub fn verify_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify(Self::secret(), token, ACCESS)
    }

    pub fn verify_refresh_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify(Self::secret(), token, REFRESH)
    }

    /// 创建 Refresh Token Cookie，`max_age_secs` 与 token 有效期一致
    pub fn create_refresh_token_cookie(refresh_token: &str, max_age_secs: i64) -> Cookie<'static> {
        Cookie::build(REFRESH_COOKIE_NAME, refresh_token.to_string())
            .path("/api/v1/auth")
            .max_age(actix_web::cookie::time::Duration::seconds(max_age_secs))
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(AppConfig::get().is_production())
            .finish()
    }

    /// 创建空的 Refresh Token Cookie（用于注销）
    pub fn create_empty_refresh_token_cookie() -> Cookie<'static> {
        Self::create_refresh_token_cookie("", 0)
    }

    pub fn extract_refresh_token_from_cookie(req: &actix_web::HttpRequest) -> Option<String> {
        req.cookie(REFRESH_COOKIE_NAME)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret-unit-test-secret";

    #[test]
    fn test_sign_and_verify() {
        let token =
            JwtUtils::sign(SECRET, 42, "teacher", ACCESS, TimeDelta::seconds(60)).unwrap();
        let claims = JwtUtils::verify(SECRET, &token, ACCESS).unwrap();
        assert_eq!(claims.user_id(), Some(42));
        assert_eq!(claims.role, "teacher");
    }

    #[test]
    fn test_token_type_is_enforced() {
        let refresh =
            JwtUtils::sign(SECRET, 7, "staff", REFRESH, TimeDelta::seconds(60)).unwrap();
        assert!(JwtUtils::verify(SECRET, &refresh, ACCESS).is_err());
        assert!(JwtUtils::verify(SECRET, &refresh, REFRESH).is_ok());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = JwtUtils::sign(SECRET, 1, "staff", ACCESS, TimeDelta::seconds(60)).unwrap();
        assert!(JwtUtils::verify("another-secret", &token, ACCESS).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        // 默认校验允许 60 秒的时钟偏差
        let token =
            JwtUtils::sign(SECRET, 1, "staff", ACCESS, TimeDelta::seconds(-120)).unwrap();
        assert!(JwtUtils::verify(SECRET, &token, ACCESS).is_err());
    }
}
