//! 路径参数提取器
//!
//! 非法参数直接返回统一的 `ApiResponse` 错误体，而不是 actix 默认的纯文本 404。

use actix_web::{
    FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError,
};
use futures_util::future::{Ready, ready};

use crate::models::settings::entities::KnownSettingKey;
use crate::models::{ApiResponse, ErrorCode};

fn bad_path_param(message: String) -> actix_web::Error {
    InternalError::from_response(
        message.clone(),
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message)),
    )
    .into()
}

/// 解析正整数 ID
pub fn parse_positive_id(raw: Option<&str>, param: &str) -> Result<i64, String> {
    let raw = raw.ok_or_else(|| format!("Missing path parameter '{param}'"))?;
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(format!("Path parameter '{param}' must be a positive integer")),
    }
}

macro_rules! define_safe_id_extractor {
    ($(#[$meta:meta])* $name:ident, $param:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name(pub i64);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                ready(
                    parse_positive_id(req.match_info().get($param), $param)
                        .map($name)
                        .map_err(bad_path_param),
                )
            }
        }
    };
}

define_safe_id_extractor!(
    /// `{id}` 路径参数
    SafeIDI64,
    "id"
);

define_safe_id_extractor!(
    /// `{question_id}` 路径参数
    SafeQuestionIdI64,
    "question_id"
);

/// `{key}` 路径参数，仅接受已知的租户配置键
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafeSettingKey(pub KnownSettingKey);

impl FromRequest for SafeSettingKey {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let key = req.match_info().get("key").unwrap_or_default();
        ready(
            key.parse::<KnownSettingKey>()
                .map(SafeSettingKey)
                .map_err(|_| {
                    InternalError::from_response(
                        format!("Unknown setting key '{key}'"),
                        HttpResponse::BadRequest().json(ApiResponse::error_empty(
                            ErrorCode::SettingKeyInvalid,
                            format!("Unknown setting key '{key}'"),
                        )),
                    )
                    .into()
                }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positive_id() {
        assert_eq!(parse_positive_id(Some("15"), "id"), Ok(15));
        assert!(parse_positive_id(Some("0"), "id").is_err());
        assert!(parse_positive_id(Some("-3"), "id").is_err());
        assert!(parse_positive_id(Some("abc"), "id").is_err());
        assert!(parse_positive_id(None, "id").is_err());
    }
}
