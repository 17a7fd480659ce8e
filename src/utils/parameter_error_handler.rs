//! JSON 与查询参数反序列化失败时，返回统一的 `ApiResponse` 错误体

use actix_web::{
    Error, HttpRequest, HttpResponse,
    error::{InternalError, JsonPayloadError, QueryPayloadError},
};
use tracing::debug;

use crate::models::{ApiResponse, ErrorCode};

pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> Error {
    debug!("Rejected JSON body for {}: {}", req.path(), err);
    let (response, message) = match &err {
        JsonPayloadError::ContentType => (
            HttpResponse::UnsupportedMediaType(),
            "Content-Type must be application/json".to_string(),
        ),
        JsonPayloadError::Overflow { limit } | JsonPayloadError::OverflowKnownLength { limit, .. } => (
            HttpResponse::PayloadTooLarge(),
            format!("Request body exceeds the limit of {limit} bytes"),
        ),
        JsonPayloadError::Deserialize(e) => {
            (HttpResponse::BadRequest(), format!("Invalid request body: {e}"))
        }
        _ => (HttpResponse::BadRequest(), format!("Invalid request body: {err}")),
    };
    to_error(err, response, message)
}

pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> Error {
    debug!("Rejected query string for {}: {}", req.path(), err);
    let message = match &err {
        QueryPayloadError::Deserialize(e) => format!("Invalid query parameters: {e}"),
        _ => format!("Invalid query parameters: {err}"),
    };
    to_error(err, HttpResponse::BadRequest(), message)
}

fn to_error<E>(err: E, mut response: actix_web::HttpResponseBuilder, message: String) -> Error
where
    E: std::fmt::Debug + std::fmt::Display + 'static,
{
    InternalError::from_response(
        err,
        response.json(ApiResponse::error_empty(ErrorCode::BadRequest, message)),
    )
    .into()
}
