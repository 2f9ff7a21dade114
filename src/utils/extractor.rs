//! 路径参数提取器：非法 ID 直接返回统一格式的 400 响应

use std::future::{Ready, ready};

use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::{FromRequest, HttpRequest, HttpResponse};

use crate::models::{ApiResponse, ErrorCode};

fn parse_positive_id(req: &HttpRequest, param: &str) -> Result<i64, actix_web::Error> {
    let raw = req.match_info().get(param).unwrap_or_default();
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => {
            let message = format!("Invalid path parameter '{param}': {raw}");
            let response = HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
            Err(InternalError::from_response(message, response).into())
        }
    }
}

macro_rules! define_safe_i64_extractor {
    ($(#[$meta:meta])* $name:ident, $param:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name(pub i64);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                ready(parse_positive_id(req, $param).map($name))
            }
        }
    };
}

define_safe_i64_extractor!(
    /// 路径中的 `{id}`
    SafeIDI64,
    "id"
);
define_safe_i64_extractor!(
    /// 路径中的 `{user_id}`
    SafeUserIdI64,
    "user_id"
);
