//! 存储与业务层的错误类型
//!
//! 每个变体声明错误代码、类型名以及对外暴露时的 HTTP 状态和业务码。
//! E1xx 为基础设施错误，统一按 500 返回；E2xx 为调用方可以修正的错误。

use actix_web::http::StatusCode;
use std::fmt;

use crate::models::ErrorCode;

macro_rules! define_schoolhub_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal, $status:ident, $api_code:ident)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum SchoolHubError {
            $($variant(String),)*
        }

        impl SchoolHubError {
            pub fn code(&self) -> &'static str {
                match self {
                    $(SchoolHubError::$variant(_) => $code,)*
                }
            }

            pub fn error_type(&self) -> &'static str {
                match self {
                    $(SchoolHubError::$variant(_) => $type_name,)*
                }
            }

            pub fn message(&self) -> &str {
                match self {
                    $(SchoolHubError::$variant(msg) => msg,)*
                }
            }

            /// 返回给客户端的 HTTP 状态与业务码
            pub fn http_status(&self) -> (StatusCode, ErrorCode) {
                match self {
                    $(SchoolHubError::$variant(_) => (StatusCode::$status, ErrorCode::$api_code),)*
                }
            }
        }

        paste::paste! {
            impl SchoolHubError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        SchoolHubError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_schoolhub_errors! {
    CacheConnection("E101", "Cache Connection Error", INTERNAL_SERVER_ERROR, InternalServerError),
    DatabaseConfig("E102", "Database Configuration Error", INTERNAL_SERVER_ERROR, InternalServerError),
    DatabaseConnection("E103", "Database Connection Error", INTERNAL_SERVER_ERROR, InternalServerError),
    DatabaseOperation("E104", "Database Operation Error", INTERNAL_SERVER_ERROR, InternalServerError),
    Serialization("E105", "Serialization Error", INTERNAL_SERVER_ERROR, InternalServerError),
    Validation("E201", "Validation Error", BAD_REQUEST, BadRequest),
    Conflict("E202", "Conflict Error", CONFLICT, Conflict),
}

impl fmt::Display for SchoolHubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code(), self.error_type(), self.message())
    }
}

impl std::error::Error for SchoolHubError {}

impl From<sea_orm::DbErr> for SchoolHubError {
    fn from(err: sea_orm::DbErr) -> Self {
        SchoolHubError::DatabaseOperation(err.to_string())
    }
}

// 答案与选项以 JSON 文本落库
impl From<serde_json::Error> for SchoolHubError {
    fn from(err: serde_json::Error) -> Self {
        SchoolHubError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SchoolHubError>;
