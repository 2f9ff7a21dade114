use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::SchoolHubError;
use crate::models::ErrorCode;

// 统一的API响应结构
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub struct ApiResponse<T: TS> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: TS> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error(code: ErrorCode, data: T, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    /// 将存储 / 业务层错误映射为 HTTP 响应
    pub fn from_error(err: &SchoolHubError) -> HttpResponse {
        let (status, code) = err.http_status();

        if status.is_server_error() {
            tracing::error!("{err}");
        }

        HttpResponse::build(status).json(Self::error_empty(code, err.message()))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;

    use super::*;

    #[test]
    fn test_empty_data_is_omitted() {
        let json = serde_json::to_value(ApiResponse::success_empty("ok")).unwrap();
        assert_eq!(json["code"], 0);
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_from_error_status_mapping() {
        let resp = ApiResponse::from_error(&SchoolHubError::validation("题号不存在"));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = ApiResponse::from_error(&SchoolHubError::conflict("重复提交"));
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let resp = ApiResponse::from_error(&SchoolHubError::database_operation("boom"));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
