pub mod access;
pub mod assessments;
pub mod auth;
pub mod classes;
pub mod dashboards;
pub mod reports;
pub mod submissions;

#[cfg(test)]
pub(crate) mod test_support;

pub use assessments::AssessmentService;
pub use auth::AuthService;
pub use classes::ClassService;
pub use dashboards::DashboardService;
pub use reports::ReportService;
pub use submissions::SubmissionService;

use actix_web::{HttpRequest, Result as ActixResult, web};
use std::sync::Arc;

use crate::storage::Storage;

/// 展开 `Result<T, HttpResponse>`，失败时把响应直接返回给客户端
macro_rules! respond_on_err {
    ($expr:expr) => {
        match $expr {
            Ok(value) => value,
            Err(response) => return Ok(response),
        }
    };
}
pub(crate) use respond_on_err;

/// 从 app_data 中取出存储实例
pub(crate) fn storage_from_request(request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| {
            tracing::error!("Storage not found in app data");
            actix_web::error::ErrorInternalServerError("Storage not found in app data")
        })
}
