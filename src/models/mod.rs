pub mod assessments;
pub mod auth;
pub mod classes;
pub mod common;
pub mod dashboards;
pub mod reports;
pub mod submissions;
pub mod users;

pub use common::{ApiResponse, ErrorCode, PaginationInfo, PaginationQuery};

/// 进程启动时间，注册为 app_data
#[derive(Debug, Clone, Copy)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
