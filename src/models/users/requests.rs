use super::entities::UserRole;
use serde::Deserialize;
use ts_rs::TS;

// 注册请求（来自HTTP请求，始终以学生身份注册）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
    pub student_code: Option<String>,
}

// 用户创建请求（存储层，password 已哈希）
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub display_name: Option<String>,
    pub student_code: Option<String>,
}
