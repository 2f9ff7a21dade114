use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::users::entities::UserRole;
use crate::models::users::requests::{CreateUserRequest, RegisterRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::respond_on_err;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::validate::{
    validate_email, validate_password, validate_student_code, validate_username,
};

use super::AuthService;

pub async fn handle_register(
    service: &AuthService,
    register_request: RegisterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let username = register_request.username.trim().to_string();
    let email = register_request.email.trim().to_lowercase();
    let student_code = register_request
        .student_code
        .map(|code| code.trim().to_string())
        .filter(|code| !code.is_empty());

    // 1. 格式校验
    if let Err(msg) = validate_username(&username) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserNameInvalid, msg)));
    }
    if let Err(msg) = validate_email(&email) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserEmailInvalid, msg)));
    }
    if let Err(msg) = validate_password(&register_request.password) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserPasswordInvalid, msg)));
    }
    if let Some(code) = &student_code
        && let Err(msg) = validate_student_code(code)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
    }

    // 2. 唯一性检查
    respond_on_err!(check_unique(&storage, &username, &email, student_code.as_deref()).await);

    // 3. 哈希密码
    let password_hash = match hash_password(&register_request.password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("Password hashing failed: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::RegisterFailed,
                    "Register failed, please try again later",
                )),
            );
        }
    };

    // 4. 创建用户，自助注册一律为学生
    let create_request = CreateUserRequest {
        username,
        email,
        password: password_hash,
        role: UserRole::Student,
        display_name: register_request
            .display_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty()),
        student_code,
    };

    match storage.create_user(create_request).await {
        Ok(user) => {
            tracing::info!("User {} registered", user.username);
            Ok(HttpResponse::Created().json(ApiResponse::success(user, "Register successful")))
        }
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

async fn check_unique(
    storage: &Arc<dyn Storage>,
    username: &str,
    email: &str,
    student_code: Option<&str>,
) -> Result<(), HttpResponse> {
    let conflict = |code: ErrorCode, msg: &str| {
        HttpResponse::Conflict().json(ApiResponse::error_empty(code, msg))
    };

    match storage.get_user_by_username(username).await {
        Ok(Some(_)) => {
            return Err(conflict(
                ErrorCode::UserNameAlreadyExists,
                "Username already exists",
            ));
        }
        Ok(None) => {}
        Err(e) => return Err(ApiResponse::from_error(&e)),
    }

    match storage.get_user_by_email(email).await {
        Ok(Some(_)) => {
            return Err(conflict(
                ErrorCode::UserEmailAlreadyExists,
                "Email already exists",
            ));
        }
        Ok(None) => {}
        Err(e) => return Err(ApiResponse::from_error(&e)),
    }

    if let Some(code) = student_code {
        match storage.get_user_by_student_code(code).await {
            Ok(Some(_)) => {
                return Err(conflict(
                    ErrorCode::UserStudentCodeAlreadyExists,
                    "Student code already exists",
                ));
            }
            Ok(None) => {}
            Err(e) => return Err(ApiResponse::from_error(&e)),
        }
    }

    Ok(())
}
