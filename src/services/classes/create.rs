use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::ClassService;
use crate::models::classes::entities::ClassMemberRole;
use crate::models::classes::requests::CreateClassRequest;
use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{current_user, storage_error};
use crate::services::respond_on_err;
use crate::storage::Storage;
use crate::utils::validate::validate_name;

pub async fn create_class(
    service: &ClassService,
    request: &HttpRequest,
    class_data: CreateClassRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = respond_on_err!(current_user(request));

    let name = match validate_name("Class name", &class_data.name) {
        Ok(name) => name,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
        }
    };

    // 权限校验并确定负责教师
    let teacher_id =
        respond_on_err!(resolve_teacher(&user, class_data.teacher_id, &storage).await);

    match storage.get_class_by_name(&name).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::ClassAlreadyExists,
                "Class name already exists",
            )));
        }
        Ok(None) => {}
        Err(e) => return Ok(storage_error(e)),
    }

    let class = match storage
        .create_class(CreateClassRequest {
            teacher_id: Some(teacher_id),
            name,
            description: class_data
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
        })
        .await
    {
        Ok(class) => class,
        Err(e) => return Ok(storage_error(e)),
    };

    // 负责教师同时作为班级成员
    if let Err(e) = storage
        .join_class(teacher_id, class.id, ClassMemberRole::Teacher)
        .await
    {
        warn!("Failed to add teacher {} to class {}: {}", teacher_id, class.id, e);
    }

    info!("Class {} created by {}", class.name, user.id);
    Ok(HttpResponse::Created().json(ApiResponse::success(class, "Class created successfully")))
}

/// 教师只能为自己建班；管理员可以指定教师，缺省为自己
async fn resolve_teacher(
    user: &User,
    requested: Option<i64>,
    storage: &Arc<dyn Storage>,
) -> Result<i64, HttpResponse> {
    match user.role {
        UserRole::Admin => {
            let Some(teacher_id) = requested.filter(|id| *id != user.id) else {
                return Ok(user.id);
            };
            match storage.get_user_by_id(teacher_id).await {
                Ok(Some(teacher)) if teacher.role == UserRole::Teacher => Ok(teacher.id),
                Ok(Some(_)) => Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::ClassPermissionDenied,
                    "Admin can only create classes for teachers",
                ))),
                Ok(None) => Err(HttpResponse::NotFound()
                    .json(ApiResponse::error_empty(ErrorCode::UserNotFound, "User not found"))),
                Err(e) => Err(storage_error(e)),
            }
        }
        UserRole::Teacher => match requested {
            Some(id) if id != user.id => Err(HttpResponse::Forbidden().json(
                ApiResponse::error_empty(
                    ErrorCode::ClassPermissionDenied,
                    "You do not have permission to create a class for another teacher",
                ),
            )),
            _ => Ok(user.id),
        },
        UserRole::Student => Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::ClassPermissionDenied,
            "You do not have permission to create a class",
        ))),
    }
}
