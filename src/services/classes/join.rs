use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ClassService;
use crate::models::classes::entities::ClassMemberRole;
use crate::models::classes::requests::JoinClassRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{current_user, storage_error};
use crate::services::respond_on_err;

pub async fn join_class(
    service: &ClassService,
    request: &HttpRequest,
    join_data: JoinClassRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = respond_on_err!(current_user(request));

    let class = match storage.get_class_by_code(join_data.invite_code.trim()).await {
        Ok(Some(class)) => class,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ClassInviteCodeInvalid,
                "Invite code is invalid",
            )));
        }
        Err(e) => return Ok(storage_error(e)),
    };

    match storage.get_class_member(class.id, user.id).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::ClassAlreadyJoined,
                "You have already joined this class",
            )));
        }
        Ok(None) => {}
        Err(e) => return Ok(storage_error(e)),
    }

    match storage
        .join_class(user.id, class.id, ClassMemberRole::Student)
        .await
    {
        Ok(member) => {
            info!("User {} joined class {}", user.id, class.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(member, "Joined class")))
        }
        Err(e) => Ok(storage_error(e)),
    }
}
