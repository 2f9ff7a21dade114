use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::models::ApiResponse;
use crate::models::classes::responses::ClassDetail;
use crate::models::users::entities::UserBrief;
use crate::services::access::{current_user, load_class, require_class_viewer, storage_error};
use crate::services::respond_on_err;

pub async fn get_class(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = respond_on_err!(current_user(request));
    let class = respond_on_err!(load_class(&storage, class_id).await);
    respond_on_err!(require_class_viewer(&storage, &user, &class).await);

    let student_count = match storage.count_class_students(class.id).await {
        Ok(count) => count,
        Err(e) => return Ok(storage_error(e)),
    };
    let teacher = match storage.get_user_by_id(class.teacher_id).await {
        Ok(teacher) => teacher.as_ref().map(UserBrief::from),
        Err(e) => return Ok(storage_error(e)),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ClassDetail {
            class,
            student_count,
            teacher,
        },
        "Class retrieved successfully",
    )))
}
