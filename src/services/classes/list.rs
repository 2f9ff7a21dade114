use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::models::ApiResponse;
use crate::models::classes::requests::{ClassListQuery, ClassQueryParams};
use crate::services::access::{current_user, storage_error};
use crate::services::respond_on_err;

pub async fn list_classes(
    service: &ClassService,
    request: &HttpRequest,
    query: ClassQueryParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = respond_on_err!(current_user(request));
    let (page, size) = query.pagination.normalized();

    // 管理员可查全部班级，其余用户只看自己所在的班级
    let list_query = ClassListQuery {
        page,
        size,
        member_id: (!user.is_admin()).then_some(user.id),
        search: query.search.filter(|s| !s.trim().is_empty()),
    };

    match storage.list_classes_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Class list retrieved successfully",
        ))),
        Err(e) => Ok(storage_error(e)),
    }
}
