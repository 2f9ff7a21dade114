use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AssessmentService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{
    current_user, load_assessment, require_assessment_owner, storage_error,
};
use crate::services::respond_on_err;

pub async fn delete_assessment(
    service: &AssessmentService,
    request: &HttpRequest,
    assessment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = respond_on_err!(current_user(request));
    let assessment = respond_on_err!(load_assessment(&storage, assessment_id).await);
    respond_on_err!(require_assessment_owner(&user, &assessment));

    // 提交随测评级联删除
    match storage.delete_assessment(assessment.id).await {
        Ok(true) => {
            info!("Assessment {} deleted by {}", assessment.id, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Assessment deleted")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AssessmentNotFound,
            "Assessment not found",
        ))),
        Err(e) => Ok(storage_error(e)),
    }
}
