use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssessmentService, build_detail};
use crate::models::assessments::entities::Assessment;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{
    current_user, load_assessment, load_class, require_class_viewer, storage_error,
};
use crate::services::respond_on_err;

pub async fn get_assessment(
    service: &AssessmentService,
    request: &HttpRequest,
    assessment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let assessment = respond_on_err!(load_assessment(&storage, assessment_id).await);
    respond_detail(service, request, assessment).await
}

pub async fn get_assessment_by_code(
    service: &AssessmentService,
    request: &HttpRequest,
    code: String,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let assessment = match storage
        .get_assessment_by_code(&code.trim().to_uppercase())
        .await
    {
        Ok(Some(assessment)) => assessment,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AssessmentNotFound,
                "Assessment not found",
            )));
        }
        Err(e) => return Ok(storage_error(e)),
    };
    respond_detail(service, request, assessment).await
}

async fn respond_detail(
    service: &AssessmentService,
    request: &HttpRequest,
    assessment: Assessment,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = respond_on_err!(current_user(request));
    let class = respond_on_err!(load_class(&storage, assessment.class_id).await);
    let access = respond_on_err!(require_class_viewer(&storage, &user, &class).await);

    let calendar = service.calendar();
    match build_detail(&storage, &calendar, &user, assessment, access).await {
        Ok(detail) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            detail,
            "Assessment retrieved successfully",
        ))),
        Err(e) => Ok(storage_error(e)),
    }
}
