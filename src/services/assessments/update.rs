use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AssessmentService, build_detail};
use crate::models::assessments::requests::{AssessmentChanges, UpdateAssessmentRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{
    ClassAccess, current_user, load_assessment, require_assessment_owner, storage_error,
};
use crate::services::respond_on_err;
use crate::utils::validate::{validate_name, validate_questions};

pub async fn update_assessment(
    service: &AssessmentService,
    request: &HttpRequest,
    assessment_id: i64,
    update_data: UpdateAssessmentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = respond_on_err!(current_user(request));
    let assessment = respond_on_err!(load_assessment(&storage, assessment_id).await);
    respond_on_err!(require_assessment_owner(&user, &assessment));

    let invalid = |msg: String| {
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::AssessmentInvalid, msg))
    };

    let mut changes = AssessmentChanges {
        due_at: update_data.due_at,
        ..Default::default()
    };
    if let Some(name) = &update_data.name {
        changes.name = Some(match validate_name("Name", name) {
            Ok(name) => name,
            Err(msg) => return Ok(invalid(msg)),
        });
    }
    if let Some(subject) = &update_data.subject {
        changes.subject = Some(match validate_name("Subject", subject) {
            Ok(subject) => subject,
            Err(msg) => return Ok(invalid(msg)),
        });
    }

    // 已有提交时题目不可替换，否则已有得分失去意义
    if let Some(inputs) = &update_data.questions {
        match storage.count_submissions_by_assessment(assessment.id).await {
            Ok(0) => {}
            Ok(_) => {
                return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                    ErrorCode::AssessmentLocked,
                    "Questions cannot be changed after students have submitted",
                )));
            }
            Err(e) => return Ok(storage_error(e)),
        }
        changes.questions = Some(match validate_questions(inputs) {
            Ok(questions) => questions,
            Err(msg) => return Ok(invalid(msg)),
        });
    }

    let updated = match storage.update_assessment(assessment.id, changes).await {
        Ok(Some(updated)) => updated,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AssessmentNotFound,
                "Assessment not found",
            )));
        }
        Err(e) => return Ok(storage_error(e)),
    };

    info!("Assessment {} updated by {}", updated.id, user.id);

    let calendar = service.calendar();
    match build_detail(&storage, &calendar, &user, updated, ClassAccess::Manager).await {
        Ok(detail) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            detail,
            "Assessment updated successfully",
        ))),
        Err(e) => Ok(storage_error(e)),
    }
}
