use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use tracing::info;

use super::SubmissionService;
use crate::analytics::{apply_overrides, rescore};
use crate::models::submissions::requests::{ReviewSubmissionRequest, SubmissionReview};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{
    current_user, load_assessment, load_class, load_submission, require_class_manager,
    storage_error,
};
use crate::services::respond_on_err;

pub async fn review_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: i64,
    review_data: ReviewSubmissionRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = respond_on_err!(current_user(request));
    let submission = respond_on_err!(load_submission(&storage, submission_id).await);
    let assessment = respond_on_err!(load_assessment(&storage, submission.assessment_id).await);
    let class = respond_on_err!(load_class(&storage, assessment.class_id).await);
    respond_on_err!(require_class_manager(&storage, &user, &class).await);

    let mut answers = submission.answers;
    if let Err(e) = apply_overrides(&mut answers, &review_data.rates, assessment.question_count) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::SubmissionInvalid,
            e.message(),
        )));
    }
    let score = rescore(&answers, assessment.question_count);

    let review = SubmissionReview {
        answers,
        score,
        feedback: review_data
            .feedback
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty()),
        reviewed_by: user.id,
        reviewed_at: Utc::now(),
    };

    match storage.review_submission(submission.id, review).await {
        Ok(Some(reviewed)) => {
            info!(
                "Submission {} reviewed by {} (score {})",
                reviewed.id, user.id, reviewed.score
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(reviewed, "Submission reviewed")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SubmissionNotFound,
            "Submission not found",
        ))),
        Err(e) => Ok(storage_error(e)),
    }
}
