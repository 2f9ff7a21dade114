use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use chrono::Utc;
use tracing::info;

use super::SubmissionService;
use crate::analytics::grade_answers;
use crate::models::assessments::entities::AssessmentKind;
use crate::models::submissions::requests::{NewSubmission, SubmitAnswersRequest};
use crate::models::submissions::responses::{StudentSubmissionView, SubmitResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{
    current_user, load_assessment, require_class_student, storage_error,
};
use crate::services::respond_on_err;

pub async fn submit_answers(
    service: &SubmissionService,
    request: &HttpRequest,
    assessment_id: i64,
    submit_data: SubmitAnswersRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = respond_on_err!(current_user(request));
    let assessment = respond_on_err!(load_assessment(&storage, assessment_id).await);
    respond_on_err!(require_class_student(&storage, &user, assessment.class_id).await);

    let now = Utc::now();
    let existing = match storage
        .get_submission_by_assessment_and_student(assessment.id, user.id)
        .await
    {
        Ok(existing) => existing,
        Err(e) => return Ok(storage_error(e)),
    };

    if let Some(submission) = &existing
        && submission.is_reviewed()
    {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::SubmissionAlreadyReviewed,
            "Submission has already been reviewed",
        )));
    }

    if assessment.kind == AssessmentKind::Quiz {
        if existing.is_some() {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::SubmissionAlreadyExists,
                "Quiz can only be submitted once",
            )));
        }
        if now > assessment.due_at {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::SubmissionClosed,
                "Quiz is closed",
            )));
        }
    }

    let questions = match storage.list_questions(assessment.id).await {
        Ok(questions) => questions,
        Err(e) => return Ok(storage_error(e)),
    };
    let graded = match grade_answers(&questions, &submit_data.answers) {
        Ok(graded) => graded,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::SubmissionInvalid,
                e.message(),
            )));
        }
    };

    let new_submission = NewSubmission {
        assessment_id: assessment.id,
        student_id: user.id,
        answers: graded.answers,
        score: graded.score,
        is_late: now > assessment.due_at,
        submitted_at: now,
    };

    // 作业在批改前重交时覆盖原提交
    let saved = match &existing {
        Some(previous) => storage.replace_submission(previous.id, new_submission).await,
        None => storage.create_submission(new_submission).await.map(Some),
    };
    let submission = match saved {
        Ok(Some(submission)) => submission,
        // 检查之后、覆盖之前被批改
        Ok(None) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::SubmissionAlreadyReviewed,
                "Submission has already been reviewed",
            )));
        }
        Err(e) => return Ok(storage_error(e)),
    };
    let status = if existing.is_some() {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };

    info!(
        "Student {} submitted assessment {} (score {}, late {})",
        user.id, assessment.id, submission.score, submission.is_late
    );

    let answered_count = submission
        .answers
        .iter()
        .filter(|a| a.selected_option.is_some())
        .count() as i32;

    Ok(HttpResponse::build(status).json(ApiResponse::success(
        SubmitResponse {
            submission: StudentSubmissionView::new(submission, assessment.kind),
            question_count: assessment.question_count,
            answered_count,
        },
        "Submitted successfully",
    )))
}
