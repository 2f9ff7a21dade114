use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::models::submissions::responses::{StudentSubmissionView, SubmissionWithStudent};
use crate::models::users::entities::UserBrief;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{
    current_user, load_assessment, load_class, load_submission, require_class_manager,
    storage_error,
};
use crate::services::respond_on_err;

pub async fn get_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = respond_on_err!(current_user(request));
    let submission = respond_on_err!(load_submission(&storage, submission_id).await);

    let assessment = respond_on_err!(load_assessment(&storage, submission.assessment_id).await);

    // 本人看到的是学生视角
    if submission.student_id == user.id {
        return Ok(HttpResponse::Ok().json(ApiResponse::success(
            StudentSubmissionView::new(submission, assessment.kind),
            "Submission retrieved successfully",
        )));
    }

    // 本人之外只有任教教师和管理员可以查看
    let class = respond_on_err!(load_class(&storage, assessment.class_id).await);
    respond_on_err!(require_class_manager(&storage, &user, &class).await);

    let student = match storage.get_user_by_id(submission.student_id).await {
        Ok(Some(student)) => UserBrief::from(&student),
        Ok(None) => {
            return Ok(HttpResponse::NotFound()
                .json(ApiResponse::error_empty(ErrorCode::UserNotFound, "Student not found")));
        }
        Err(e) => return Ok(storage_error(e)),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SubmissionWithStudent {
            submission,
            student,
        },
        "Submission retrieved successfully",
    )))
}
