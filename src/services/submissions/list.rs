use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::models::ApiResponse;
use crate::models::submissions::responses::{SubmissionListResponse, SubmissionWithStudent};
use crate::models::users::entities::UserBrief;
use crate::services::access::{
    current_user, load_assessment, load_class, require_class_manager, storage_error,
};
use crate::services::respond_on_err;

pub async fn list_for_assessment(
    service: &SubmissionService,
    request: &HttpRequest,
    assessment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = respond_on_err!(current_user(request));
    let assessment = respond_on_err!(load_assessment(&storage, assessment_id).await);
    let class = respond_on_err!(load_class(&storage, assessment.class_id).await);
    respond_on_err!(require_class_manager(&storage, &user, &class).await);

    let submissions = match storage.list_submissions_by_assessments(&[assessment.id]).await {
        Ok(submissions) => submissions,
        Err(e) => return Ok(storage_error(e)),
    };
    let student_ids: Vec<i64> = submissions.iter().map(|s| s.student_id).collect();
    let students: HashMap<i64, UserBrief> = match storage.get_users_by_ids(&student_ids).await {
        Ok(users) => users.iter().map(|u| (u.id, UserBrief::from(u))).collect(),
        Err(e) => return Ok(storage_error(e)),
    };

    // 提交随学生账号级联删除
    let items = submissions
        .into_iter()
        .filter_map(|submission| {
            let student = students.get(&submission.student_id)?.clone();
            Some(SubmissionWithStudent {
                submission,
                student,
            })
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SubmissionListResponse { items },
        "Submissions retrieved successfully",
    )))
}
