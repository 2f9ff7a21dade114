use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::models::ApiResponse;
use crate::models::assessments::entities::Assessment;
use crate::models::submissions::responses::{
    MySubmissionItem, MySubmissionListResponse, StudentSubmissionView,
};
use crate::services::access::{current_user, storage_error};
use crate::services::respond_on_err;

pub async fn list_mine(
    service: &SubmissionService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = respond_on_err!(current_user(request));

    let submissions = match storage.list_submissions_by_student(user.id).await {
        Ok(submissions) => submissions,
        Err(e) => return Ok(storage_error(e)),
    };

    let mut assessments: HashMap<i64, Assessment> = HashMap::new();
    let mut items = Vec::with_capacity(submissions.len());
    for submission in submissions {
        if !assessments.contains_key(&submission.assessment_id) {
            match storage.get_assessment_by_id(submission.assessment_id).await {
                Ok(Some(assessment)) => {
                    assessments.insert(assessment.id, assessment);
                }
                Ok(None) => continue,
                Err(e) => return Ok(storage_error(e)),
            }
        }
        if let Some(assessment) = assessments.get(&submission.assessment_id) {
            items.push(MySubmissionItem {
                assessment_name: assessment.name.clone(),
                subject: assessment.subject.clone(),
                kind: assessment.kind,
                submission: StudentSubmissionView::new(submission, assessment.kind),
            });
        }
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        MySubmissionListResponse { items },
        "Submissions retrieved successfully",
    )))
}
