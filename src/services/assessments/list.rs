use std::collections::HashMap;
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssessmentService;
use crate::analytics::{SchoolCalendar, classify};
use crate::errors::Result;
use crate::models::assessments::entities::Assessment;
use crate::models::assessments::requests::{AssessmentListParams, AssessmentListQuery};
use crate::models::assessments::responses::{AssessmentListItem, AssessmentListResponse};
use crate::models::submissions::entities::Submission;
use crate::models::users::entities::{User, UserRole};
use crate::models::ApiResponse;
use crate::services::access::{current_user, storage_error};
use crate::services::respond_on_err;
use crate::storage::Storage;

pub async fn list_assessments(
    service: &AssessmentService,
    request: &HttpRequest,
    params: AssessmentListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = respond_on_err!(current_user(request));
    let calendar = service.calendar();

    match build_list(&storage, &calendar, &user, params).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Assessment list retrieved successfully",
        ))),
        Err(e) => Ok(storage_error(e)),
    }
}

async fn build_list(
    storage: &Arc<dyn Storage>,
    calendar: &SchoolCalendar,
    user: &User,
    params: AssessmentListParams,
) -> Result<AssessmentListResponse> {
    let (page, size) = params.pagination.normalized();

    // 管理员不限班级，其他人只看自己所在班级
    let class_ids = if user.is_admin() {
        params.class_id.map(|id| vec![id])
    } else {
        let mut ids = storage.list_class_ids_for_user(user.id).await?;
        if let Some(class_id) = params.class_id {
            ids.retain(|id| *id == class_id);
        }
        Some(ids)
    };

    let page = storage
        .list_assessments_with_pagination(AssessmentListQuery {
            page,
            size,
            class_ids,
            kind: params.kind,
            subject: params.subject,
            search: params.search,
        })
        .await?;

    let items = if user.role == UserRole::Student {
        annotate_for_student(storage, calendar, user, page.items).await?
    } else {
        annotate_for_teacher(storage, calendar, page.items).await?
    };

    Ok(AssessmentListResponse {
        items,
        pagination: page.pagination,
    })
}

async fn annotate_for_student(
    storage: &Arc<dyn Storage>,
    calendar: &SchoolCalendar,
    user: &User,
    assessments: Vec<Assessment>,
) -> Result<Vec<AssessmentListItem>> {
    let today = calendar.today();
    let submissions: HashMap<i64, Submission> = storage
        .list_submissions_by_student(user.id)
        .await?
        .into_iter()
        .map(|s| (s.assessment_id, s))
        .collect();

    Ok(assessments
        .into_iter()
        .map(|assessment| {
            let due_date = calendar.date_of(assessment.due_at);
            let submission = submissions.get(&assessment.id);
            AssessmentListItem {
                status: Some(classify(due_date, submission.is_some(), today)),
                score: submission.and_then(|s| s.released_score(assessment.kind)),
                submitted_count: None,
                student_count: None,
                due_date,
                assessment,
            }
        })
        .collect())
}

async fn annotate_for_teacher(
    storage: &Arc<dyn Storage>,
    calendar: &SchoolCalendar,
    assessments: Vec<Assessment>,
) -> Result<Vec<AssessmentListItem>> {
    let ids: Vec<i64> = assessments.iter().map(|a| a.id).collect();
    let mut submitted: HashMap<i64, i64> = HashMap::new();
    for submission in storage.list_submissions_by_assessments(&ids).await? {
        *submitted.entry(submission.assessment_id).or_default() += 1;
    }

    let mut class_sizes: HashMap<i64, i64> = HashMap::new();
    let mut items = Vec::with_capacity(assessments.len());
    for assessment in assessments {
        let student_count = match class_sizes.get(&assessment.class_id) {
            Some(count) => *count,
            None => {
                let count = storage.count_class_students(assessment.class_id).await?;
                class_sizes.insert(assessment.class_id, count);
                count
            }
        };
        items.push(AssessmentListItem {
            due_date: calendar.date_of(assessment.due_at),
            status: None,
            score: None,
            submitted_count: Some(submitted.get(&assessment.id).copied().unwrap_or(0)),
            student_count: Some(student_count),
            assessment,
        });
    }
    Ok(items)
}
