use std::collections::HashMap;
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::DashboardService;
use crate::analytics::{
    DerivedStatus, DueWindow, SchoolCalendar, ScoreSummary, StatusCounts, SubjectEntry, classify,
    days_until, due_within, subject_breakdown,
};
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::assessments::entities::Assessment;
use crate::models::dashboards::responses::{DueItem, RecentResult, StudentDashboard};
use crate::models::submissions::entities::Submission;
use crate::models::users::entities::User;
use crate::services::access::{current_user, storage_error};
use crate::services::respond_on_err;
use crate::storage::Storage;

pub async fn handle_student_dashboard(
    service: &DashboardService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = respond_on_err!(current_user(request));
    let config = service.get_config();

    match build_student_dashboard(
        &storage,
        &service.calendar(),
        &user,
        config.upcoming_days,
        config.recent_limit,
    )
    .await
    {
        Ok(dashboard) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            dashboard,
            "Dashboard retrieved successfully",
        ))),
        Err(e) => Ok(storage_error(e)),
    }
}

pub(crate) fn due_item(
    assessment: &Assessment,
    calendar: &SchoolCalendar,
    upcoming_days: i64,
) -> DueItem {
    let today = calendar.today();
    let due_date = calendar.date_of(assessment.due_at);
    DueItem {
        assessment_id: assessment.id,
        name: assessment.name.clone(),
        subject: assessment.subject.clone(),
        kind: assessment.kind,
        class_id: assessment.class_id,
        due_date,
        days_left: days_until(due_date, today),
        window: DueWindow::bucket(due_date, today, upcoming_days),
    }
}

pub(crate) async fn build_student_dashboard(
    storage: &Arc<dyn Storage>,
    calendar: &SchoolCalendar,
    user: &User,
    upcoming_days: i64,
    recent_limit: usize,
) -> Result<StudentDashboard> {
    let today = calendar.today();
    let class_ids = storage.list_student_class_ids(user.id).await?;
    let assessments = storage.list_assessments_by_classes(&class_ids).await?;
    let submissions = storage.list_submissions_by_student(user.id).await?;
    let by_assessment: HashMap<i64, &Submission> =
        submissions.iter().map(|s| (s.assessment_id, s)).collect();

    let statuses: Vec<(&Assessment, DerivedStatus)> = assessments
        .iter()
        .map(|a| {
            let due_date = calendar.date_of(a.due_at);
            (a, classify(due_date, by_assessment.contains_key(&a.id), today))
        })
        .collect();

    let counts: StatusCounts = statuses.iter().map(|(_, status)| *status).collect();

    let due_soon = statuses
        .iter()
        .filter(|(a, status)| {
            *status == DerivedStatus::Pending
                && due_within(calendar.date_of(a.due_at), today, upcoming_days)
        })
        .map(|(a, _)| due_item(a, calendar, upcoming_days))
        .collect();
    let overdue = statuses
        .iter()
        .filter(|(_, status)| *status == DerivedStatus::Overdue)
        .map(|(a, _)| due_item(a, calendar, upcoming_days))
        .collect();

    // 只统计当前所在班级的测评，且只计已公开的分数
    let own_scores: Vec<f64> = assessments
        .iter()
        .filter_map(|a| by_assessment.get(&a.id)?.released_score(a.kind))
        .collect();

    let assessment_by_id: HashMap<i64, &Assessment> =
        assessments.iter().map(|a| (a.id, a)).collect();
    let mut reviewed: Vec<&Submission> = submissions.iter().filter(|s| s.is_reviewed()).collect();
    reviewed.sort_by(|a, b| b.reviewed_at.cmp(&a.reviewed_at));
    let recent_reviewed = reviewed
        .into_iter()
        .filter_map(|s| {
            let assessment = assessment_by_id.get(&s.assessment_id)?;
            Some(RecentResult {
                submission_id: s.id,
                assessment_id: assessment.id,
                name: assessment.name.clone(),
                subject: assessment.subject.clone(),
                score: s.score,
                feedback: s.feedback.clone(),
                reviewed_at: s.reviewed_at,
            })
        })
        .take(recent_limit)
        .collect();

    let subjects = subject_breakdown(statuses.iter().map(|(a, status)| SubjectEntry {
        subject: &a.subject,
        status: *status,
        score: by_assessment.get(&a.id).and_then(|s| s.released_score(a.kind)),
    }));

    Ok(StudentDashboard {
        today,
        upcoming_days,
        counts,
        score: ScoreSummary::from_scores(&own_scores),
        due_soon,
        overdue,
        recent_reviewed,
        subjects,
    })
}
