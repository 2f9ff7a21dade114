use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ReportService;
use crate::analytics::{
    DerivedStatus, SchoolCalendar, ScoreSummary, StatusCounts, SubjectEntry, classify,
    subject_breakdown, weekly_buckets,
};
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::classes::entities::Class;
use crate::models::reports::responses::{ClassReport, StudentProgressRow};
use crate::models::submissions::entities::Submission;
use crate::models::users::entities::UserBrief;
use crate::services::access::{current_user, load_class, require_class_manager, storage_error};
use crate::services::respond_on_err;
use crate::storage::Storage;

pub async fn handle_class_report(
    service: &ReportService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = respond_on_err!(current_user(request));
    let class = respond_on_err!(load_class(&storage, class_id).await);
    respond_on_err!(require_class_manager(&storage, &user, &class).await);

    match build_class_report(&storage, &service.calendar(), class).await {
        Ok(report) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            report,
            "Class report generated",
        ))),
        Err(e) => Ok(storage_error(e)),
    }
}

pub(crate) async fn build_class_report(
    storage: &Arc<dyn Storage>,
    calendar: &SchoolCalendar,
    class: Class,
) -> Result<ClassReport> {
    let today = calendar.today();
    let assessments = storage.list_assessments_by_classes(&[class.id]).await?;
    let students = storage.list_class_students(class.id).await?;
    let roster: HashSet<i64> = students.iter().map(|s| s.id).collect();

    let ids: Vec<i64> = assessments.iter().map(|a| a.id).collect();
    let submissions: Vec<Submission> = storage
        .list_submissions_by_assessments(&ids)
        .await?
        .into_iter()
        .filter(|s| roster.contains(&s.student_id))
        .collect();
    let by_pair: HashMap<(i64, i64), &Submission> = submissions
        .iter()
        .map(|s| ((s.assessment_id, s.student_id), s))
        .collect();

    // 学生 × 测评 的全部组合
    let mut entries: Vec<SubjectEntry<'_>> = Vec::with_capacity(students.len() * assessments.len());
    let mut rows = Vec::with_capacity(students.len());
    for student in &students {
        let mut statuses: Vec<DerivedStatus> = Vec::with_capacity(assessments.len());
        let mut scores = Vec::new();
        for assessment in &assessments {
            let submission = by_pair.get(&(assessment.id, student.id));
            let status = classify(
                calendar.date_of(assessment.due_at),
                submission.is_some(),
                today,
            );
            statuses.push(status);
            if let Some(s) = submission {
                scores.push(s.score);
            }
            entries.push(SubjectEntry {
                subject: &assessment.subject,
                status,
                score: submission.map(|s| s.score),
            });
        }
        rows.push(StudentProgressRow {
            student: UserBrief::from(student),
            counts: statuses.into_iter().collect(),
            average_score: ScoreSummary::from_scores(&scores).map(|s| s.average),
        });
    }

    let counts: StatusCounts = entries.iter().map(|e| e.status).collect();
    let subjects = subject_breakdown(entries);
    let weekly_submissions =
        weekly_buckets(submissions.iter().map(|s| calendar.date_of(s.submitted_at)));

    Ok(ClassReport {
        today,
        assessment_count: assessments.len() as i64,
        counts,
        students: rows,
        subjects,
        weekly_submissions,
        class,
    })
}
