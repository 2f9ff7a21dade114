use std::collections::HashSet;
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ReportService;
use crate::analytics::{
    SchoolCalendar, ScoreSummary, StatusCounts, classify, difficulty_breakdown, question_stats,
    score_distribution,
};
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::assessments::entities::Assessment;
use crate::models::reports::responses::AssessmentReport;
use crate::models::submissions::entities::Submission;
use crate::models::users::entities::UserBrief;
use crate::services::access::{
    current_user, load_assessment, load_class, require_class_manager, storage_error,
};
use crate::services::respond_on_err;
use crate::storage::Storage;

pub async fn handle_assessment_report(
    service: &ReportService,
    request: &HttpRequest,
    assessment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = respond_on_err!(current_user(request));
    let assessment = respond_on_err!(load_assessment(&storage, assessment_id).await);
    let class = respond_on_err!(load_class(&storage, assessment.class_id).await);
    respond_on_err!(require_class_manager(&storage, &user, &class).await);

    match build_assessment_report(&storage, &service.calendar(), assessment).await {
        Ok(report) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            report,
            "Assessment report generated",
        ))),
        Err(e) => Ok(storage_error(e)),
    }
}

pub(crate) async fn build_assessment_report(
    storage: &Arc<dyn Storage>,
    calendar: &SchoolCalendar,
    assessment: Assessment,
) -> Result<AssessmentReport> {
    let today = calendar.today();
    let due_date = calendar.date_of(assessment.due_at);
    let questions = storage.list_questions(assessment.id).await?;
    let students = storage.list_class_students(assessment.class_id).await?;
    let roster: HashSet<i64> = students.iter().map(|s| s.id).collect();

    // 已退出班级的学生不计入
    let submissions: Vec<Submission> = storage
        .list_submissions_by_assessments(&[assessment.id])
        .await?
        .into_iter()
        .filter(|s| roster.contains(&s.student_id))
        .collect();
    let submitted: HashSet<i64> = submissions.iter().map(|s| s.student_id).collect();
    let scores: Vec<f64> = submissions.iter().map(|s| s.score).collect();

    let counts: StatusCounts = students
        .iter()
        .map(|s| classify(due_date, submitted.contains(&s.id), today))
        .collect();
    let stats = question_stats(&questions, &submissions);

    Ok(AssessmentReport {
        due_date,
        student_count: students.len() as i64,
        submitted_count: submissions.len() as i64,
        reviewed_count: submissions.iter().filter(|s| s.is_reviewed()).count() as i64,
        late_count: submissions.iter().filter(|s| s.is_late).count() as i64,
        counts,
        score: ScoreSummary::from_scores(&scores),
        distribution: score_distribution(&scores),
        difficulties: difficulty_breakdown(&stats),
        questions: stats,
        missing_students: students
            .iter()
            .filter(|s| !submitted.contains(&s.id))
            .map(UserBrief::from)
            .collect(),
        assessment,
    })
}
