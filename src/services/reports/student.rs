use std::collections::HashMap;
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ReportService;
use crate::analytics::{
    SchoolCalendar, ScoreSummary, StatusCounts, SubjectEntry, classify, subject_breakdown,
};
use crate::errors::Result;
use crate::models::reports::responses::{StudentAssessmentRow, StudentReport, TrendPoint};
use crate::models::submissions::entities::Submission;
use crate::models::users::entities::{User, UserBrief};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{ClassAccess, class_access, current_user, storage_error};
use crate::services::respond_on_err;
use crate::storage::Storage;

pub async fn handle_student_report(
    service: &ReportService,
    request: &HttpRequest,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = respond_on_err!(current_user(request));

    let student = match storage.get_user_by_id(student_id).await {
        Ok(Some(student)) => student,
        Ok(None) => {
            return Ok(HttpResponse::NotFound()
                .json(ApiResponse::error_empty(ErrorCode::UserNotFound, "User not found")));
        }
        Err(e) => return Ok(storage_error(e)),
    };

    match can_view_student(&storage, &user, &student).await {
        Ok(true) => {}
        Ok(false) => {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::ClassPermissionDenied,
                "You can only view students of your own classes",
            )));
        }
        Err(e) => return Ok(storage_error(e)),
    }

    match build_student_report(&storage, &service.calendar(), &student).await {
        Ok(report) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            report,
            "Student report generated",
        ))),
        Err(e) => Ok(storage_error(e)),
    }
}

/// 本人、管理员，或管理该学生任一班级的教师
async fn can_view_student(
    storage: &Arc<dyn Storage>,
    viewer: &User,
    student: &User,
) -> Result<bool> {
    if viewer.id == student.id || viewer.is_admin() {
        return Ok(true);
    }
    for class_id in storage.list_student_class_ids(student.id).await? {
        let Some(class) = storage.get_class_by_id(class_id).await? else {
            continue;
        };
        if class_access(storage, viewer, &class).await? == ClassAccess::Manager {
            return Ok(true);
        }
    }
    Ok(false)
}

pub(crate) async fn build_student_report(
    storage: &Arc<dyn Storage>,
    calendar: &SchoolCalendar,
    student: &User,
) -> Result<StudentReport> {
    let today = calendar.today();
    let class_ids = storage.list_student_class_ids(student.id).await?;
    let mut assessments = storage.list_assessments_by_classes(&class_ids).await?;
    assessments.sort_by(|a, b| a.due_at.cmp(&b.due_at).then(a.id.cmp(&b.id)));

    let submissions = storage.list_submissions_by_student(student.id).await?;
    let by_assessment: HashMap<i64, &Submission> =
        submissions.iter().map(|s| (s.assessment_id, s)).collect();

    let items: Vec<StudentAssessmentRow> = assessments
        .iter()
        .map(|a| {
            let due_date = calendar.date_of(a.due_at);
            let submission = by_assessment.get(&a.id);
            StudentAssessmentRow {
                assessment_id: a.id,
                name: a.name.clone(),
                subject: a.subject.clone(),
                kind: a.kind,
                due_date,
                status: classify(due_date, submission.is_some(), today),
                // 报告对学生本人可见，只展示已公开的分数
                score: submission.and_then(|s| s.released_score(a.kind)),
                submission_status: submission.map(|s| s.status),
                is_late: submission.map(|s| s.is_late),
            }
        })
        .collect();

    let counts: StatusCounts = items.iter().map(|row| row.status).collect();
    let subjects = subject_breakdown(items.iter().map(|row| SubjectEntry {
        subject: &row.subject,
        status: row.status,
        score: row.score,
    }));
    let trend: Vec<TrendPoint> = items
        .iter()
        .filter_map(|row| {
            Some(TrendPoint {
                assessment_id: row.assessment_id,
                name: row.name.clone(),
                due_date: row.due_date,
                score: row.score?,
            })
        })
        .collect();
    let scores: Vec<f64> = trend.iter().map(|p| p.score).collect();

    Ok(StudentReport {
        student: UserBrief::from(student),
        today,
        counts,
        score: ScoreSummary::from_scores(&scores),
        items,
        subjects,
        trend,
    })
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test, web};
    use chrono::Utc;
    use serde_json::Value;

    use super::*;
    use crate::analytics::DerivedStatus;
    use crate::models::assessments::entities::AssessmentKind;
    use crate::models::submissions::requests::{NewSubmission, SubmissionReview};
    use crate::models::users::entities::UserRole;
    use crate::services::test_support;

    #[tokio::test]
    async fn test_student_report_trend_follows_due_dates() {
        let storage = test_support::storage().await;
        let teacher = test_support::user(&storage, "teacher1", UserRole::Teacher).await;
        let student = test_support::user(&storage, "student1", UserRole::Student).await;
        let class = test_support::class_with_students(&storage, &teacher, "7A", &[&student]).await;

        let later = test_support::assessment(
            &storage, &class, &teacher, AssessmentKind::Quiz, "Later", "Math", -2,
        )
        .await;
        let earlier = test_support::assessment(
            &storage, &class, &teacher, AssessmentKind::Assignment, "Earlier", "Science", -9,
        )
        .await;
        test_support::assessment(
            &storage, &class, &teacher, AssessmentKind::Assignment, "Next", "Science", 4,
        )
        .await;

        let mut submission_ids = Vec::new();
        for (assessment_id, score) in [(later.id, 40.0), (earlier.id, 90.0)] {
            let submission = storage
                .create_submission(NewSubmission {
                    assessment_id,
                    student_id: student.id,
                    answers: vec![],
                    score,
                    is_late: false,
                    submitted_at: Utc::now(),
                })
                .await
                .unwrap();
            submission_ids.push(submission.id);
        }

        let calendar = SchoolCalendar::from_offset_minutes(0);
        // 作业批改前分数不出现在趋势中
        let report = build_student_report(&storage, &calendar, &student).await.unwrap();
        assert_eq!(report.trend.len(), 1);
        assert_eq!(report.items[0].score, None);
        assert_eq!(report.counts.completed, 2);

        storage
            .review_submission(
                submission_ids[1],
                SubmissionReview {
                    answers: vec![],
                    score: 90.0,
                    feedback: None,
                    reviewed_by: teacher.id,
                    reviewed_at: Utc::now(),
                },
            )
            .await
            .unwrap();

        let calendar = SchoolCalendar::from_offset_minutes(0);
        let report = build_student_report(&storage, &calendar, &student).await.unwrap();

        assert_eq!(report.items.len(), 3);
        assert_eq!(report.items[0].name, "Earlier");
        assert_eq!(report.items[2].status, DerivedStatus::Pending);
        assert_eq!(report.counts.completed, 2);
        assert_eq!(report.counts.completion_rate, 66.67);

        let trend: Vec<f64> = report.trend.iter().map(|p| p.score).collect();
        assert_eq!(trend, vec![90.0, 40.0]);
        assert_eq!(report.score.unwrap().average, 65.0);

        let science = report.subjects.iter().find(|s| s.subject == "Science").unwrap();
        assert_eq!(science.total, 2);
        assert_eq!(science.completion_rate, 50.0);
    }

    #[actix_web::test]
    async fn test_student_report_visibility() {
        let storage = test_support::storage().await;
        let teacher = test_support::user(&storage, "teacher1", UserRole::Teacher).await;
        let stranger = test_support::user(&storage, "teacher2", UserRole::Teacher).await;
        let student = test_support::user(&storage, "student1", UserRole::Student).await;
        let peer = test_support::user(&storage, "student2", UserRole::Student).await;
        test_support::class_with_students(&storage, &teacher, "7A", &[&student, &peer]).await;

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage.clone()))
                .configure(crate::routes::configure_report_routes),
        )
        .await;
        let uri = format!("/api/v1/reports/students/{}", student.id);

        for (viewer, expected) in [(&student, 200), (&teacher, 200), (&stranger, 403), (&peer, 403)] {
            let req = test::TestRequest::get()
                .uri(&uri)
                .insert_header(test_support::bearer(viewer))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status().as_u16(), expected, "viewer {}", viewer.username);
        }

        let req = test::TestRequest::get()
            .uri("/api/v1/reports/students/9999")
            .insert_header(test_support::bearer(&teacher))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 404);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], 2008);
    }
}
