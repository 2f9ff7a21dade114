use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::DashboardService;
use crate::analytics::{
    DueWindow, SchoolCalendar, ScoreSummary, completion_rate, due_within, round2,
};
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::assessments::entities::Assessment;
use crate::models::dashboards::responses::{
    AssessmentProgress, PendingReview, TeacherDashboard, TeacherTotals,
};
use crate::models::submissions::entities::{Submission, SubmissionStatus};
use crate::models::users::entities::{User, UserBrief};
use crate::services::access::{current_user, storage_error};
use crate::services::respond_on_err;
use crate::storage::Storage;

pub async fn handle_teacher_dashboard(
    service: &DashboardService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = respond_on_err!(current_user(request));

    match build_teacher_dashboard(
        &storage,
        &service.calendar(),
        &user,
        service.get_config().upcoming_days,
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

/// 班级当前学生名单，按班级缓存
pub(crate) struct Rosters {
    rosters: HashMap<i64, Vec<User>>,
}

impl Rosters {
    pub(crate) async fn load(storage: &Arc<dyn Storage>, class_ids: &[i64]) -> Result<Self> {
        let mut rosters = HashMap::new();
        for &class_id in class_ids {
            if !rosters.contains_key(&class_id) {
                rosters.insert(class_id, storage.list_class_students(class_id).await?);
            }
        }
        Ok(Self { rosters })
    }

    pub(crate) fn students(&self, class_id: i64) -> &[User] {
        self.rosters.get(&class_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn student_ids(&self, class_id: i64) -> HashSet<i64> {
        self.students(class_id).iter().map(|u| u.id).collect()
    }

    fn distinct_students(&self) -> HashSet<i64> {
        self.rosters.values().flatten().map(|u| u.id).collect()
    }

    fn find(&self, user_id: i64) -> Option<&User> {
        self.rosters.values().flatten().find(|u| u.id == user_id)
    }
}

/// 只统计仍在班级中的学生的提交
pub(crate) fn progress(
    assessment: &Assessment,
    submissions: &[&Submission],
    roster: &HashSet<i64>,
    calendar: &SchoolCalendar,
    upcoming_days: i64,
) -> AssessmentProgress {
    let counted: Vec<&&Submission> = submissions
        .iter()
        .filter(|s| roster.contains(&s.student_id))
        .collect();
    let scores: Vec<f64> = counted.iter().map(|s| s.score).collect();
    let student_count = roster.len() as i64;
    let submitted_count = counted.len() as i64;
    let due_date = calendar.date_of(assessment.due_at);

    AssessmentProgress {
        assessment_id: assessment.id,
        name: assessment.name.clone(),
        subject: assessment.subject.clone(),
        kind: assessment.kind,
        class_id: assessment.class_id,
        due_date,
        window: DueWindow::bucket(due_date, calendar.today(), upcoming_days),
        student_count,
        submitted_count,
        reviewed_count: counted.iter().filter(|s| s.is_reviewed()).count() as i64,
        completion_rate: completion_rate(submitted_count, student_count),
        average_score: ScoreSummary::from_scores(&scores).map(|s| s.average),
    }
}

pub(crate) async fn build_teacher_dashboard(
    storage: &Arc<dyn Storage>,
    calendar: &SchoolCalendar,
    user: &User,
    upcoming_days: i64,
) -> Result<TeacherDashboard> {
    let today = calendar.today();
    let assessments = storage.list_assessments_by_creator(user.id).await?;
    let ids: Vec<i64> = assessments.iter().map(|a| a.id).collect();
    let submissions = storage.list_submissions_by_assessments(&ids).await?;

    let class_ids: Vec<i64> = assessments.iter().map(|a| a.class_id).collect();
    let rosters = Rosters::load(storage, &class_ids).await?;

    let mut by_assessment: HashMap<i64, Vec<&Submission>> = HashMap::new();
    for submission in &submissions {
        by_assessment
            .entry(submission.assessment_id)
            .or_default()
            .push(submission);
    }

    let progress_rows: Vec<AssessmentProgress> = assessments
        .iter()
        .map(|a| {
            let subs = by_assessment.get(&a.id).map(Vec::as_slice).unwrap_or(&[]);
            progress(a, subs, &rosters.student_ids(a.class_id), calendar, upcoming_days)
        })
        .collect();

    // 待批改：最早提交的排在前面
    let names: HashMap<i64, &str> = assessments.iter().map(|a| (a.id, a.name.as_str())).collect();
    let mut waiting: Vec<&Submission> = submissions
        .iter()
        .filter(|s| s.status == SubmissionStatus::Submitted)
        .collect();
    waiting.sort_by_key(|s| s.submitted_at);

    let missing_ids: Vec<i64> = waiting
        .iter()
        .filter(|s| rosters.find(s.student_id).is_none())
        .map(|s| s.student_id)
        .collect();
    let former_students = storage.get_users_by_ids(&missing_ids).await?;

    let awaiting_review: Vec<PendingReview> = waiting
        .iter()
        .filter_map(|s| {
            let student = rosters
                .find(s.student_id)
                .or_else(|| former_students.iter().find(|u| u.id == s.student_id))?;
            Some(PendingReview {
                submission_id: s.id,
                assessment_id: s.assessment_id,
                assessment_name: names.get(&s.assessment_id)?.to_string(),
                student: UserBrief::from(student),
                score: s.score,
                is_late: s.is_late,
                submitted_at: s.submitted_at,
            })
        })
        .collect();

    let rates: Vec<f64> = progress_rows.iter().map(|p| p.completion_rate).collect();
    let totals = TeacherTotals {
        assessments: progress_rows.len() as i64,
        students: rosters.distinct_students().len() as i64,
        submissions: progress_rows.iter().map(|p| p.submitted_count).sum(),
        awaiting_review: awaiting_review.len() as i64,
        average_completion_rate: if rates.is_empty() {
            0.0
        } else {
            round2(rates.iter().sum::<f64>() / rates.len() as f64)
        },
    };

    let due_soon = progress_rows
        .iter()
        .filter(|p| due_within(p.due_date, today, upcoming_days))
        .cloned()
        .collect();
    let past_due_incomplete = progress_rows
        .iter()
        .filter(|p| p.due_date < today && p.submitted_count < p.student_count)
        .cloned()
        .collect();

    Ok(TeacherDashboard {
        today,
        upcoming_days,
        totals,
        assessments: progress_rows,
        awaiting_review,
        due_soon,
        past_due_incomplete,
    })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::assessments::entities::AssessmentKind;
    use crate::models::submissions::requests::NewSubmission;
    use crate::models::users::entities::UserRole;
    use crate::services::test_support;

    async fn submit(
        storage: &Arc<dyn Storage>,
        assessment: &Assessment,
        student: &User,
        score: f64,
    ) {
        storage
            .create_submission(NewSubmission {
                assessment_id: assessment.id,
                student_id: student.id,
                answers: vec![],
                score,
                is_late: false,
                submitted_at: Utc::now(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_teacher_dashboard_progress() {
        let storage = test_support::storage().await;
        let teacher = test_support::user(&storage, "teacher1", UserRole::Teacher).await;
        let s1 = test_support::user(&storage, "student1", UserRole::Student).await;
        let s2 = test_support::user(&storage, "student2", UserRole::Student).await;
        let s3 = test_support::user(&storage, "student3", UserRole::Student).await;
        let s4 = test_support::user(&storage, "student4", UserRole::Student).await;
        let class =
            test_support::class_with_students(&storage, &teacher, "7A", &[&s1, &s2, &s3, &s4])
                .await;

        let past = test_support::assessment(
            &storage, &class, &teacher, AssessmentKind::Assignment, "Past", "Math", -2,
        )
        .await;
        let soon = test_support::assessment(
            &storage, &class, &teacher, AssessmentKind::Quiz, "Soon", "Math", 2,
        )
        .await;
        submit(&storage, &past, &s1, 70.0).await;
        submit(&storage, &past, &s2, 90.0).await;
        submit(&storage, &soon, &s1, 100.0).await;
        // 退班学生的提交不计入统计
        submit(&storage, &past, &s4, 10.0).await;
        assert!(storage.leave_class(s4.id, class.id).await.unwrap());

        let calendar = SchoolCalendar::from_offset_minutes(480);
        let dashboard = build_teacher_dashboard(&storage, &calendar, &teacher, 7)
            .await
            .unwrap();

        assert_eq!(dashboard.totals.assessments, 2);
        assert_eq!(dashboard.totals.students, 3);
        assert_eq!(dashboard.totals.submissions, 3);
        // 退班学生的提交仍需批改
        assert_eq!(dashboard.totals.awaiting_review, 4);
        // (2/3 + 1/3) / 2
        assert_eq!(dashboard.totals.average_completion_rate, 50.0);

        let past_row = dashboard
            .assessments
            .iter()
            .find(|p| p.assessment_id == past.id)
            .unwrap();
        assert_eq!(past_row.submitted_count, 2);
        assert_eq!(past_row.completion_rate, 66.67);
        assert_eq!(past_row.average_score, Some(80.0));
        assert_eq!(past_row.window, DueWindow::Overdue);

        assert_eq!(dashboard.due_soon.len(), 1);
        assert_eq!(dashboard.due_soon[0].assessment_id, soon.id);
        assert_eq!(dashboard.past_due_incomplete.len(), 1);
        assert_eq!(dashboard.past_due_incomplete[0].assessment_id, past.id);
        assert!(
            dashboard
                .awaiting_review
                .iter()
                .any(|r| r.student.username == "student4")
        );
    }
}
