use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, Utc};

use super::SubmissionService;
use crate::analytics::{classify, days_until};
use crate::models::ApiResponse;
use crate::models::assessments::entities::{Assessment, AssessmentKind};
use crate::models::assessments::responses::{AttemptView, QuestionView};
use crate::models::submissions::entities::Submission;
use crate::services::access::{
    current_user, load_assessment, require_class_student, storage_error,
};
use crate::services::respond_on_err;

/// 测验只能在截止前提交一次；作业可以逾期提交，批改前可以重交
pub(crate) fn can_submit(
    assessment: &Assessment,
    existing: Option<&Submission>,
    now: DateTime<Utc>,
) -> bool {
    match (assessment.kind, existing) {
        (_, Some(submission)) if submission.is_reviewed() => false,
        (AssessmentKind::Quiz, Some(_)) => false,
        (AssessmentKind::Quiz, None) => now <= assessment.due_at,
        (AssessmentKind::Assignment, _) => true,
    }
}

pub async fn get_attempt(
    service: &SubmissionService,
    request: &HttpRequest,
    assessment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = respond_on_err!(current_user(request));
    let assessment = respond_on_err!(load_assessment(&storage, assessment_id).await);
    respond_on_err!(require_class_student(&storage, &user, assessment.class_id).await);

    let questions = match storage.list_questions(assessment.id).await {
        Ok(questions) => questions,
        Err(e) => return Ok(storage_error(e)),
    };
    let existing = match storage
        .get_submission_by_assessment_and_student(assessment.id, user.id)
        .await
    {
        Ok(existing) => existing,
        Err(e) => return Ok(storage_error(e)),
    };

    let calendar = service.calendar();
    let today = calendar.today();
    let due_date = calendar.date_of(assessment.due_at);
    let reviewed = existing.as_ref().is_some_and(|s| s.is_reviewed());

    let view = AttemptView {
        status: classify(due_date, existing.is_some(), today),
        days_left: days_until(due_date, today),
        can_submit: can_submit(&assessment, existing.as_ref(), Utc::now()),
        questions: questions
            .iter()
            .map(|q| QuestionView::from_question(q, reviewed))
            .collect(),
        due_date,
        assessment,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(view, "Attempt retrieved successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::submissions::entities::SubmissionStatus;
    use chrono::Duration;

    fn assessment(kind: AssessmentKind, due_at: DateTime<Utc>) -> Assessment {
        Assessment {
            id: 1,
            kind,
            name: "Unit test".to_string(),
            subject: "Math".to_string(),
            code: "QZ-AAAAAA".to_string(),
            class_id: 1,
            created_by: 1,
            due_at,
            question_count: 2,
            created_at: due_at,
            updated_at: due_at,
        }
    }

    fn submission(status: SubmissionStatus) -> Submission {
        Submission {
            id: 1,
            assessment_id: 1,
            student_id: 2,
            answers: vec![],
            score: 0.0,
            status,
            is_late: false,
            feedback: None,
            reviewed_by: None,
            submitted_at: Utc::now(),
            reviewed_at: None,
        }
    }

    #[test]
    fn test_submission_window_rules() {
        let now = Utc::now();
        let open_quiz = assessment(AssessmentKind::Quiz, now + Duration::hours(1));
        let closed_quiz = assessment(AssessmentKind::Quiz, now - Duration::hours(1));
        let late_assignment = assessment(AssessmentKind::Assignment, now - Duration::days(2));
        let submitted = submission(SubmissionStatus::Submitted);
        let reviewed = submission(SubmissionStatus::Reviewed);

        assert!(can_submit(&open_quiz, None, now));
        assert!(!can_submit(&open_quiz, Some(&submitted), now));
        assert!(!can_submit(&closed_quiz, None, now));
        assert!(can_submit(&late_assignment, None, now));
        assert!(can_submit(&late_assignment, Some(&submitted), now));
        assert!(!can_submit(&late_assignment, Some(&reviewed), now));
    }
}
