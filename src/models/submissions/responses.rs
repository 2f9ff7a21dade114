use chrono::{DateTime, Utc};
use serde::Serialize;
use ts_rs::TS;

use super::entities::{Submission, SubmissionStatus};
use crate::models::assessments::entities::AssessmentKind;
use crate::models::users::entities::UserBrief;

/// 带学生信息的提交（教师视角）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionWithStudent {
    #[serde(flatten)]
    #[ts(flatten)]
    pub submission: Submission,
    pub student: UserBrief,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionListResponse {
    pub items: Vec<SubmissionWithStudent>,
}

/// 学生视角的单题作答，批改前不带得分率
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct StudentAnswer {
    pub question_number: i32,
    pub selected_option: Option<i32>,
    pub rate: Option<f64>,
}

/// 学生视角的提交
///
/// 批改前逐题得分率一律隐藏，否则可以通过重交逐个试出正确选项。
/// 分数按 [`Submission::released_score`] 公开。
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct StudentSubmissionView {
    pub id: i64,
    pub assessment_id: i64,
    pub student_id: i64,
    pub answers: Vec<StudentAnswer>,
    pub score: Option<f64>,
    pub status: SubmissionStatus,
    pub is_late: bool,
    pub feedback: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl StudentSubmissionView {
    pub fn new(submission: Submission, kind: AssessmentKind) -> Self {
        let reviewed = submission.is_reviewed();
        let score = submission.released_score(kind);
        Self {
            id: submission.id,
            assessment_id: submission.assessment_id,
            student_id: submission.student_id,
            answers: submission
                .answers
                .into_iter()
                .map(|a| StudentAnswer {
                    question_number: a.question_number,
                    selected_option: a.selected_option,
                    rate: reviewed.then_some(a.rate),
                })
                .collect(),
            score,
            status: submission.status,
            is_late: submission.is_late,
            feedback: submission.feedback,
            submitted_at: submission.submitted_at,
            reviewed_at: submission.reviewed_at,
        }
    }
}

/// 学生自己的提交，附测评摘要
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct MySubmissionItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub submission: StudentSubmissionView,
    pub assessment_name: String,
    pub subject: String,
    pub kind: AssessmentKind,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct MySubmissionListResponse {
    pub items: Vec<MySubmissionItem>,
}

/// 提交结果
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmitResponse {
    pub submission: StudentSubmissionView,
    pub question_count: i32,
    pub answered_count: i32,
}
