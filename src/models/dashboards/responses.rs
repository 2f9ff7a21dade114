use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use ts_rs::TS;

use crate::analytics::{DueWindow, ScoreSummary, StatusCounts, SubjectBreakdown};
use crate::models::assessments::entities::AssessmentKind;
use crate::models::users::entities::UserBrief;

/// 待办 / 逾期列表中的一项
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct DueItem {
    pub assessment_id: i64,
    pub name: String,
    pub subject: String,
    pub kind: AssessmentKind,
    pub class_id: i64,
    pub due_date: NaiveDate,
    pub days_left: i64,
    pub window: DueWindow,
}

/// 最近批改的提交
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct RecentResult {
    pub submission_id: i64,
    pub assessment_id: i64,
    pub name: String,
    pub subject: String,
    pub score: f64,
    pub feedback: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct StudentDashboard {
    pub today: NaiveDate,
    pub upcoming_days: i64,
    pub counts: StatusCounts,
    pub score: Option<ScoreSummary>,
    pub due_soon: Vec<DueItem>,
    pub overdue: Vec<DueItem>,
    pub recent_reviewed: Vec<RecentResult>,
    pub subjects: Vec<SubjectBreakdown>,
}

/// 单个测评的完成进度（教师视角）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct AssessmentProgress {
    pub assessment_id: i64,
    pub name: String,
    pub subject: String,
    pub kind: AssessmentKind,
    pub class_id: i64,
    pub due_date: NaiveDate,
    pub window: DueWindow,
    pub student_count: i64,
    pub submitted_count: i64,
    pub reviewed_count: i64,
    pub completion_rate: f64,
    pub average_score: Option<f64>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct PendingReview {
    pub submission_id: i64,
    pub assessment_id: i64,
    pub assessment_name: String,
    pub student: UserBrief,
    pub score: f64,
    pub is_late: bool,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct TeacherTotals {
    pub assessments: i64,
    pub students: i64,
    pub submissions: i64,
    pub awaiting_review: i64,
    /// 各测评完成率的平均值
    pub average_completion_rate: f64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct TeacherDashboard {
    pub today: NaiveDate,
    pub upcoming_days: i64,
    pub totals: TeacherTotals,
    pub assessments: Vec<AssessmentProgress>,
    pub awaiting_review: Vec<PendingReview>,
    pub due_soon: Vec<AssessmentProgress>,
    /// 已截止但仍有学生未提交
    pub past_due_incomplete: Vec<AssessmentProgress>,
}
