use chrono::NaiveDate;
use serde::Serialize;
use ts_rs::TS;

use crate::analytics::{
    DerivedStatus, DifficultyStat, QuestionStat, ScoreBucket, ScoreSummary, StatusCounts,
    SubjectBreakdown, WeekBucket,
};
use crate::models::assessments::entities::{Assessment, AssessmentKind};
use crate::models::classes::entities::Class;
use crate::models::submissions::entities::SubmissionStatus;
use crate::models::users::entities::UserBrief;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct AssessmentReport {
    pub assessment: Assessment,
    pub due_date: NaiveDate,
    pub student_count: i64,
    pub submitted_count: i64,
    pub reviewed_count: i64,
    pub late_count: i64,
    /// 全班学生的派生状态统计
    pub counts: StatusCounts,
    pub score: Option<ScoreSummary>,
    pub distribution: Vec<ScoreBucket>,
    pub questions: Vec<QuestionStat>,
    pub difficulties: Vec<DifficultyStat>,
    pub missing_students: Vec<UserBrief>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct StudentProgressRow {
    pub student: UserBrief,
    pub counts: StatusCounts,
    pub average_score: Option<f64>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct ClassReport {
    pub class: Class,
    pub today: NaiveDate,
    pub assessment_count: i64,
    pub counts: StatusCounts,
    pub students: Vec<StudentProgressRow>,
    pub subjects: Vec<SubjectBreakdown>,
    /// 每周提交数
    pub weekly_submissions: Vec<WeekBucket>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct StudentAssessmentRow {
    pub assessment_id: i64,
    pub name: String,
    pub subject: String,
    pub kind: AssessmentKind,
    pub due_date: NaiveDate,
    pub status: DerivedStatus,
    pub score: Option<f64>,
    pub submission_status: Option<SubmissionStatus>,
    pub is_late: Option<bool>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct TrendPoint {
    pub assessment_id: i64,
    pub name: String,
    pub due_date: NaiveDate,
    pub score: f64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct StudentReport {
    pub student: UserBrief,
    pub today: NaiveDate,
    pub counts: StatusCounts,
    pub score: Option<ScoreSummary>,
    pub items: Vec<StudentAssessmentRow>,
    pub subjects: Vec<SubjectBreakdown>,
    /// 按截止日期排序的成绩走势
    pub trend: Vec<TrendPoint>,
}
