use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use ts_rs::TS;

use super::entities::AnswerRecord;

/// 学生提交答案：题号 -> 所选选项下标
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmitAnswersRequest {
    pub answers: BTreeMap<i32, i32>,
}

/// 教师批改：可按题号覆盖得分率，并填写评语
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct ReviewSubmissionRequest {
    #[serde(default)]
    pub rates: BTreeMap<i32, f64>,
    pub feedback: Option<String>,
}

// 存储层写入参数（已评分）
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub assessment_id: i64,
    pub student_id: i64,
    pub answers: Vec<AnswerRecord>,
    pub score: f64,
    pub is_late: bool,
    pub submitted_at: DateTime<Utc>,
}

// 存储层批改参数
#[derive(Debug, Clone)]
pub struct SubmissionReview {
    pub answers: Vec<AnswerRecord>,
    pub score: f64,
    pub feedback: Option<String>,
    pub reviewed_by: i64,
    pub reviewed_at: DateTime<Utc>,
}
