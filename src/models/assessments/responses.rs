use chrono::NaiveDate;
use serde::Serialize;
use ts_rs::TS;

use super::entities::{Assessment, Difficulty, Question};
use crate::analytics::DerivedStatus;
use crate::models::common::PaginationInfo;
use crate::models::submissions::entities::SubmissionStatus;

/// 列表项；学生视角带派生状态，教师视角带提交统计
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assessment.ts")]
pub struct AssessmentListItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub assessment: Assessment,
    pub due_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DerivedStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_count: Option<i64>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assessment.ts")]
pub struct AssessmentListResponse {
    pub items: Vec<AssessmentListItem>,
    pub pagination: PaginationInfo,
}

/// 对外展示的题目；`correct_option` 仅对教师或已批改的学生可见
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assessment.ts")]
pub struct QuestionView {
    pub number: i32,
    pub text: String,
    pub options: Vec<String>,
    pub difficulty: Difficulty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_option: Option<i32>,
}

impl QuestionView {
    pub fn from_question(question: &Question, reveal_answer: bool) -> Self {
        Self {
            number: question.number,
            text: question.text.clone(),
            options: question.options.clone(),
            difficulty: question.difficulty,
            correct_option: reveal_answer.then_some(question.correct_option),
        }
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assessment.ts")]
pub struct AssessmentDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub assessment: Assessment,
    pub due_date: NaiveDate,
    pub questions: Vec<QuestionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DerivedStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission_status: Option<SubmissionStatus>,
}

/// 学生作答页
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assessment.ts")]
pub struct AttemptView {
    pub assessment: Assessment,
    pub due_date: NaiveDate,
    pub status: DerivedStatus,
    /// 距截止的天数，已过期为负数
    pub days_left: i64,
    /// 当前是否还能提交
    pub can_submit: bool,
    pub questions: Vec<QuestionView>,
}

// 存储层分页结果，由服务层补充派生字段
#[derive(Debug)]
pub struct AssessmentPage {
    pub items: Vec<Assessment>,
    pub pagination: PaginationInfo,
}
