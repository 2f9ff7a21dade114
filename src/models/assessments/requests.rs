use chrono::{DateTime, Utc};
use serde::Deserialize;
use ts_rs::TS;

use super::entities::{AssessmentKind, Difficulty};
use crate::models::common::PaginationQuery;

/// 题目输入，题号按数组顺序从 1 开始分配
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assessment.ts")]
pub struct QuestionInput {
    pub text: String,
    pub options: Vec<String>,
    pub correct_option: i32,
    pub difficulty: Option<Difficulty>,
}

/// 创建作业 / 测验请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assessment.ts")]
pub struct CreateAssessmentRequest {
    pub kind: AssessmentKind,
    pub name: String,
    pub subject: String,
    pub class_id: i64,
    pub due_at: DateTime<Utc>, // ISO 8601 格式，如 "2026-10-24T12:00:00Z"
    pub questions: Vec<QuestionInput>,
}

/// 更新请求；题目仅在尚无提交时可替换
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assessment.ts")]
pub struct UpdateAssessmentRequest {
    pub name: Option<String>,
    pub subject: Option<String>,
    pub due_at: Option<DateTime<Utc>>,
    pub questions: Option<Vec<QuestionInput>>,
}

/// 测评列表查询参数（HTTP 请求）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assessment.ts")]
pub struct AssessmentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "crate::models::common::pagination::deserialize_optional_i64")]
    pub class_id: Option<i64>,
    pub kind: Option<AssessmentKind>,
    pub subject: Option<String>,
    pub search: Option<String>,
}

// 用于存储层的内部查询参数
#[derive(Debug, Clone, Default)]
pub struct AssessmentListQuery {
    pub page: u64,
    pub size: u64,
    /// 限定班级范围；None 表示不限（管理员）
    pub class_ids: Option<Vec<i64>>,
    pub kind: Option<AssessmentKind>,
    pub subject: Option<String>,
    pub search: Option<String>,
}

// 用于存储层的更新参数（题目已校验）
#[derive(Debug, Clone, Default)]
pub struct AssessmentChanges {
    pub name: Option<String>,
    pub subject: Option<String>,
    pub due_at: Option<DateTime<Utc>>,
    pub questions: Option<Vec<super::entities::Question>>,
}

// 用于存储层的创建参数（题目已校验并编号）
#[derive(Debug, Clone)]
pub struct NewAssessment {
    pub kind: AssessmentKind,
    pub name: String,
    pub subject: String,
    pub code: String,
    pub class_id: i64,
    pub created_by: i64,
    pub due_at: DateTime<Utc>,
    pub questions: Vec<super::entities::Question>,
}
