use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::assessments::entities::AssessmentKind;

/// 提交状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub enum SubmissionStatus {
    Submitted,
    Reviewed,
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionStatus::Submitted => write!(f, "submitted"),
            SubmissionStatus::Reviewed => write!(f, "reviewed"),
        }
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submitted" => Ok(SubmissionStatus::Submitted),
            "reviewed" => Ok(SubmissionStatus::Reviewed),
            _ => Err(format!("Invalid submission status: {s}")),
        }
    }
}

/// 单题作答记录
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct AnswerRecord {
    pub question_number: i32,
    /// 未作答为 None
    pub selected_option: Option<i32>,
    /// 得分率，取值 [0, 1]
    pub rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct Submission {
    pub id: i64,
    pub assessment_id: i64,
    pub student_id: i64,
    pub answers: Vec<AnswerRecord>,
    /// 百分制，两位小数
    pub score: f64,
    pub status: SubmissionStatus,
    pub is_late: bool,
    pub feedback: Option<String>,
    pub reviewed_by: Option<i64>,
    pub submitted_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl Submission {
    pub fn is_reviewed(&self) -> bool {
        self.status == SubmissionStatus::Reviewed
    }

    /// 学生可见的分数：批改后公开；测验只能提交一次，提交即公开。
    /// 作业在批改前可以重交，分数不公开
    pub fn released_score(&self, kind: AssessmentKind) -> Option<f64> {
        (self.is_reviewed() || kind == AssessmentKind::Quiz).then_some(self.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(status: SubmissionStatus) -> Submission {
        Submission {
            id: 1,
            assessment_id: 1,
            student_id: 1,
            answers: vec![],
            score: 80.0,
            status,
            is_late: false,
            feedback: None,
            reviewed_by: None,
            submitted_at: Utc::now(),
            reviewed_at: None,
        }
    }

    #[test]
    fn test_released_score() {
        let pending = submission(SubmissionStatus::Submitted);
        assert_eq!(pending.released_score(AssessmentKind::Assignment), None);
        assert_eq!(pending.released_score(AssessmentKind::Quiz), Some(80.0));

        let reviewed = submission(SubmissionStatus::Reviewed);
        assert_eq!(reviewed.released_score(AssessmentKind::Assignment), Some(80.0));
    }
}
