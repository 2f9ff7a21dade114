use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 测评类型：作业或测验
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/assessment.ts")]
pub enum AssessmentKind {
    Assignment,
    Quiz,
}

impl std::fmt::Display for AssessmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssessmentKind::Assignment => write!(f, "assignment"),
            AssessmentKind::Quiz => write!(f, "quiz"),
        }
    }
}

impl std::str::FromStr for AssessmentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "assignment" => Ok(AssessmentKind::Assignment),
            "quiz" => Ok(AssessmentKind::Quiz),
            _ => Err(format!("Invalid assessment kind: {s}")),
        }
    }
}

/// 题目难度
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/assessment.ts")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(format!("Invalid difficulty: {s}")),
        }
    }
}

/// 单道选择题，`number` 从 1 开始连续编号
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assessment.ts")]
pub struct Question {
    pub number: i32,
    pub text: String,
    pub options: Vec<String>,
    /// 正确选项在 `options` 中的下标
    pub correct_option: i32,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assessment.ts")]
pub struct Assessment {
    pub id: i64,
    pub kind: AssessmentKind,
    pub name: String,
    pub subject: String,
    /// 分享码，学生可凭此查找测评
    pub code: String,
    pub class_id: i64,
    pub created_by: i64,
    pub due_at: DateTime<Utc>,
    pub question_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
