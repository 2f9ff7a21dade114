use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct Class {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    // 负责教师
    pub teacher_id: i64,
    // 邀请码
    pub invite_code: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 班级内角色
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub enum ClassMemberRole {
    Student,
    Teacher,
}

impl std::fmt::Display for ClassMemberRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClassMemberRole::Student => write!(f, "student"),
            ClassMemberRole::Teacher => write!(f, "teacher"),
        }
    }
}

impl std::str::FromStr for ClassMemberRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(ClassMemberRole::Student),
            "teacher" => Ok(ClassMemberRole::Teacher),
            _ => Err(format!("Invalid class member role: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassMember {
    pub id: i64,
    pub class_id: i64,
    pub user_id: i64,
    pub role: ClassMemberRole,
    pub joined_at: chrono::DateTime<chrono::Utc>,
}
