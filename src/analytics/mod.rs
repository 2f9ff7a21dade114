//! 作业 / 测验统计派生
//!
//! 所有函数均为纯函数，不访问存储，`today` 由调用方按学校时区给出。

pub mod aggregate;
pub mod calendar;
pub mod questions;
pub mod scoring;
pub mod status;
pub mod subjects;
pub mod windows;

pub use aggregate::{ScoreBucket, ScoreSummary, completion_rate, round2, score_distribution};
pub use calendar::SchoolCalendar;
pub use questions::{DifficultyStat, QuestionStat, difficulty_breakdown, question_stats};
pub use scoring::{GradedAttempt, apply_overrides, grade_answers, rescore};
pub use status::{DerivedStatus, StatusCounts, classify};
pub use subjects::{SubjectBreakdown, SubjectEntry, subject_breakdown};
pub use windows::{DueWindow, WeekBucket, days_until, due_within, week_start, weekly_buckets};
