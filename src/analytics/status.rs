use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::aggregate::completion_rate;

/// 相对当前日期与提交情况派生的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub enum DerivedStatus {
    Pending,
    Completed,
    Overdue,
}

/// 有提交即完成；否则截止日早于今天为逾期，其余（含今天截止）为待完成
pub fn classify(due_date: NaiveDate, has_submission: bool, today: NaiveDate) -> DerivedStatus {
    if has_submission {
        DerivedStatus::Completed
    } else if due_date < today {
        DerivedStatus::Overdue
    } else {
        DerivedStatus::Pending
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct StatusCounts {
    pub total: i64,
    pub pending: i64,
    pub completed: i64,
    pub overdue: i64,
    /// 完成率（百分比，两位小数）
    pub completion_rate: f64,
}

impl StatusCounts {
    pub fn tally<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = DerivedStatus>,
    {
        let mut counts = Self::default();
        for status in statuses {
            counts.total += 1;
            match status {
                DerivedStatus::Pending => counts.pending += 1,
                DerivedStatus::Completed => counts.completed += 1,
                DerivedStatus::Overdue => counts.overdue += 1,
            }
        }
        counts.completion_rate = completion_rate(counts.completed, counts.total);
        counts
    }
}

impl FromIterator<DerivedStatus> for StatusCounts {
    fn from_iter<I: IntoIterator<Item = DerivedStatus>>(iter: I) -> Self {
        Self::tally(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_classify_rules() {
        let today = d(2026, 3, 10);
        assert_eq!(classify(d(2026, 3, 1), true, today), DerivedStatus::Completed);
        assert_eq!(classify(d(2026, 3, 9), false, today), DerivedStatus::Overdue);
        assert_eq!(classify(d(2026, 3, 10), false, today), DerivedStatus::Pending);
        assert_eq!(classify(d(2026, 4, 1), false, today), DerivedStatus::Pending);
    }

    #[test]
    fn test_tally_counts_and_rate() {
        let counts: StatusCounts = [
            DerivedStatus::Completed,
            DerivedStatus::Completed,
            DerivedStatus::Pending,
        ]
        .into_iter()
        .collect();
        assert_eq!(counts.total, 3);
        assert_eq!(counts.completed, 2);
        assert_eq!(counts.pending, 1);
        assert_eq!(counts.overdue, 0);
        assert_eq!(counts.completion_rate, 66.67);
    }

    #[test]
    fn test_tally_empty() {
        let counts = StatusCounts::tally(std::iter::empty());
        assert_eq!(counts, StatusCounts::default());
        assert_eq!(counts.completion_rate, 0.0);
    }
}
