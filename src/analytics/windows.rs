use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use ts_rs::TS;

/// 截止时间窗口
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub enum DueWindow {
    Overdue,
    Today,
    /// 未来 N 天内（含第 N 天）
    Upcoming,
    Later,
}

impl DueWindow {
    pub fn bucket(due_date: NaiveDate, today: NaiveDate, upcoming_days: i64) -> Self {
        match days_until(due_date, today) {
            d if d < 0 => DueWindow::Overdue,
            0 => DueWindow::Today,
            d if d <= upcoming_days => DueWindow::Upcoming,
            _ => DueWindow::Later,
        }
    }
}

/// 距截止日的天数，已过期为负
pub fn days_until(due_date: NaiveDate, today: NaiveDate) -> i64 {
    (due_date - today).num_days()
}

/// 截止日是否落在 [today, today + days]
pub fn due_within(due_date: NaiveDate, today: NaiveDate, days: i64) -> bool {
    let left = days_until(due_date, today);
    (0..=days).contains(&left)
}

/// 所在周的周一
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct WeekBucket {
    pub week_start: NaiveDate,
    pub count: i64,
}

/// 按周（周一起）分组计数，升序
pub fn weekly_buckets<I>(dates: I) -> Vec<WeekBucket>
where
    I: IntoIterator<Item = NaiveDate>,
{
    let mut weeks: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    for date in dates {
        *weeks.entry(week_start(date)).or_default() += 1;
    }
    weeks
        .into_iter()
        .map(|(week_start, count)| WeekBucket { week_start, count })
        .collect()
}
