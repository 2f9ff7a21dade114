use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};

/// 学校所在时区的日历，用于确定“今天”和截止日期
#[derive(Debug, Clone, Copy)]
pub struct SchoolCalendar {
    offset: FixedOffset,
}

impl SchoolCalendar {
    /// 超出 ±24h 的偏移量回退到 UTC
    pub fn from_offset_minutes(minutes: i32) -> Self {
        let offset = FixedOffset::east_opt(minutes.saturating_mul(60)).unwrap_or_else(|| Utc.fix());
        Self { offset }
    }

    pub fn from_config() -> Self {
        let config = crate::config::AppConfig::get();
        Self::from_offset_minutes(config.dashboard.utc_offset_minutes)
    }

    pub fn date_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }

    pub fn today(&self) -> NaiveDate {
        self.date_of(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_date_crosses_midnight_with_offset() {
        let instant = Utc.with_ymd_and_hms(2026, 5, 31, 17, 30, 0).unwrap();
        let utc = SchoolCalendar::from_offset_minutes(0);
        let east8 = SchoolCalendar::from_offset_minutes(480);
        assert_eq!(utc.date_of(instant), NaiveDate::from_ymd_opt(2026, 5, 31).unwrap());
        assert_eq!(east8.date_of(instant), NaiveDate::from_ymd_opt(2026, 6, 1).unwrap());
    }

    #[test]
    fn test_invalid_offset_falls_back_to_utc() {
        let instant = Utc.with_ymd_and_hms(2026, 1, 1, 23, 0, 0).unwrap();
        let cal = SchoolCalendar::from_offset_minutes(100_000);
        assert_eq!(cal.date_of(instant), NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
    }
}
