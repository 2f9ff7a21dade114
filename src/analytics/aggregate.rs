use serde::Serialize;
use ts_rs::TS;

/// 四舍五入到两位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 完成率（百分比），total 为 0 时返回 0
pub fn completion_rate(done: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    round2(done as f64 / total as f64 * 100.0)
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct ScoreSummary {
    pub count: i64,
    pub average: f64,
    pub max: f64,
    pub min: f64,
    pub median: f64,
}

impl ScoreSummary {
    pub fn from_scores(scores: &[f64]) -> Option<Self> {
        if scores.is_empty() {
            return None;
        }

        let mut sorted = scores.to_vec();
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let sum: f64 = sorted.iter().sum();
        let mid = count / 2;
        let median = if count % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        Some(Self {
            count: count as i64,
            average: round2(sum / count as f64),
            max: sorted[count - 1],
            min: sorted[0],
            median: round2(median),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct ScoreBucket {
    pub range: String,
    pub count: i64,
}

// (标签, 下限)，从高到低
const BUCKETS: [(&str, f64); 5] = [
    ("90-100", 90.0),
    ("80-89", 80.0),
    ("70-79", 70.0),
    ("60-69", 60.0),
    ("0-59", f64::NEG_INFINITY),
];

/// 分数段分布，始终返回全部五个区间
pub fn score_distribution(scores: &[f64]) -> Vec<ScoreBucket> {
    let mut counts = [0i64; BUCKETS.len()];
    for &score in scores {
        if let Some(idx) = BUCKETS.iter().position(|(_, floor)| score >= *floor) {
            counts[idx] += 1;
        }
    }

    BUCKETS
        .iter()
        .zip(counts)
        .map(|((range, _), count)| ScoreBucket {
            range: (*range).to_string(),
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_rate() {
        assert_eq!(completion_rate(0, 0), 0.0);
        assert_eq!(completion_rate(1, 3), 33.33);
        assert_eq!(completion_rate(2, 3), 66.67);
        assert_eq!(completion_rate(4, 4), 100.0);
    }

    #[test]
    fn test_score_summary_odd_and_even() {
        assert!(ScoreSummary::from_scores(&[]).is_none());

        let s = ScoreSummary::from_scores(&[70.0, 90.0, 80.0]).unwrap();
        assert_eq!(s.count, 3);
        assert_eq!(s.average, 80.0);
        assert_eq!(s.median, 80.0);
        assert_eq!(s.max, 90.0);
        assert_eq!(s.min, 70.0);

        let s = ScoreSummary::from_scores(&[100.0, 50.0, 75.0, 60.0]).unwrap();
        assert_eq!(s.median, 67.5);
        assert_eq!(s.average, 71.25);
    }

    #[test]
    fn test_average_rounds_to_two_decimals() {
        let s = ScoreSummary::from_scores(&[100.0, 0.0, 0.0]).unwrap();
        assert_eq!(s.average, 33.33);
    }

    #[test]
    fn test_distribution_boundaries() {
        let buckets = score_distribution(&[100.0, 90.0, 89.99, 80.0, 69.5, 60.0, 59.99, 0.0]);
        let counts: Vec<i64> = buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![2, 2, 0, 2, 2]);
        assert_eq!(buckets[0].range, "90-100");
        assert_eq!(buckets[4].range, "0-59");
    }

    #[test]
    fn test_distribution_empty_keeps_all_buckets() {
        let buckets = score_distribution(&[]);
        assert_eq!(buckets.len(), 5);
        assert!(buckets.iter().all(|b| b.count == 0));
    }
}
