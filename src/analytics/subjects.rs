use std::collections::BTreeMap;

use serde::Serialize;
use ts_rs::TS;

use super::aggregate::{completion_rate, round2};
use super::status::DerivedStatus;

/// 参与学科汇总的单条记录
#[derive(Debug, Clone, Copy)]
pub struct SubjectEntry<'a> {
    pub subject: &'a str,
    pub status: DerivedStatus,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct SubjectBreakdown {
    pub subject: String,
    pub total: i64,
    pub completed: i64,
    pub completion_rate: f64,
    pub average_score: Option<f64>,
}

/// 按学科汇总，学科名升序
pub fn subject_breakdown<'a, I>(entries: I) -> Vec<SubjectBreakdown>
where
    I: IntoIterator<Item = SubjectEntry<'a>>,
{
    #[derive(Default)]
    struct Acc {
        total: i64,
        completed: i64,
        scores: Vec<f64>,
    }

    let mut groups: BTreeMap<&str, Acc> = BTreeMap::new();
    for entry in entries {
        let acc = groups.entry(entry.subject).or_default();
        acc.total += 1;
        if entry.status == DerivedStatus::Completed {
            acc.completed += 1;
        }
        if let Some(score) = entry.score {
            acc.scores.push(score);
        }
    }

    groups
        .into_iter()
        .map(|(subject, acc)| SubjectBreakdown {
            subject: subject.to_string(),
            total: acc.total,
            completed: acc.completed,
            completion_rate: completion_rate(acc.completed, acc.total),
            average_score: (!acc.scores.is_empty())
                .then(|| round2(acc.scores.iter().sum::<f64>() / acc.scores.len() as f64)),
        })
        .collect()
}
