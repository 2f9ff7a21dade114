use serde::Serialize;
use ts_rs::TS;

use super::aggregate::{completion_rate, round2};
use crate::models::assessments::entities::{Difficulty, Question};
use crate::models::submissions::entities::Submission;

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct QuestionStat {
    pub number: i32,
    pub text: String,
    pub difficulty: Difficulty,
    /// 作答（选了选项）的人数
    pub attempts: i64,
    /// 得满分的人数
    pub correct_count: i64,
    /// 平均得分率 [0, 1]，未作答计 0
    pub average_rate: f64,
    /// 正确率（百分比）
    pub correct_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct DifficultyStat {
    pub difficulty: Difficulty,
    pub question_count: i64,
    pub correct_rate: f64,
}

/// 逐题统计，按题号升序
pub fn question_stats(questions: &[Question], submissions: &[Submission]) -> Vec<QuestionStat> {
    let total = submissions.len() as i64;
    let mut stats: Vec<QuestionStat> = questions
        .iter()
        .map(|q| {
            let mut attempts = 0;
            let mut correct_count = 0;
            let mut rate_sum = 0.0;
            for submission in submissions {
                let Some(answer) = submission
                    .answers
                    .iter()
                    .find(|a| a.question_number == q.number)
                else {
                    continue;
                };
                if answer.selected_option.is_some() {
                    attempts += 1;
                }
                if answer.rate >= 1.0 {
                    correct_count += 1;
                }
                rate_sum += answer.rate;
            }

            QuestionStat {
                number: q.number,
                text: q.text.clone(),
                difficulty: q.difficulty,
                attempts,
                correct_count,
                average_rate: if total > 0 {
                    round2(rate_sum / total as f64)
                } else {
                    0.0
                },
                correct_rate: completion_rate(correct_count, total),
            }
        })
        .collect();
    stats.sort_by_key(|s| s.number);
    stats
}

/// 按难度汇总，只包含出现过的难度，顺序 easy -> hard
pub fn difficulty_breakdown(stats: &[QuestionStat]) -> Vec<DifficultyStat> {
    [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
        .into_iter()
        .filter_map(|difficulty| {
            let group: Vec<&QuestionStat> =
                stats.iter().filter(|s| s.difficulty == difficulty).collect();
            if group.is_empty() {
                return None;
            }
            let rate_sum: f64 = group.iter().map(|s| s.correct_rate).sum();
            Some(DifficultyStat {
                difficulty,
                question_count: group.len() as i64,
                correct_rate: round2(rate_sum / group.len() as f64),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::submissions::entities::{AnswerRecord, SubmissionStatus};
    use chrono::Utc;

    fn question(number: i32, difficulty: Difficulty) -> Question {
        Question {
            number,
            text: format!("Q{number}"),
            options: vec!["A".into(), "B".into()],
            correct_option: 0,
            difficulty,
        }
    }

    fn submission(answers: &[(i32, Option<i32>, f64)]) -> Submission {
        Submission {
            id: 1,
            assessment_id: 1,
            student_id: 1,
            answers: answers
                .iter()
                .map(|&(question_number, selected_option, rate)| AnswerRecord {
                    question_number,
                    selected_option,
                    rate,
                })
                .collect(),
            score: 0.0,
            status: SubmissionStatus::Submitted,
            is_late: false,
            feedback: None,
            reviewed_by: None,
            submitted_at: Utc::now(),
            reviewed_at: None,
        }
    }

    #[test]
    fn test_question_stats() {
        let qs = vec![question(1, Difficulty::Easy), question(2, Difficulty::Hard)];
        let subs = vec![
            submission(&[(1, Some(0), 1.0), (2, Some(1), 0.0)]),
            submission(&[(1, Some(0), 1.0), (2, None, 0.0)]),
            submission(&[(1, Some(1), 0.5), (2, Some(0), 1.0)]),
            submission(&[(1, Some(1), 0.0), (2, Some(1), 0.0)]),
        ];
        let stats = question_stats(&qs, &subs);

        assert_eq!(stats[0].attempts, 4);
        assert_eq!(stats[0].correct_count, 2);
        assert_eq!(stats[0].average_rate, 0.63);
        assert_eq!(stats[0].correct_rate, 50.0);

        assert_eq!(stats[1].attempts, 3);
        assert_eq!(stats[1].correct_count, 1);
        assert_eq!(stats[1].correct_rate, 25.0);
    }

    #[test]
    fn test_question_stats_without_submissions() {
        let stats = question_stats(&[question(1, Difficulty::Easy)], &[]);
        assert_eq!(stats[0].attempts, 0);
        assert_eq!(stats[0].average_rate, 0.0);
        assert_eq!(stats[0].correct_rate, 0.0);
    }

    #[test]
    fn test_difficulty_breakdown() {
        let qs = vec![
            question(1, Difficulty::Hard),
            question(2, Difficulty::Easy),
            question(3, Difficulty::Easy),
        ];
        let subs = vec![
            submission(&[(1, Some(0), 1.0), (2, Some(0), 1.0), (3, Some(1), 0.0)]),
            submission(&[(1, Some(1), 0.0), (2, Some(0), 1.0), (3, Some(0), 1.0)]),
        ];
        let breakdown = difficulty_breakdown(&question_stats(&qs, &subs));
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].difficulty, Difficulty::Easy);
        assert_eq!(breakdown[0].question_count, 2);
        assert_eq!(breakdown[0].correct_rate, 75.0);
        assert_eq!(breakdown[1].difficulty, Difficulty::Hard);
        assert_eq!(breakdown[1].correct_rate, 50.0);
    }
}
