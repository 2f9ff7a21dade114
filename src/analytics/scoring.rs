//! 自动评分与批改后重算

use std::collections::BTreeMap;

use super::aggregate::round2;
use crate::errors::{Result, SchoolHubError};
use crate::models::assessments::entities::Question;
use crate::models::submissions::entities::AnswerRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct GradedAttempt {
    /// 每道题一条记录，按题号升序
    pub answers: Vec<AnswerRecord>,
    pub score: f64,
}

/// 自动评分：选中正确选项得 1，否则得 0，未作答计 0
pub fn grade_answers(
    questions: &[Question],
    selections: &BTreeMap<i32, i32>,
) -> Result<GradedAttempt> {
    for (&number, &option) in selections {
        let question = questions
            .iter()
            .find(|q| q.number == number)
            .ok_or_else(|| SchoolHubError::validation(format!("题号 {number} 不存在")))?;
        if option < 0 || option as usize >= question.options.len() {
            return Err(SchoolHubError::validation(format!(
                "第 {number} 题的选项 {option} 超出范围"
            )));
        }
    }

    let mut answers: Vec<AnswerRecord> = questions
        .iter()
        .map(|q| {
            let selected = selections.get(&q.number).copied();
            let rate = if selected == Some(q.correct_option) { 1.0 } else { 0.0 };
            AnswerRecord {
                question_number: q.number,
                selected_option: selected,
                rate,
            }
        })
        .collect();
    answers.sort_by_key(|a| a.question_number);

    let score = rescore(&answers, questions.len() as i32);

    Ok(GradedAttempt { answers, score })
}

/// score = Σrate / 题目数 × 100，两位小数；没有题目时为 0
pub fn rescore(answers: &[AnswerRecord], question_count: i32) -> f64 {
    if question_count <= 0 {
        return 0.0;
    }
    let total: f64 = answers.iter().map(|a| a.rate.clamp(0.0, 1.0)).sum();
    round2(total / question_count as f64 * 100.0)
}

/// 按题号覆盖得分率；未作答的题目也可以给分
pub fn apply_overrides(
    answers: &mut Vec<AnswerRecord>,
    overrides: &BTreeMap<i32, f64>,
    question_count: i32,
) -> Result<()> {
    for (&number, &rate) in overrides {
        if number < 1 || number > question_count {
            return Err(SchoolHubError::validation(format!("题号 {number} 不存在")));
        }
        if !rate.is_finite() || !(0.0..=1.0).contains(&rate) {
            return Err(SchoolHubError::validation(format!(
                "第 {number} 题的得分率必须在 0 到 1 之间"
            )));
        }
    }

    for (&number, &rate) in overrides {
        match answers.iter_mut().find(|a| a.question_number == number) {
            Some(answer) => answer.rate = rate,
            None => answers.push(AnswerRecord {
                question_number: number,
                selected_option: None,
                rate,
            }),
        }
    }
    answers.sort_by_key(|a| a.question_number);
    Ok(())
}
