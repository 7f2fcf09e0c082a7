//! Bottom-up weighted score aggregation
//!
//! A single pass over the hierarchy: each question contributes a 0-100
//! point scaled by its weight, sections and groups roll their children up
//! scaled by their own weights, and the total is the sum across groups.
//! Every per-node score is retained so the host can display partial
//! rollups without recomputing subtrees; the lookup is rebuilt from
//! scratch on every evaluation.

use super::scorecard::{AnswerSet, Question, QuestionKind, Scorecard};
use std::collections::HashMap;

/// Result of evaluating one scorecard against one answer set
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    /// Weighted score per node id: questions, sections, and groups
    pub by_node: HashMap<String, f64>,
    /// Sum of group scores, rounded to 2 decimal places
    pub total: f64,
    /// Rounded percentage of questions with an answer present,
    /// independent of weights
    pub progress: u32,
}

/// Evaluate a scorecard. Deterministic: a fixed hierarchy and answer set
/// always yield the identical rounded total.
pub fn evaluate(scorecard: &Scorecard, answers: &AnswerSet) -> ScoreBreakdown {
    let mut by_node = HashMap::new();
    let mut total = 0.0;
    let mut answered = 0usize;
    let mut question_count = 0usize;

    for group in &scorecard.groups {
        let mut group_sum = 0.0;
        for section in &group.sections {
            let mut section_sum = 0.0;
            for question in &section.questions {
                question_count += 1;
                if is_answered(question, answers) {
                    answered += 1;
                }
                let score = question_point(question, answers) * question.weight / 100.0;
                by_node.insert(question.id.clone(), score);
                section_sum += score;
            }
            let section_score = section_sum * section.weight / 100.0;
            by_node.insert(section.id.clone(), section_score);
            group_sum += section_score;
        }
        let group_score = group_sum * group.weight / 100.0;
        by_node.insert(group.id.clone(), group_score);
        total += group_score;
    }

    let progress = if question_count == 0 {
        0
    } else {
        (100.0 * answered as f64 / question_count as f64).round() as u32
    };

    ScoreBreakdown {
        by_node,
        total: round2(total),
        progress,
    }
}

/// 0-100 points for one question. Unanswered questions score zero.
fn question_point(question: &Question, answers: &AnswerSet) -> f64 {
    let value = match answers.get(&question.id) {
        Some(answer) => answer.effective(),
        None => return 0.0,
    };
    if value.is_empty() {
        return 0.0;
    }
    match question.kind {
        QuestionKind::YesNo => {
            if value == "Yes" || value.parse::<f64>().map_or(false, |v| v == 1.0) {
                100.0
            } else {
                0.0
            }
        }
        QuestionKind::Scale { scale_max, .. } => {
            if scale_max == 0 {
                return 0.0;
            }
            let parsed = value.parse::<f64>().unwrap_or(0.0);
            (parsed / f64::from(scale_max)) * 100.0
        }
    }
}

fn is_answered(question: &Question, answers: &AnswerSet) -> bool {
    answers
        .get(&question.id)
        .map_or(false, |a| !a.effective().is_empty())
}

/// Round half away from zero to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
