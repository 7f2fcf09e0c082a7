//! Weighted scorecard scoring
//!
//! Computes review scores bottom-up over a Group -> Section -> Question
//! hierarchy from a flat answer collection joined by normalized question
//! id.

mod aggregate;
mod scorecard;

pub use aggregate::{evaluate, round2, ScoreBreakdown};
pub use scorecard::{
    normalize_question_id, Answer, AnswerSet, Group, Question, QuestionKind, Scorecard, Section,
};
