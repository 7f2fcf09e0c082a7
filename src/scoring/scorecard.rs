//! Scorecard hierarchy and answer records

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How a question is answered and scored
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionKind {
    YesNo,
    Scale { scale_min: u32, scale_max: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    /// Percentage weight within the enclosing section
    pub weight: f64,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

impl Question {
    pub fn yes_no(id: &str, weight: f64) -> Self {
        Self {
            id: id.to_string(),
            weight,
            kind: QuestionKind::YesNo,
        }
    }

    pub fn scale(id: &str, weight: f64, scale_min: u32, scale_max: u32) -> Self {
        Self {
            id: id.to_string(),
            weight,
            kind: QuestionKind::Scale {
                scale_min,
                scale_max,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub weight: f64,
    pub questions: Vec<Question>,
}

impl Section {
    pub fn new(id: &str, weight: f64, questions: Vec<Question>) -> Self {
        Self {
            id: id.to_string(),
            weight,
            questions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub weight: f64,
    pub sections: Vec<Section>,
}

impl Group {
    pub fn new(id: &str, weight: f64, sections: Vec<Section>) -> Self {
        Self {
            id: id.to_string(),
            weight,
            sections,
        }
    }
}

/// Hierarchical Group -> Section -> Question structure used to compute a
/// weighted review score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scorecard {
    pub groups: Vec<Group>,
}

impl Scorecard {
    /// Build a scorecard. Every question id must normalize to a unique
    /// key; a collision is a configuration error.
    pub fn new(groups: Vec<Group>) -> Result<Self, ConfigError> {
        let scorecard = Self { groups };
        scorecard.validate()?;
        Ok(scorecard)
    }

    /// Load and validate a scorecard from a JSON configuration string
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let scorecard: Self = serde_json::from_str(json)?;
        scorecard.validate()?;
        Ok(scorecard)
    }

    /// All questions in hierarchy order
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.groups
            .iter()
            .flat_map(|g| g.sections.iter())
            .flat_map(|s| s.questions.iter())
    }

    pub fn question_count(&self) -> usize {
        self.questions().count()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut seen: HashMap<String, &str> = HashMap::new();
        for question in self.questions() {
            let key = normalize_question_id(&question.id);
            if seen.insert(key, &question.id).is_some() {
                return Err(ConfigError::DuplicateQuestionId {
                    id: question.id.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Join key between scorecard questions and answer records:
/// trimmed and lower-cased
pub fn normalize_question_id(id: &str) -> String {
    id.trim().to_lowercase()
}

/// One reviewer answer, associated with a question by normalized id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub scorecard_question_id: String,
    #[serde(default)]
    pub initial_answer: String,
    #[serde(default)]
    pub final_answer: String,
}

impl Answer {
    pub fn new(question_id: &str, final_answer: &str) -> Self {
        Self {
            scorecard_question_id: question_id.to_string(),
            initial_answer: String::new(),
            final_answer: final_answer.to_string(),
        }
    }

    /// The value scoring reads: the final answer when present, otherwise
    /// the initial one
    pub fn effective(&self) -> &str {
        if self.final_answer.is_empty() {
            &self.initial_answer
        } else {
            &self.final_answer
        }
    }
}

/// Flat answer collection keyed by normalized question id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnswerSet {
    by_question: HashMap<String, Answer>,
}

impl AnswerSet {
    /// Index answers by normalized question id.
    /// A later answer for the same question replaces an earlier one.
    pub fn from_answers(answers: Vec<Answer>) -> Self {
        let mut by_question = HashMap::new();
        for answer in answers {
            by_question.insert(normalize_question_id(&answer.scorecard_question_id), answer);
        }
        Self { by_question }
    }

    pub fn get(&self, question_id: &str) -> Option<&Answer> {
        self.by_question.get(&normalize_question_id(question_id))
    }

    pub fn len(&self) -> usize {
        self.by_question.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_question.is_empty()
    }
}
