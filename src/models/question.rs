// src/models/question.rs

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Number of answer options every question carries.
pub const OPTION_COUNT: usize = 4;

/// One entry of the question catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// Position in the catalog. Assigned on load, stable across shuffles
    /// within one session.
    #[serde(default)]
    pub id: usize,

    /// The text content of the question.
    pub prompt: String,

    /// Exactly four distinct display strings.
    pub options: Vec<String>,

    /// Must equal exactly one element of `options` (case- and
    /// whitespace-exact).
    pub correct_option: String,

    /// Shown only after the question was submitted.
    pub explanation: String,
}

impl QuestionRecord {
    fn validate(&self, index: usize) -> Result<(), AppError> {
        if self.options.len() != OPTION_COUNT {
            return Err(AppError::BadRequest(format!(
                "question {}: expected {} options, found {}",
                index,
                OPTION_COUNT,
                self.options.len()
            )));
        }
        for (i, option) in self.options.iter().enumerate() {
            if self.options[..i].contains(option) {
                return Err(AppError::BadRequest(format!(
                    "question {}: duplicate option '{}'",
                    index, option
                )));
            }
        }
        if !self.options.contains(&self.correct_option) {
            return Err(AppError::BadRequest(format!(
                "question {}: correct option '{}' is not among the options",
                index, self.correct_option
            )));
        }
        Ok(())
    }
}

/// DTO for sending a question to the client (excludes answer and explanation).
#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub prompt: String,
    pub options: Vec<String>,
}

impl From<&QuestionRecord> for PublicQuestion {
    fn from(record: &QuestionRecord) -> Self {
        Self {
            prompt: record.prompt.clone(),
            options: record.options.clone(),
        }
    }
}

/// The fixed, validated question catalog sessions sample from.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    records: Vec<QuestionRecord>,
}

/// Catalog shipped with the binary.
const BUILTIN_BANK: &str = include_str!("../../data/questions.json");

impl QuestionBank {
    /// Parses and validates a JSON catalog. Every record must carry four
    /// distinct options with the correct one among them.
    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        let records: Vec<QuestionRecord> = serde_json::from_str(raw)?;
        Self::from_records(records)
    }

    pub fn from_records(mut records: Vec<QuestionRecord>) -> Result<Self, AppError> {
        for (index, record) in records.iter_mut().enumerate() {
            record.validate(index)?;
            record.id = index;
        }
        Ok(Self { records })
    }

    /// The catalog embedded at compile time.
    pub fn builtin() -> Result<Self, AppError> {
        Self::from_json(BUILTIN_BANK)
    }

    pub fn records(&self) -> &[QuestionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(prompt: &str, options: &[&str], correct: &str) -> QuestionRecord {
        QuestionRecord {
            id: 0,
            prompt: prompt.to_string(),
            options: options.iter().map(|s| s.to_string()).collect(),
            correct_option: correct.to_string(),
            explanation: "because".to_string(),
        }
    }

    #[test]
    fn builtin_bank_is_valid_and_large_enough() {
        let bank = QuestionBank::builtin().unwrap();
        assert!(bank.len() >= 5);
        for q in bank.records() {
            assert_eq!(q.options.len(), OPTION_COUNT);
            assert!(q.options.contains(&q.correct_option));
        }
    }

    #[test]
    fn ids_follow_catalog_order() {
        let bank = QuestionBank::builtin().unwrap();
        for (i, q) in bank.records().iter().enumerate() {
            assert_eq!(q.id, i);
        }
    }

    #[test]
    fn rejects_correct_option_outside_options() {
        let bad = record("q", &["a", "b", "c", "d"], "e");
        assert!(QuestionBank::from_records(vec![bad]).is_err());
    }

    #[test]
    fn rejects_wrong_option_count() {
        let bad = record("q", &["a", "b", "c"], "a");
        assert!(QuestionBank::from_records(vec![bad]).is_err());
    }

    #[test]
    fn rejects_duplicate_options() {
        let bad = record("q", &["a", "a", "c", "d"], "a");
        assert!(QuestionBank::from_records(vec![bad]).is_err());
    }

    #[test]
    fn match_is_case_and_whitespace_exact() {
        // "A " (trailing space) is a distinct option from "A".
        let q = record("q", &["A", "A ", "b", "c"], "A ");
        let bank = QuestionBank::from_records(vec![q]).unwrap();
        assert_eq!(bank.records()[0].correct_option, "A ");
    }
}
