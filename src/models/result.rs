// src/models/result.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{error::AppError, session::SessionState};

/// One submitted answer, with the correct option and explanation copied at
/// submission time. Never overwritten once recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerEntry {
    pub question_index: usize,
    pub prompt: String,
    /// The option the user picked; empty means "no selection".
    pub selected_option: String,
    pub correct_option: String,
    pub explanation: String,
}

impl AnswerEntry {
    pub fn is_correct(&self) -> bool {
        self.selected_option == self.correct_option
    }
}

/// Per-question breakdown of a finalized session, plus the aggregate score.
#[derive(Debug, Clone, Serialize)]
pub struct ResultRecord {
    /// Entries in original pool order, one per question.
    pub entries: Vec<AnswerEntry>,
    pub score: u32,
    pub total: usize,
    pub passed: bool,
}

impl ResultRecord {
    /// Compiles a finalized session into its result record. Entries come
    /// out ordered by question index, which for a finalized session covers
    /// the whole pool.
    pub fn compile(state: &SessionState) -> Result<Self, AppError> {
        if !state.is_finalized() {
            return Err(AppError::SessionNotFinalized);
        }

        let entries: Vec<AnswerEntry> = state.answers().values().cloned().collect();
        let score = state.score();
        let total = state.total();

        Ok(Self {
            entries,
            score,
            total,
            passed: passed(score, total),
        })
    }
}

/// Majority threshold: 3 of 5 with the default pool size.
fn passed(score: u32, total: usize) -> bool {
    score as usize >= total.div_ceil(2)
}

/// Field set consumed by the certificate renderer. Pure data, no layout.
#[derive(Debug, Clone, Serialize)]
pub struct CertificateFields {
    pub recipient_name: String,
    pub score: u32,
    pub total: usize,
    pub issued_date: NaiveDate,
    /// Drives the pass/fail color treatment only.
    pub passed: bool,
}

impl CertificateFields {
    pub fn new(result: &ResultRecord, recipient_name: &str, issued_date: NaiveDate) -> Self {
        Self {
            recipient_name: recipient_name.to_string(),
            score: result.score,
            total: result.total,
            issued_date,
            passed: result.passed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::{QuestionBank, QuestionRecord};
    use crate::session::POOL_SIZE;

    fn bank() -> QuestionBank {
        let records = (0..8)
            .map(|i| QuestionRecord {
                id: 0,
                prompt: format!("Question {}", i),
                options: vec![
                    "right".to_string(),
                    "wrong 1".to_string(),
                    "wrong 2".to_string(),
                    "wrong 3".to_string(),
                ],
                correct_option: "right".to_string(),
                explanation: format!("Explanation {}", i),
            })
            .collect();
        QuestionBank::from_records(records).unwrap()
    }

    #[test]
    fn compile_rejects_active_session() {
        let state = SessionState::start(&bank()).unwrap();
        assert!(matches!(
            ResultRecord::compile(&state),
            Err(AppError::SessionNotFinalized)
        ));
    }

    #[test]
    fn compile_rejects_almost_finished_session() {
        let mut state = SessionState::start(&bank()).unwrap();
        for _ in 0..POOL_SIZE - 1 {
            state.submit_answer("right").unwrap();
        }
        assert!(matches!(
            ResultRecord::compile(&state),
            Err(AppError::SessionNotFinalized)
        ));
    }

    #[test]
    fn entries_come_out_in_pool_order() {
        let mut state = SessionState::start(&bank()).unwrap();
        for _ in 0..POOL_SIZE {
            state.submit_answer("right").unwrap();
        }

        let result = ResultRecord::compile(&state).unwrap();
        assert_eq!(result.entries.len(), POOL_SIZE);
        for (i, entry) in result.entries.iter().enumerate() {
            assert_eq!(entry.question_index, i);
            assert_eq!(entry.prompt, state.pool()[i].prompt);
        }
    }

    #[test]
    fn perfect_run_passes() {
        let mut state = SessionState::start(&bank()).unwrap();
        for _ in 0..POOL_SIZE {
            state.submit_answer("right").unwrap();
        }

        let result = ResultRecord::compile(&state).unwrap();
        assert_eq!(result.score, 5);
        assert_eq!(result.total, 5);
        assert!(result.passed);
    }

    #[test]
    fn two_of_five_fails() {
        let mut state = SessionState::start(&bank()).unwrap();
        state.submit_answer("right").unwrap();
        state.submit_answer("right").unwrap();
        state.submit_answer("wrong 1").unwrap();
        state.submit_answer("").unwrap();
        state.submit_answer("wrong 2").unwrap();

        let result = ResultRecord::compile(&state).unwrap();
        assert_eq!(result.score, 2);
        assert!(!result.passed);
    }

    #[test]
    fn three_of_five_is_the_threshold() {
        assert!(!passed(2, 5));
        assert!(passed(3, 5));
        assert!(passed(5, 5));
        assert!(!passed(0, 5));
    }

    #[test]
    fn certificate_fields_project_the_result() {
        let mut state = SessionState::start(&bank()).unwrap();
        for _ in 0..POOL_SIZE {
            state.submit_answer("right").unwrap();
        }
        let result = ResultRecord::compile(&state).unwrap();

        let date = NaiveDate::from_ymd_opt(2026, 8, 8).unwrap();
        let fields = CertificateFields::new(&result, "quizmaster", date);

        assert_eq!(fields.recipient_name, "quizmaster");
        assert_eq!(fields.score, 5);
        assert_eq!(fields.total, 5);
        assert_eq!(fields.issued_date, date);
        assert!(fields.passed);
    }
}
