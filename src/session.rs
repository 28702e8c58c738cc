// src/session.rs

use std::collections::BTreeMap;

use rand::seq::index::sample;

use crate::{
    error::AppError,
    models::question::{QuestionBank, QuestionRecord},
    models::result::AnswerEntry,
};

/// Number of questions sampled for one session.
pub const POOL_SIZE: usize = 5;

/// One quiz run, from login to finalization.
///
/// The pool is drawn once per session, without replacement, in random order,
/// and never re-shuffled. Navigation moves the cursor inside the pool;
/// submission records a write-once answer for the current index and always
/// advances. Once the cursor passes the last index the session is finalized
/// and rejects further submissions.
#[derive(Debug, Clone)]
pub struct SessionState {
    pool: Vec<QuestionRecord>,
    cursor: usize,
    answers: BTreeMap<usize, AnswerEntry>,
    score: u32,
}

impl SessionState {
    /// Samples `POOL_SIZE` distinct questions uniformly at random from the
    /// bank and fixes their order for the lifetime of the session.
    pub fn start(bank: &QuestionBank) -> Result<Self, AppError> {
        if bank.len() < POOL_SIZE {
            return Err(AppError::InsufficientQuestions {
                available: bank.len(),
                required: POOL_SIZE,
            });
        }

        let mut rng = rand::thread_rng();
        let pool = sample(&mut rng, bank.len(), POOL_SIZE)
            .into_iter()
            .map(|i| bank.records()[i].clone())
            .collect();

        Ok(Self {
            pool,
            cursor: 0,
            answers: BTreeMap::new(),
            score: 0,
        })
    }

    /// The question under the cursor.
    pub fn current_question(&self) -> Result<&QuestionRecord, AppError> {
        self.pool.get(self.cursor).ok_or(AppError::SessionFinalized)
    }

    /// Moves one question back. Silent clamp at the first question.
    /// Recorded answers are untouched.
    pub fn go_previous(&mut self) {
        if self.cursor > 0 && !self.is_finalized() {
            self.cursor -= 1;
        }
    }

    /// Moves one question forward. Silent clamp at the last question, so the
    /// finalized state is only reachable through `submit_answer`.
    pub fn go_next(&mut self) {
        if self.cursor + 1 < self.pool.len() {
            self.cursor += 1;
        }
    }

    /// Records the selection for the current question and advances the
    /// cursor by one, unconditionally.
    ///
    /// An empty selection is a valid submission that counts as incorrect.
    /// Answers are write-once: revisiting an already-submitted index keeps
    /// the original entry and score, the cursor still advances. Submitting
    /// past the last index finalizes the session.
    pub fn submit_answer(&mut self, selected: &str) -> Result<(), AppError> {
        if self.is_finalized() {
            return Err(AppError::SessionFinalized);
        }

        if !self.answers.contains_key(&self.cursor) {
            let question = &self.pool[self.cursor];
            let entry = AnswerEntry {
                question_index: self.cursor,
                prompt: question.prompt.clone(),
                selected_option: selected.to_string(),
                correct_option: question.correct_option.clone(),
                explanation: question.explanation.clone(),
            };
            if entry.is_correct() {
                self.score += 1;
            }
            self.answers.insert(self.cursor, entry);
        }

        self.cursor += 1;

        if self.is_finalized() {
            // The score is derived data; make the recorded entries
            // authoritative at the moment the session closes.
            self.score = self.answers.values().filter(|e| e.is_correct()).count() as u32;
        }

        Ok(())
    }

    /// True once every question was submitted. A finalized session accepts
    /// no further submissions.
    pub fn is_finalized(&self) -> bool {
        self.cursor == self.pool.len()
    }

    /// Completion ratio for progress displays, within `[0, 1)` while the
    /// session is active.
    pub fn progress(&self) -> f64 {
        self.cursor as f64 / self.pool.len() as f64
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn total(&self) -> usize {
        self.pool.len()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn pool(&self) -> &[QuestionRecord] {
        &self.pool
    }

    /// The recorded entry for a question index, if it was submitted.
    pub fn answer_for(&self, index: usize) -> Option<&AnswerEntry> {
        self.answers.get(&index)
    }

    /// All recorded entries, keyed and ordered by question index.
    pub fn answers(&self) -> &BTreeMap<usize, AnswerEntry> {
        &self.answers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank(size: usize) -> QuestionBank {
        let records = (0..size)
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

    fn submit_all(state: &mut SessionState, selected: &str) {
        for _ in 0..POOL_SIZE {
            state.submit_answer(selected).unwrap();
        }
    }

    #[test]
    fn pool_holds_five_distinct_questions() {
        let bank = bank(20);
        let state = SessionState::start(&bank).unwrap();

        assert_eq!(state.total(), POOL_SIZE);
        let mut ids: Vec<usize> = state.pool().iter().map(|q| q.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), POOL_SIZE);
    }

    #[test]
    fn bank_of_exactly_five_still_starts() {
        let bank = bank(5);
        let state = SessionState::start(&bank).unwrap();
        assert_eq!(state.total(), POOL_SIZE);
    }

    #[test]
    fn undersized_bank_is_rejected() {
        let bank = bank(4);
        match SessionState::start(&bank) {
            Err(AppError::InsufficientQuestions {
                available,
                required,
            }) => {
                assert_eq!(available, 4);
                assert_eq!(required, POOL_SIZE);
            }
            other => panic!("expected InsufficientQuestions, got {:?}", other),
        }
    }

    #[test]
    fn navigation_clamps_at_both_ends() {
        let bank = bank(8);
        let mut state = SessionState::start(&bank).unwrap();

        state.go_previous();
        assert_eq!(state.cursor(), 0);

        for _ in 0..10 {
            state.go_next();
        }
        assert_eq!(state.cursor(), POOL_SIZE - 1);
        assert!(!state.is_finalized());
    }

    #[test]
    fn navigation_does_not_clear_answers() {
        let bank = bank(8);
        let mut state = SessionState::start(&bank).unwrap();

        state.submit_answer("right").unwrap();
        state.go_previous();
        state.go_next();

        assert_eq!(state.answers().len(), 1);
        assert_eq!(state.score(), 1);
    }

    #[test]
    fn submit_advances_by_exactly_one() {
        let bank = bank(8);
        let mut state = SessionState::start(&bank).unwrap();

        for expected in 1..=POOL_SIZE {
            state.submit_answer("wrong 1").unwrap();
            assert_eq!(state.cursor(), expected);
        }
        assert!(state.is_finalized());
    }

    #[test]
    fn all_correct_scores_five() {
        let bank = bank(20);
        let mut state = SessionState::start(&bank).unwrap();
        submit_all(&mut state, "right");

        assert_eq!(state.score(), 5);
        assert!(state.is_finalized());
    }

    #[test]
    fn empty_selection_counts_incorrect_and_still_advances() {
        let bank = bank(8);
        let mut state = SessionState::start(&bank).unwrap();

        state.submit_answer("").unwrap();

        assert_eq!(state.cursor(), 1);
        assert_eq!(state.score(), 0);
        let entry = state.answer_for(0).unwrap();
        assert_eq!(entry.selected_option, "");
        assert!(!entry.is_correct());
    }

    #[test]
    fn answers_are_write_once() {
        let bank = bank(8);
        let mut state = SessionState::start(&bank).unwrap();

        state.submit_answer("wrong 1").unwrap();
        state.go_previous();
        // Second submission for index 0 keeps the original entry and does
        // not award a point, but the cursor advances as always.
        state.submit_answer("right").unwrap();

        assert_eq!(state.cursor(), 1);
        assert_eq!(state.score(), 0);
        assert_eq!(state.answer_for(0).unwrap().selected_option, "wrong 1");
    }

    #[test]
    fn every_index_is_answered_at_finalization() {
        let bank = bank(8);
        let mut state = SessionState::start(&bank).unwrap();

        // Weave navigation into the submissions; first passage through each
        // index records it, so finalization always sees a full answer set.
        state.submit_answer("right").unwrap();
        state.go_previous();
        state.submit_answer("wrong 1").unwrap();
        state.submit_answer("right").unwrap();
        state.go_previous();
        state.go_next();
        state.submit_answer("right").unwrap();
        state.submit_answer("right").unwrap();
        state.submit_answer("right").unwrap();

        assert!(state.is_finalized());
        assert_eq!(state.answers().len(), POOL_SIZE);
        assert_eq!(state.score(), 5);
    }

    #[test]
    fn finalized_session_rejects_submission() {
        let bank = bank(8);
        let mut state = SessionState::start(&bank).unwrap();
        submit_all(&mut state, "right");

        assert!(matches!(
            state.submit_answer("right"),
            Err(AppError::SessionFinalized)
        ));
        assert!(matches!(
            state.current_question(),
            Err(AppError::SessionFinalized)
        ));
    }

    #[test]
    fn score_matches_recorded_entries() {
        let bank = bank(20);
        let mut state = SessionState::start(&bank).unwrap();

        state.submit_answer("right").unwrap();
        state.submit_answer("wrong 2").unwrap();
        state.submit_answer("right").unwrap();
        state.submit_answer("").unwrap();
        state.submit_answer("wrong 3").unwrap();

        let recorded = state
            .answers()
            .values()
            .filter(|e| e.is_correct())
            .count() as u32;
        assert_eq!(state.score(), recorded);
        assert_eq!(state.score(), 2);
    }

    #[test]
    fn progress_stays_below_one_while_active() {
        let bank = bank(8);
        let mut state = SessionState::start(&bank).unwrap();

        assert_eq!(state.progress(), 0.0);
        state.submit_answer("right").unwrap();
        assert_eq!(state.progress(), 1.0 / POOL_SIZE as f64);

        for _ in 0..POOL_SIZE - 2 {
            state.submit_answer("right").unwrap();
        }
        assert!(state.progress() < 1.0);
        assert!(!state.is_finalized());
    }
}
