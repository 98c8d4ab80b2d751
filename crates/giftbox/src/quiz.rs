//! Quiz engine: question progression and answer checking.

use giftbox_common::{AnswerOutcome, GiftboxError, Question, QuizConfiguration};
use std::sync::Arc;

/// Transient per-session progress
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizProgress {
    /// Index of the question being asked
    pub current_index: usize,
    /// Text typed so far for the current question
    pub current_answer_input: String,
    /// Inline message from the last failed check
    pub error_message: Option<String>,
}

/// One quiz session over an immutable configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizEngine {
    config: Arc<QuizConfiguration>,
    progress: QuizProgress,
    completed: bool,
}

impl QuizEngine {
    /// Start a session at the first question
    pub fn new(config: QuizConfiguration) -> Result<Self, GiftboxError> {
        QuizConfiguration::validate_questions(&config.questions)?;

        Ok(Self {
            config: Arc::new(config),
            progress: QuizProgress::default(),
            completed: false,
        })
    }

    pub fn current_question(&self) -> &Question {
        // current_index only advances after a bounds check
        &self.config.questions[self.progress.current_index]
    }

    pub fn progress(&self) -> &QuizProgress {
        &self.progress
    }

    pub fn question_count(&self) -> usize {
        self.config.questions.len()
    }

    /// Questions answered correctly so far
    pub fn answered(&self) -> usize {
        if self.completed {
            self.question_count()
        } else {
            self.progress.current_index
        }
    }

    /// The unlock PIN, available only once every question is answered
    pub fn unlock_pin(&self) -> Option<&str> {
        self.completed.then_some(self.config.unlock_pin.as_str())
    }

    /// Record typed text; clears any previous error
    pub fn set_input(&mut self, input: impl Into<String>) {
        self.progress.current_answer_input = input.into();
        self.progress.error_message = None;
    }

    /// Check the typed text against the current question
    pub fn submit_current(&mut self) -> AnswerOutcome {
        let input = std::mem::take(&mut self.progress.current_answer_input);
        let outcome = self.submit_answer(&input);
        if outcome == AnswerOutcome::Incorrect {
            self.progress.current_answer_input = input;
        }
        outcome
    }

    /// Check `input` against the current question.
    ///
    /// A correct answer advances to the next question, or completes the
    /// quiz on the last one. Once complete the engine stays on the last
    /// question and further submissions never change the outcome.
    pub fn submit_answer(&mut self, input: &str) -> AnswerOutcome {
        let question = self.current_question();

        if !question.accepts(input) {
            tracing::debug!(
                question_id = question.id,
                index = self.progress.current_index,
                "Incorrect answer"
            );
            self.progress.error_message = Some(GiftboxError::AnswerIncorrect.to_string());
            return AnswerOutcome::Incorrect;
        }

        let question_id = question.id;
        self.progress.error_message = None;
        self.progress.current_answer_input.clear();

        if self.completed {
            return AnswerOutcome::Correct;
        }

        if self.progress.current_index + 1 < self.question_count() {
            self.progress.current_index += 1;
            tracing::debug!(
                question_id,
                next_index = self.progress.current_index,
                "Correct answer"
            );
        } else {
            self.completed = true;
            tracing::info!(questions = self.question_count(), "Quiz complete, PIN revealed");
        }

        AnswerOutcome::Correct
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> QuizEngine {
        QuizEngine::new(QuizConfiguration::default()).unwrap()
    }

    #[test]
    fn test_starts_at_first_question() {
        let quiz = engine();
        assert_eq!(quiz.progress(), &QuizProgress::default());
        assert_eq!(quiz.current_question().id, 1);
        assert_eq!(quiz.unlock_pin(), None);
    }

    #[test]
    fn test_rejects_empty_configuration() {
        let result = QuizEngine::new(QuizConfiguration::new(Vec::new(), "1"));
        assert!(result.is_err());
    }

    #[test]
    fn test_incorrect_answer_keeps_position() {
        let mut quiz = engine();
        quiz.set_input("2");

        assert_eq!(quiz.submit_current(), AnswerOutcome::Incorrect);
        assert_eq!(quiz.progress().current_index, 0);
        assert_eq!(quiz.progress().current_answer_input, "2");
        assert_eq!(
            quiz.progress().error_message.as_deref(),
            Some("Wrong answer, try again!")
        );

        quiz.set_input("");
        assert_eq!(quiz.progress().error_message, None);
    }

    #[test]
    fn test_full_run_reveals_pin() {
        let mut quiz = engine();

        assert_eq!(quiz.submit_answer(" 1 "), AnswerOutcome::Correct);
        assert_eq!(quiz.progress().current_index, 1);
        assert_eq!(quiz.submit_answer("4"), AnswerOutcome::Correct);
        assert_eq!(quiz.progress().current_index, 2);
        assert_eq!(quiz.answered(), 2);
        assert_eq!(quiz.submit_answer("24"), AnswerOutcome::Correct);

        assert_eq!(quiz.answered(), 3);
        assert_eq!(quiz.unlock_pin(), Some("142"));
        assert_eq!(quiz.progress().error_message, None);
        assert!(quiz.progress().current_answer_input.is_empty());
    }

    #[test]
    fn test_completion_is_stable() {
        let mut quiz = engine();
        for answer in ["1", "4", "24"] {
            quiz.submit_answer(answer);
        }

        assert_eq!(quiz.submit_answer("24"), AnswerOutcome::Correct);
        assert_eq!(quiz.submit_answer("nope"), AnswerOutcome::Incorrect);
        assert_eq!(quiz.progress().current_index, 2);
        assert_eq!(quiz.unlock_pin(), Some("142"));
    }

    #[test]
    fn test_skipping_ahead_is_incorrect() {
        let mut quiz = engine();
        assert_eq!(quiz.submit_answer("4"), AnswerOutcome::Incorrect);
        assert_eq!(quiz.submit_answer("24"), AnswerOutcome::Incorrect);
        assert_eq!(quiz.progress().current_index, 0);
    }
}
