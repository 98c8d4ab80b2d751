//! Core types shared across Giftbox components.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::constants::DEFAULT_UNLOCK_PIN;
use crate::error::GiftboxError;

/// Normalize an answer for comparison: surrounding whitespace trimmed, lower-cased.
pub fn normalize_answer(text: &str) -> String {
    text.trim().to_lowercase()
}

/// A single quiz question.
///
/// Serialized exactly as stored under the `quiz-questions` key:
/// `{ "id": 1, "question": "...", "hint": "...", "answer": "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Stable identifier, unique within a configuration
    pub id: u64,

    /// Display text
    pub question: String,

    /// Optional display hint (may be empty)
    #[serde(default)]
    pub hint: String,

    /// Expected answer
    pub answer: String,
}

impl Question {
    pub fn new(
        id: u64,
        question: impl Into<String>,
        hint: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            id,
            question: question.into(),
            hint: hint.into(),
            answer: answer.into(),
        }
    }

    /// Returns true if `input` matches the expected answer.
    ///
    /// Both sides are trimmed and lower-cased. An empty input is compared
    /// literally, so it only matches an answer that is itself blank.
    pub fn accepts(&self, input: &str) -> bool {
        normalize_answer(input) == normalize_answer(&self.answer)
    }
}

/// The built-in question set (month, day, and year the couple got together).
pub fn default_questions() -> Vec<Question> {
    vec![
        Question::new(
            1,
            "Which month did we get together?",
            "Which month of the year is it?",
            "1",
        ),
        Question::new(
            2,
            "On what day of the month did we get together?",
            "Our special date...",
            "4",
        ),
        Question::new(
            3,
            "What year did we get together? (last 2 digits)",
            "The year 20XX...",
            "24",
        ),
    ]
}

/// Questions plus the PIN revealed once every question is answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizConfiguration {
    /// Ordered questions; order is presentation order
    pub questions: Vec<Question>,

    /// Opaque display string revealed after the last correct answer
    pub unlock_pin: String,
}

impl QuizConfiguration {
    pub fn new(questions: Vec<Question>, unlock_pin: impl Into<String>) -> Self {
        Self {
            questions,
            unlock_pin: unlock_pin.into(),
        }
    }

    /// Check the question-list invariants: non-empty, unique ids
    pub fn validate_questions(questions: &[Question]) -> Result<(), GiftboxError> {
        if questions.is_empty() {
            return Err(GiftboxError::InvalidInput(
                "at least one question is required".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(questions.len());
        for q in questions {
            if !seen.insert(q.id) {
                return Err(GiftboxError::InvalidInput(format!(
                    "duplicate question id {}",
                    q.id
                )));
            }
        }

        Ok(())
    }

    /// Check every invariant required before the configuration is saved
    pub fn validate(&self) -> Result<(), GiftboxError> {
        Self::validate_questions(&self.questions)?;

        if self.unlock_pin.is_empty() {
            return Err(GiftboxError::InvalidInput(
                "the unlock PIN cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Id for the next created question (one past the current maximum)
    pub fn next_question_id(&self) -> u64 {
        self.questions.iter().map(|q| q.id).max().map_or(1, |max| max + 1)
    }

    pub fn question(&self, id: u64) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }
}

impl Default for QuizConfiguration {
    fn default() -> Self {
        Self::new(default_questions(), DEFAULT_UNLOCK_PIN)
    }
}

/// Stage of the unlocking ritual
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    /// Waiting for the scan secret
    Scan,
    /// Answering questions
    Quiz,
    /// PIN revealed, waiting for the gift to be opened
    Confirm,
    /// Final message page (terminal)
    Celebrate,
}

impl Default for FlowState {
    fn default() -> Self {
        Self::Scan
    }
}

impl FlowState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Celebrate)
    }
}

/// Affordance shown while in [`FlowState::Confirm`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmStage {
    /// Asking whether the gift has been opened
    Asking,
    /// Guest said "not yet"; only the confirm action remains
    Waiting,
}

/// Result of checking a submitted quiz answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct,
    Incorrect,
}

/// A card shown on the celebration page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CelebrationMessage {
    pub title: String,
    pub body: String,
}

impl CelebrationMessage {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Cards shown when no celebration messages are configured
pub fn default_celebration_messages() -> Vec<CelebrationMessage> {
    vec![
        CelebrationMessage::new(
            "For you <3",
            "You found the code, solved every puzzle, and opened the gift.\n\
             Thank you for playing along.",
        ),
        CelebrationMessage::new(
            "Happy Birthday",
            "Thank you for making it this far.\n\
             May the year ahead bring small reasons to smile every day,\n\
             room to breathe, and plenty of joy for every hard thing you carry.",
        ),
    ]
}
