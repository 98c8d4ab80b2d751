//! Flow controller: Scan -> Quiz -> Confirm -> Celebrate.
//!
//! The controller owns the single stage of the session and publishes every
//! change on a watch channel. There is no way back: each stage only moves
//! forward, and `Celebrate` accepts nothing.

use giftbox_common::{ConfirmStage, FlowState, GiftboxError};
use std::sync::Arc;
use tokio::sync::watch;

use crate::quiz::QuizEngine;
use crate::scan::SecretVerifier;
use crate::store::ConfigurationStore;

/// The current stage together with the data it displays
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Scan { error: Option<String> },
    Quiz(QuizEngine),
    Confirm { unlock_pin: String, stage: ConfirmStage },
    Celebrate,
}

impl Stage {
    pub fn state(&self) -> FlowState {
        match self {
            Self::Scan { .. } => FlowState::Scan,
            Self::Quiz(_) => FlowState::Quiz,
            Self::Confirm { .. } => FlowState::Confirm,
            Self::Celebrate => FlowState::Celebrate,
        }
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::Scan { error: None }
    }
}

/// Inputs to the flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEvent {
    /// The scan capability decoded a code
    Decoded(String),
    /// The scan capability could not start or stopped
    CaptureUnavailable(String),
    /// Clear the inline scan message
    DismissError,
    /// Check this answer for the current question
    SubmitAnswer(String),
    /// "Not yet" on the gift confirmation
    Decline,
    /// Gift opened
    Confirm,
}

impl FlowEvent {
    /// Event name for logs (payloads may hold secrets or answers)
    pub fn name(&self) -> &'static str {
        match self {
            Self::Decoded(_) => "decoded",
            Self::CaptureUnavailable(_) => "capture_unavailable",
            Self::DismissError => "dismiss_error",
            Self::SubmitAnswer(_) => "submit_answer",
            Self::Decline => "decline",
            Self::Confirm => "confirm",
        }
    }
}

/// Drives one session through the four stages
pub struct FlowController {
    verifier: Arc<SecretVerifier>,
    quiz_config: ConfigurationStore,
    stage: watch::Sender<Stage>,
}

impl FlowController {
    /// Create a controller in `Scan`
    pub fn new(verifier: Arc<SecretVerifier>, quiz_config: ConfigurationStore) -> Self {
        let (stage, _) = watch::channel(Stage::default());
        Self {
            verifier,
            quiz_config,
            stage,
        }
    }

    /// Observe stage changes
    pub fn subscribe(&self) -> watch::Receiver<Stage> {
        self.stage.subscribe()
    }

    pub fn state(&self) -> FlowState {
        self.stage.borrow().state()
    }

    /// Snapshot of the current stage
    pub fn stage(&self) -> Stage {
        self.stage.borrow().clone()
    }

    /// Apply an event and return the resulting state.
    ///
    /// Subscribers are only notified when the stage actually changed.
    pub fn handle(&self, event: FlowEvent) -> FlowState {
        let current = self.stage();
        let from = current.state();
        let next = self.transition(current, event);
        let to = next.state();

        if from != to {
            tracing::info!(from = ?from, to = ?to, "Flow advanced");
        }

        self.stage.send_if_modified(|stage| {
            if *stage == next {
                false
            } else {
                *stage = next;
                true
            }
        });

        to
    }

    fn transition(&self, stage: Stage, event: FlowEvent) -> Stage {
        match (stage, event) {
            (Stage::Scan { .. }, FlowEvent::Decoded(text)) => match self.verifier.check(&text) {
                Ok(()) => self.begin_quiz(),
                Err(e) => scan_error(&e),
            },
            (Stage::Scan { .. }, FlowEvent::CaptureUnavailable(reason)) => {
                tracing::warn!(reason = %reason, "Capture unavailable");
                scan_error(&GiftboxError::CaptureUnavailable(reason))
            }
            (Stage::Scan { .. }, FlowEvent::DismissError) => Stage::Scan { error: None },

            (Stage::Quiz(mut quiz), FlowEvent::SubmitAnswer(text)) => {
                quiz.set_input(text);
                quiz.submit_current();
                match quiz.unlock_pin() {
                    Some(pin) => Stage::Confirm {
                        unlock_pin: pin.to_string(),
                        stage: ConfirmStage::Asking,
                    },
                    None => Stage::Quiz(quiz),
                }
            }

            (Stage::Confirm { unlock_pin, .. }, FlowEvent::Decline) => Stage::Confirm {
                unlock_pin,
                stage: ConfirmStage::Waiting,
            },
            (Stage::Confirm { .. }, FlowEvent::Confirm) => Stage::Celebrate,

            (stage, event) => {
                tracing::debug!(
                    state = ?stage.state(),
                    event = event.name(),
                    "Event ignored in current state"
                );
                stage
            }
        }
    }

    /// Fresh quiz session over the configuration as stored right now
    fn begin_quiz(&self) -> Stage {
        match QuizEngine::new(self.quiz_config.load()) {
            Ok(quiz) => Stage::Quiz(quiz),
            Err(e) => {
                tracing::error!(error = %e, "Quiz configuration unusable");
                scan_error(&e)
            }
        }
    }
}

/// Back to `Scan` with an inline message; internal failures get a generic one
fn scan_error(e: &GiftboxError) -> Stage {
    let message = if e.is_user_facing() {
        e.to_string()
    } else {
        "Something went wrong. Please scan again.".to_string()
    };

    Stage::Scan {
        error: Some(message),
    }
}
