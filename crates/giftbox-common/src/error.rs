//! Error taxonomy for the Giftbox flow.

use thiserror::Error;

/// Errors detected by the flow components.
///
/// The `Display` output of the user-facing variants is the inline message
/// shown next to the step that produced it.
#[derive(Debug, Error)]
pub enum GiftboxError {
    /// The scan capability could not start or stopped delivering codes
    #[error("Could not access the camera ({0}). Make sure camera access is allowed, then retry.")]
    CaptureUnavailable(String),

    /// A decoded code did not match the scan secret
    #[error("That code is not valid. Try again!")]
    DecodeMismatch,

    /// A quiz answer did not match the expected answer
    #[error("Wrong answer, try again!")]
    AnswerIncorrect,

    /// Persisted quiz configuration could not be parsed
    #[error("Configuration parse error: {0}")]
    ConfigParse(String),

    /// Key-value store read/write failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid edit or input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl GiftboxError {
    /// Returns true if this error is shown to the guest as an inline message
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, Self::ConfigParse(_) | Self::Storage(_))
    }

    /// Returns true if the guest can simply try the same step again
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::CaptureUnavailable(_) | Self::DecodeMismatch | Self::AnswerIncorrect
        )
    }
}

impl From<serde_json::Error> for GiftboxError {
    fn from(err: serde_json::Error) -> Self {
        Self::ConfigParse(err.to_string())
    }
}
