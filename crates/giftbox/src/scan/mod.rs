//! Scan capture and secret verification.
//!
//! Decoding the physical code is delegated to a capture backend that
//! delivers decoded text over a channel; the flow only ever sees strings.

mod command;
mod replay;
mod verifier;

pub use command::CommandScanner;
pub use replay::ReplayScanner;
pub use verifier::SecretVerifier;

use giftbox_common::GiftboxError;
use tokio::sync::mpsc;

/// A source of decoded scan codes with an explicit lifecycle
pub trait ScanCapability: Send {
    /// Begin decoding. Each decoded text arrives on the returned channel;
    /// the channel closes when the backend stops delivering codes.
    ///
    /// Calling `start` while running restarts the backend.
    fn start(&mut self) -> Result<mpsc::Receiver<String>, GiftboxError>;

    /// Release the capture device. Idempotent, safe when never started.
    fn stop(&mut self);

    /// Returns true between a successful `start` and the next `stop`
    fn is_active(&self) -> bool;
}
