//! Scanner that replays a fixed list of codes.

use giftbox_common::GiftboxError;
use giftbox_common::constants::DECODE_CHANNEL_CAPACITY;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::ScanCapability;

/// Delivers pre-recorded codes one by one, then closes the channel
pub struct ReplayScanner {
    codes: Vec<String>,
    interval: Duration,
    task: Option<JoinHandle<()>>,
}

impl ReplayScanner {
    pub fn new(codes: Vec<String>, interval: Duration) -> Self {
        Self {
            codes,
            interval,
            task: None,
        }
    }
}

impl ScanCapability for ReplayScanner {
    fn start(&mut self) -> Result<mpsc::Receiver<String>, GiftboxError> {
        self.stop();

        if self.codes.is_empty() {
            return Err(GiftboxError::CaptureUnavailable(
                "no codes to replay".to_string(),
            ));
        }

        let (tx, rx) = mpsc::channel(DECODE_CHANNEL_CAPACITY);
        let codes = self.codes.clone();
        let interval = self.interval;

        self.task = Some(tokio::spawn(async move {
            for code in codes {
                tokio::time::sleep(interval).await;
                if tx.send(code).await.is_err() {
                    break;
                }
            }
            tracing::debug!("Replay finished");
        }));

        tracing::debug!(codes = self.codes.len(), "Replay scanner started");
        Ok(rx)
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::debug!("Replay scanner stopped");
        }
    }

    fn is_active(&self) -> bool {
        self.task.is_some()
    }
}

impl Drop for ReplayScanner {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replays_codes_in_order_then_closes() {
        let mut scanner =
            ReplayScanner::new(vec!["a".into(), "b".into()], Duration::ZERO);
        let mut rx = scanner.start().unwrap();
        assert!(scanner.is_active());

        assert_eq!(rx.recv().await.as_deref(), Some("a"));
        assert_eq!(rx.recv().await.as_deref(), Some("b"));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_stop_is_idempotent() {
        let mut scanner = ReplayScanner::new(vec!["a".into()], Duration::from_secs(60));
        scanner.stop();

        let mut rx = scanner.start().unwrap();
        scanner.stop();
        scanner.stop();
        assert!(!scanner.is_active());
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_nothing_to_replay() {
        let mut scanner = ReplayScanner::new(Vec::new(), Duration::ZERO);
        tokio_test::assert_err!(scanner.start());
    }
}
