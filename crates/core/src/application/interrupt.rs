// Interrupt Token for store client backoff waits

use crate::error::AppError;
use std::future::Future;
use tokio::sync::watch;

/// Interrupt signal, observed while the store client is backing off
#[derive(Clone)]
pub struct InterruptToken {
    rx: watch::Receiver<bool>,
}

impl InterruptToken {
    /// Check if an interrupt was requested
    pub fn is_interrupted(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait for the interrupt signal
    ///
    /// Never resolves if the sender is dropped without interrupting.
    pub async fn wait(&mut self) {
        while !*self.rx.borrow_and_update() {
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }

    /// Drive `fut` to completion unless an interrupt arrives first
    ///
    /// The losing future is dropped, so an open session rolls back.
    pub async fn run_until_interrupted<T, E, F>(&self, fut: F) -> std::result::Result<T, E>
    where
        F: Future<Output = std::result::Result<T, E>>,
        E: From<AppError>,
    {
        let mut token = self.clone();
        tokio::select! {
            result = fut => result,
            _ = token.wait() => Err(AppError::Interrupted("operation cancelled".into()).into()),
        }
    }
}

/// Interrupt sender
pub struct InterruptSender {
    tx: watch::Sender<bool>,
}

impl InterruptSender {
    /// Interrupt every operation currently backing off
    pub fn interrupt(&self) {
        let _ = self.tx.send(true);
    }
}

/// Create an interrupt channel
pub fn interrupt_channel() -> (InterruptSender, InterruptToken) {
    let (tx, rx) = watch::channel(false);
    (InterruptSender { tx }, InterruptToken { rx })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_wait_resolves_after_interrupt() {
        let (sender, mut token) = interrupt_channel();
        assert!(!token.is_interrupted());

        sender.interrupt();
        tokio::time::timeout(Duration::from_millis(100), token.wait())
            .await
            .expect("wait should resolve once interrupted");
        assert!(token.is_interrupted());
    }

    #[tokio::test]
    async fn test_dropped_sender_does_not_interrupt() {
        let (sender, mut token) = interrupt_channel();
        drop(sender);

        let waited = tokio::time::timeout(Duration::from_millis(50), token.wait()).await;
        assert!(waited.is_err(), "dropping the sender must not count as an interrupt");
        assert!(!token.is_interrupted());
    }

    #[tokio::test]
    async fn test_run_until_interrupted_passes_result_through() {
        let (_sender, token) = interrupt_channel();

        let result: Result<u32, AppError> = token.run_until_interrupted(async { Ok(7) }).await;

        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_run_until_interrupted_cancels_long_operation() {
        let (sender, token) = interrupt_channel();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            sender.interrupt();
        });

        let result: Result<(), AppError> = tokio::time::timeout(
            Duration::from_secs(5),
            token.run_until_interrupted(async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            }),
        )
        .await
        .expect("interrupt should cut the operation short");

        assert!(matches!(result, Err(AppError::Interrupted(_))));
    }
}
