//! Shutdown coordination for the server.

use std::future::Future;

use tokio::sync::watch;

/// Coordinator for graceful shutdown.
///
/// One trigger, any number of waiters; waiters created after the trigger
/// still resolve.
pub struct Shutdown {
    triggered: watch::Sender<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (triggered, _) = watch::channel(false);
        Self { triggered }
    }

    /// A future that resolves once [`trigger`](Self::trigger) has been called.
    pub fn wait(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut triggered = self.triggered.subscribe();
        async move {
            // An error means the coordinator was dropped: treat as shutdown.
            let _ = triggered.wait_for(|fired| *fired).await;
        }
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        self.triggered.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.triggered.borrow()
    }

    /// Number of [`wait`](Self::wait) futures still alive.
    pub fn waiter_count(&self) -> usize {
        self.triggered.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_trigger_reaches_every_waiter() {
        let shutdown = Shutdown::new();
        let a = tokio::spawn(shutdown.wait());
        let b = tokio::spawn(shutdown.wait());
        assert_eq!(shutdown.waiter_count(), 2);

        shutdown.trigger();
        a.await.unwrap();
        b.await.unwrap();
        assert_eq!(shutdown.waiter_count(), 0);
    }

    #[tokio::test]
    async fn test_wait_after_trigger_resolves() {
        let shutdown = Shutdown::new();
        assert!(!shutdown.is_triggered());
        let early = shutdown.wait();
        shutdown.trigger();
        early.await;
        shutdown.wait().await;
        assert!(shutdown.is_triggered());
    }
}
