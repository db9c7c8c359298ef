// Cancellable scheduled task.
// Runs an action once its input has been quiet for a fixed window.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Holds at most one pending timer; scheduling again cancels the previous one.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Run `action` after the quiet period unless superseded or cancelled first.
    /// Must be called from within a tokio runtime.
    pub fn schedule<Fut>(&mut self, action: Fut)
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action.await;
        }));
    }

    /// Cancel the pending timer, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Whether a timer is still waiting to fire.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[tokio::test(start_paused = true)]
    async fn test_only_last_action_fires() {
        let fired = Arc::new(Mutex::new(Vec::new()));
        let mut debouncer = Debouncer::new(Duration::from_millis(500));

        for word in ["a", "ap", "app"] {
            let fired = fired.clone();
            debouncer.schedule(async move {
                fired.lock().unwrap().push(word);
            });
            tokio::time::sleep(Duration::from_millis(40)).await;
        }

        assert!(debouncer.is_pending());
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(*fired.lock().unwrap(), ["app"]);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_for_quiet_period() {
        let fired = Arc::new(Mutex::new(0));
        let mut debouncer = Debouncer::new(Duration::from_millis(500));

        let counter = fired.clone();
        debouncer.schedule(async move {
            *counter.lock().unwrap() += 1;
        });

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert_eq!(*fired.lock().unwrap(), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(*fired.lock().unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending() {
        let fired = Arc::new(Mutex::new(false));
        {
            let mut debouncer = Debouncer::new(Duration::from_millis(100));
            let flag = fired.clone();
            debouncer.schedule(async move {
                *flag.lock().unwrap() = true;
            });
        }

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(!*fired.lock().unwrap());
    }
}
