//! Last-write-wins delayed task.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Runs a task after a quiet period. Scheduling again before it fires
/// aborts the pending one, including a task already past its delay.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Must be called inside a tokio runtime.
    pub fn schedule<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    #[must_use]
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
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    fn counting(counter: &Arc<AtomicU32>, add: u32) -> impl Future<Output = ()> + Send + 'static {
        let counter = Arc::clone(counter);
        async move {
            counter.fetch_add(add, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fires_after_delay() {
        let fired = Arc::new(AtomicU32::new(0));
        let mut debouncer = Debouncer::new(Duration::from_millis(400));
        debouncer.schedule(counting(&fired, 1));

        tokio::time::sleep(Duration::from_millis(399)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn reschedule_replaces_pending_task() {
        let fired = Arc::new(AtomicU32::new(0));
        let mut debouncer = Debouncer::new(Duration::from_millis(400));

        debouncer.schedule(counting(&fired, 1));
        tokio::time::sleep(Duration::from_millis(300)).await;
        debouncer.schedule(counting(&fired, 10));

        // The first deadline passes without firing.
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_and_drop_abort() {
        let fired = Arc::new(AtomicU32::new(0));

        let mut debouncer = Debouncer::new(Duration::from_millis(100));
        debouncer.schedule(counting(&fired, 1));
        debouncer.cancel();
        assert!(!debouncer.is_pending());

        let mut dropped = Debouncer::new(Duration::from_millis(100));
        dropped.schedule(counting(&fired, 1));
        drop(dropped);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
