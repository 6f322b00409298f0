//! Component-local debouncing for free-text edits.
//!
//! Each form owns one [`Debouncer`]. Scheduling aborts the pending task and
//! arms a new one; dropping the debouncer aborts whatever is still waiting.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

use exercisekit_core::config::ExerciseConfig;

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

    /// Use the configured `debounce_ms`.
    pub fn from_config(config: &ExerciseConfig) -> Self {
        Self::new(Duration::from_millis(config.debounce_ms))
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `action` after the delay unless another call supersedes it.
    ///
    /// Outside a tokio runtime there is nothing to wait on, so the action
    /// runs straight away.
    pub fn schedule<F>(&mut self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        match Handle::try_current() {
            Ok(handle) => {
                let delay = self.delay;
                self.pending = Some(handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    action();
                }));
            }
            Err(_) => {
                debug!("no tokio runtime, running debounced action immediately");
                action();
            }
        }
    }

    /// Abort the pending action. Returns `true` if one was still waiting.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay", &self.delay)
            .field("pending", &self.is_pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn counter() -> (Arc<AtomicU32>, impl Fn() -> Box<dyn FnOnce() + Send>) {
        let count = Arc::new(AtomicU32::new(0));
        let handle = Arc::clone(&count);
        let make = move || {
            let c = Arc::clone(&handle);
            Box::new(move || {
                c.fetch_add(1, Ordering::SeqCst);
            }) as Box<dyn FnOnce() + Send>
        };
        (count, make)
    }

    #[tokio::test(start_paused = true)]
    async fn only_the_last_schedule_runs() {
        let (count, make) = counter();
        let mut debouncer = Debouncer::new(Duration::from_millis(500));

        debouncer.schedule(make());
        tokio::time::sleep(Duration::from_millis(200)).await;
        debouncer.schedule(make());
        tokio::time::sleep(Duration::from_millis(200)).await;
        debouncer.schedule(make());
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_and_drop_abort_pending_work() {
        let (count, make) = counter();
        let mut debouncer = Debouncer::new(Duration::from_millis(100));
        debouncer.schedule(make());
        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());

        debouncer.schedule(make());
        drop(debouncer);
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn runs_inline_without_a_runtime() {
        let (count, make) = counter();
        let mut debouncer = Debouncer::from_config(&ExerciseConfig::default());
        assert_eq!(debouncer.delay(), Duration::from_millis(500));
        debouncer.schedule(make());
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_pending());
    }
}
