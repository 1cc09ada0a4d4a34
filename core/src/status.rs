//! Transient status messages for UI components.
//!
//! # Design
//! The helper does not know about any UI framework. It writes through a
//! `StatusSink` (any `Fn(&str)` closure works), shows the message at once and
//! schedules a write of `""` after the TTL on a tokio runtime. The runtime
//! `Handle` is captured at construction, so the helper can be called from
//! threads that are not running tokio.
//!
//! Setting a new message cancels the pending clear of the previous one, so a
//! message always stays visible for the full TTL. The clear timer is detached:
//! dropping the helper does not stop it.
//!
//! The sink is never called with the lock held, so a sink may call back into
//! the helper. A timer that fired while a newer message was being written
//! restores the newest message after its clear.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::{Handle, TryCurrentError};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::config::ClientConfig;

/// How long a status message stays visible.
pub const STATUS_MESSAGE_TTL: Duration = Duration::from_millis(5000);

/// Receives the text to display. `""` means "no message".
pub trait StatusSink: Send + Sync + 'static {
    fn set_status(&self, message: &str);
}

impl<F> StatusSink for F
where
    F: Fn(&str) + Send + Sync + 'static,
{
    fn set_status(&self, message: &str) {
        self(message)
    }
}

#[derive(Debug, Default)]
struct Pending {
    generation: u64,
    message: String,
    timer: Option<JoinHandle<()>>,
}

impl Pending {
    /// Starts a new generation, cancelling the clear of the previous one.
    fn supersede(&mut self, message: &str) -> u64 {
        self.generation += 1;
        self.message = message.to_string();
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        self.generation
    }
}

pub struct StatusMessage<S> {
    sink: Arc<S>,
    ttl: Duration,
    runtime: Handle,
    pending: Arc<Mutex<Pending>>,
}

impl<S: StatusSink> StatusMessage<S> {
    pub fn new(sink: S, runtime: Handle) -> Self {
        Self::with_ttl(sink, STATUS_MESSAGE_TTL, runtime)
    }

    pub fn with_ttl(sink: S, ttl: Duration, runtime: Handle) -> Self {
        Self {
            sink: Arc::new(sink),
            ttl,
            runtime,
            pending: Arc::new(Mutex::new(Pending::default())),
        }
    }

    pub fn from_config(sink: S, config: &ClientConfig, runtime: Handle) -> Self {
        Self::with_ttl(sink, config.status_message_ttl, runtime)
    }

    /// Binds the helper to the runtime of the calling context.
    pub fn try_current(sink: S) -> Result<Self, TryCurrentError> {
        Ok(Self::new(sink, Handle::try_current()?))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Shows `message` now and clears it after the TTL.
    pub fn set_status_message(&self, message: &str) {
        let generation = lock(&self.pending).supersede(message);
        self.sink.set_status(message);

        let mut pending = lock(&self.pending);
        if pending.generation != generation {
            // A later call owns the clear.
            return;
        }
        let sink = Arc::clone(&self.sink);
        let state = Arc::clone(&self.pending);
        let deadline = Instant::now() + self.ttl;
        pending.timer = Some(self.runtime.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            {
                let mut pending = lock(&state);
                if pending.generation != generation {
                    return;
                }
                pending.timer = None;
                pending.message.clear();
            }
            sink.set_status("");

            let newer = {
                let pending = lock(&state);
                (pending.generation != generation).then(|| pending.message.clone())
            };
            if let Some(message) = newer {
                sink.set_status(&message);
            }
        }));
    }

    /// Clears the message now and drops any pending timer.
    pub fn clear(&self) {
        lock(&self.pending).supersede("");
        self.sink.set_status("");
    }

    pub fn is_pending(&self) -> bool {
        lock(&self.pending).timer.is_some()
    }
}

// The guarded data stays consistent even if a sink panicked mid-update.
fn lock(pending: &Mutex<Pending>) -> MutexGuard<'_, Pending> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use std::sync::{OnceLock, Weak};

    use super::*;

    type Shown = Arc<Mutex<Vec<String>>>;

    fn recorder() -> (Shown, impl Fn(&str) + Send + Sync + 'static) {
        let shown: Shown = Arc::default();
        let sink_shown = Arc::clone(&shown);
        let sink = move |message: &str| sink_shown.lock().unwrap().push(message.to_string());
        (shown, sink)
    }

    fn current(shown: &Shown) -> String {
        shown.lock().unwrap().last().cloned().unwrap_or_default()
    }

    async fn advance(ms: u64) {
        tokio::time::advance(Duration::from_millis(ms)).await;
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn message_is_set_immediately_and_cleared_after_ttl() {
        let (shown, sink) = recorder();
        let status = StatusMessage::try_current(sink).unwrap();

        status.set_status_message("Saved");
        assert_eq!(current(&shown), "Saved");
        assert!(status.is_pending());

        advance(4999).await;
        assert_eq!(current(&shown), "Saved");

        advance(1).await;
        assert_eq!(current(&shown), "");
        assert!(!status.is_pending());
        assert_eq!(*shown.lock().unwrap(), vec!["Saved", ""]);
    }

    #[tokio::test(start_paused = true)]
    async fn newer_message_is_not_cleared_by_older_timer() {
        let (shown, sink) = recorder();
        let status = StatusMessage::try_current(sink).unwrap();

        status.set_status_message("first");
        advance(3000).await;
        status.set_status_message("second");

        advance(2000).await;
        assert_eq!(current(&shown), "second");

        advance(3000).await;
        assert_eq!(current(&shown), "");
        assert_eq!(*shown.lock().unwrap(), vec!["first", "second", ""]);
    }

    #[tokio::test(start_paused = true)]
    async fn clear_cancels_pending_timer() {
        let (shown, sink) = recorder();
        let config = ClientConfig {
            status_message_ttl: Duration::from_millis(100),
            ..ClientConfig::default()
        };
        let status = StatusMessage::from_config(sink, &config, Handle::current());
        assert_eq!(status.ttl(), Duration::from_millis(100));

        status.set_status_message("busy");
        status.clear();
        assert!(!status.is_pending());

        advance(200).await;
        assert_eq!(*shown.lock().unwrap(), vec!["busy", ""]);
    }

    #[tokio::test(start_paused = true)]
    async fn message_is_cleared_after_the_helper_is_dropped() {
        let (shown, sink) = recorder();
        StatusMessage::try_current(sink)
            .unwrap()
            .set_status_message("Saved");

        advance(6000).await;
        assert_eq!(*shown.lock().unwrap(), vec!["Saved", ""]);
    }

    #[test]
    fn works_from_a_thread_without_a_runtime() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_time()
            .build()
            .unwrap();
        let (shown, sink) = recorder();
        let status = StatusMessage::with_ttl(sink, Duration::from_millis(20), runtime.handle().clone());

        status.set_status_message("x");
        assert_eq!(current(&shown), "x");

        let mut waited = Duration::ZERO;
        while !current(&shown).is_empty() && waited < Duration::from_secs(5) {
            std::thread::sleep(Duration::from_millis(10));
            waited += Duration::from_millis(10);
        }
        assert_eq!(*shown.lock().unwrap(), vec!["x", ""]);
    }

    #[test]
    fn try_current_fails_outside_a_runtime() {
        let (_shown, sink) = recorder();
        assert!(StatusMessage::try_current(sink).is_err());
    }

    /// Sink that asks the helper for its state on every write.
    #[derive(Default)]
    struct Reentrant {
        seen: Mutex<Vec<(String, bool)>>,
        helper: OnceLock<Weak<StatusMessage<Reentrant>>>,
    }

    impl StatusSink for Reentrant {
        fn set_status(&self, message: &str) {
            let pending = self
                .helper
                .get()
                .and_then(Weak::upgrade)
                .is_some_and(|helper| helper.is_pending());
            self.seen.lock().unwrap().push((message.to_string(), pending));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn sink_may_call_back_into_the_helper() {
        let status = Arc::new(StatusMessage::try_current(Reentrant::default()).unwrap());
        let _ = status.sink().helper.set(Arc::downgrade(&status));

        status.set_status_message("Saved");
        advance(5000).await;
        status.set_status_message("Again");
        status.clear();

        let seen = status.sink().seen.lock().unwrap().clone();
        assert_eq!(
            seen,
            vec![
                ("Saved".to_string(), false),
                (String::new(), false),
                ("Again".to_string(), false),
                (String::new(), false),
            ]
        );
    }
}
