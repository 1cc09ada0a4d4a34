//! Injectable diagnostic logging for `TodoService`.
//!
//! The service never writes to a global sink directly; it is handed a
//! `Logger`. `TracingLogger` is the default and routes lines into `tracing`.

use std::sync::Arc;

/// Single-method logging capability.
pub trait Logger: Send + Sync {
    fn log(&self, message: &str);
}

/// Emits every line as a `tracing` info event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, message: &str) {
        tracing::info!(target: "todo_service", "{message}");
    }
}

/// Discards every line.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn log(&self, _message: &str) {}
}

impl<L: Logger + ?Sized> Logger for &L {
    fn log(&self, message: &str) {
        (**self).log(message)
    }
}

impl<L: Logger + ?Sized> Logger for Arc<L> {
    fn log(&self, message: &str) {
        (**self).log(message)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl Logger for Recorder {
        fn log(&self, message: &str) {
            self.0.lock().unwrap().push(message.to_string());
        }
    }

    #[test]
    fn shared_logger_sees_lines_from_every_handle() {
        let recorder = Arc::new(Recorder::default());
        let a: Arc<dyn Logger> = recorder.clone();
        let b = &*recorder;
        a.log("one");
        b.log("two");
        assert_eq!(*recorder.0.lock().unwrap(), vec!["one", "two"]);
    }

    #[test]
    fn noop_logger_accepts_anything() {
        NoopLogger.log("ignored");
        TracingLogger.log("no subscriber installed");
    }
}
