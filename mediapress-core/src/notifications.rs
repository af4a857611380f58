//! User-facing progress notices.
//!
//! A batch owns a single progress notice that is updated in place per file;
//! one-off messages (found counts, completion, errors) go through `notify`.
//! The CLI renders this with a progress spinner; [`LogReporter`] routes
//! everything to the log.

use std::time::Duration;

/// Sink for batch progress messages.
pub trait ProgressReporter {
    /// Shows a one-off message, optionally auto-dismissed after a duration.
    fn notify(&self, message: &str, auto_dismiss: Option<Duration>);

    /// Updates the single shared progress notice in place.
    fn update(&self, message: &str);

    /// Hides the shared progress notice.
    fn hide(&self);
}

/// Reporter that writes everything to the log.
#[derive(Debug, Clone, Default)]
pub struct LogReporter;

impl ProgressReporter for LogReporter {
    fn notify(&self, message: &str, _auto_dismiss: Option<Duration>) {
        log::info!("{message}");
    }

    fn update(&self, message: &str) {
        log::info!("{message}");
    }

    fn hide(&self) {}
}

pub mod mocks {
    use super::ProgressReporter;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum ReporterEvent {
        Notice(String),
        Update(String),
        Hidden,
    }

    /// Reporter that records every event for assertions.
    #[derive(Debug, Default)]
    pub struct RecordingReporter {
        events: Mutex<Vec<ReporterEvent>>,
    }

    impl RecordingReporter {
        pub fn new() -> Self {
            Default::default()
        }

        pub fn events(&self) -> Vec<ReporterEvent> {
            self.events.lock().unwrap().clone()
        }

        pub fn notices(&self) -> Vec<String> {
            self.events()
                .into_iter()
                .filter_map(|e| match e {
                    ReporterEvent::Notice(m) => Some(m),
                    _ => None,
                })
                .collect()
        }

        pub fn updates(&self) -> Vec<String> {
            self.events()
                .into_iter()
                .filter_map(|e| match e {
                    ReporterEvent::Update(m) => Some(m),
                    _ => None,
                })
                .collect()
        }
    }

    impl ProgressReporter for RecordingReporter {
        fn notify(&self, message: &str, _auto_dismiss: Option<Duration>) {
            self.events
                .lock()
                .unwrap()
                .push(ReporterEvent::Notice(message.to_string()));
        }

        fn update(&self, message: &str) {
            self.events
                .lock()
                .unwrap()
                .push(ReporterEvent::Update(message.to_string()));
        }

        fn hide(&self) {
            self.events.lock().unwrap().push(ReporterEvent::Hidden);
        }
    }
}
