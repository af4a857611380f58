//! Terminal rendering of batch progress.
//!
//! The core drives a single in-place progress notice per batch; here that is
//! an indicatif spinner, recreated lazily because each loader batch hides the
//! notice when it finishes.

use indicatif::ProgressBar;
use mediapress_core::ProgressReporter;
use std::sync::Mutex;
use std::time::Duration;

pub struct SpinnerReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl SpinnerReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn active(&self) -> ProgressBar {
        let mut guard = self.bar.lock().unwrap();
        if let Some(bar) = guard.as_ref() {
            return bar.clone();
        }
        let bar = ProgressBar::new_spinner();
        bar.enable_steady_tick(Duration::from_millis(120));
        *guard = Some(bar.clone());
        bar
    }
}

impl Default for SpinnerReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for SpinnerReporter {
    fn notify(&self, message: &str, _auto_dismiss: Option<Duration>) {
        let guard = self.bar.lock().unwrap();
        match guard.as_ref() {
            // Print above the live spinner so the message is not overdrawn
            Some(bar) => bar.println(message),
            None => println!("{message}"),
        }
    }

    fn update(&self, message: &str) {
        self.active().set_message(message.to_string());
    }

    fn hide(&self) {
        if let Some(bar) = self.bar.lock().unwrap().take() {
            bar.finish_and_clear();
        }
    }
}
