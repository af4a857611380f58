//! Mock implementations of the external-tool traits for tests.

use super::ffmpeg_executor::{FfmpegProcess, FfmpegSpawner};
use super::ffprobe_executor::{StreamProber, StreamReport};
use crate::error::{CoreError, CoreResult};
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use std::cell::RefCell;
use std::collections::HashMap;
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::rc::Rc;
use std::sync::Mutex;

/// Mock implementation of `FfmpegProcess`.
#[derive(Clone)]
pub struct MockFfmpegProcess {
    pub events_to_emit: Rc<RefCell<Vec<FfmpegEvent>>>,
    pub exit_status: ExitStatus,
}

impl FfmpegProcess for MockFfmpegProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        let events = self.events_to_emit.borrow().clone();
        for event in events {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        Ok(self.exit_status)
    }
}

/// An expected ffmpeg invocation and its mock result.
pub struct MockFfmpegExpectation {
    pub arg_pattern: String,
    pub result: CoreResult<MockFfmpegProcess>,
    pub create_dummy_output: bool,
}

/// Mock implementation of `FfmpegSpawner` supporting multiple expectations.
///
/// Each spawned command is matched against the remaining expectations by
/// substring over its arguments; with `create_dummy_output` the mock writes
/// an empty file at the command's output path (its last argument), which lets
/// pipeline tests observe the staged file dance without a real engine.
#[derive(Clone, Default)]
pub struct MockFfmpegSpawner {
    expectations: Rc<RefCell<Vec<MockFfmpegExpectation>>>,
    received_calls: Rc<RefCell<Vec<Vec<String>>>>,
}

impl MockFfmpegSpawner {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add_expectation(
        &self,
        arg_pattern: &str,
        result: CoreResult<MockFfmpegProcess>,
        create_dummy_output: bool,
    ) {
        self.expectations.borrow_mut().push(MockFfmpegExpectation {
            arg_pattern: arg_pattern.to_string(),
            result,
            create_dummy_output,
        });
    }

    pub fn add_success_expectation(&self, arg_pattern: &str, create_dummy_output: bool) {
        let process = MockFfmpegProcess {
            events_to_emit: Rc::new(RefCell::new(vec![])),
            exit_status: ExitStatus::from_raw(0),
        };
        self.add_expectation(arg_pattern, Ok(process), create_dummy_output);
    }

    pub fn add_exit_error_expectation(
        &self,
        arg_pattern: &str,
        events: Vec<FfmpegEvent>,
        exit_code: i32,
    ) {
        let process = MockFfmpegProcess {
            events_to_emit: Rc::new(RefCell::new(events)),
            exit_status: ExitStatus::from_raw(exit_code),
        };
        self.add_expectation(arg_pattern, Ok(process), false);
    }

    pub fn get_received_calls(&self) -> Vec<Vec<String>> {
        self.received_calls.borrow().clone()
    }
}

impl FfmpegSpawner for MockFfmpegSpawner {
    type Process = MockFfmpegProcess;

    fn spawn(&self, mut cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        let args: Vec<String> = cmd
            .as_inner()
            .get_args()
            .map(|s| s.to_string_lossy().into_owned())
            .collect();
        self.received_calls.borrow_mut().push(args.clone());

        let mut expectations = self.expectations.borrow_mut();
        let found_index = expectations
            .iter()
            .position(|exp| args.iter().any(|arg| arg.contains(&exp.arg_pattern)));

        let Some(index) = found_index else {
            panic!("MockFfmpegSpawner: no expectation found for command args: {args:?}");
        };
        let expectation = expectations.remove(index);

        match expectation.result {
            Ok(process) => {
                if expectation.create_dummy_output {
                    if let Some(output_path) = args.last().map(PathBuf::from) {
                        if let Some(parent) = output_path.parent() {
                            std::fs::create_dir_all(parent).ok();
                        }
                        std::fs::File::create(&output_path)
                            .unwrap_or_else(|e| panic!("dummy output {output_path:?}: {e}"));
                    }
                }
                Ok(process)
            }
            Err(err) => Err(err),
        }
    }
}

/// Mock implementation of `StreamProber`.
///
/// Thread-safe so it can back the concurrent discovery-phase filtering.
#[derive(Debug, Default)]
pub struct MockProber {
    reports: Mutex<HashMap<PathBuf, StreamReport>>,
    failing: Mutex<Vec<PathBuf>>,
    probed: Mutex<Vec<PathBuf>>,
}

impl MockProber {
    pub fn new() -> Self {
        Default::default()
    }

    /// Registers the stream report returned for a path.
    pub fn expect_report(&self, path: &Path, report: StreamReport) {
        self.reports.lock().unwrap().insert(path.to_path_buf(), report);
    }

    /// Registers a path whose probe fails (corrupt file, engine unavailable).
    pub fn expect_failure(&self, path: &Path) {
        self.failing.lock().unwrap().push(path.to_path_buf());
    }

    /// Every path probed so far, in probe order.
    pub fn probed_paths(&self) -> Vec<PathBuf> {
        self.probed.lock().unwrap().clone()
    }
}

impl StreamProber for MockProber {
    fn probe_streams(&self, path: &Path) -> CoreResult<StreamReport> {
        self.probed.lock().unwrap().push(path.to_path_buf());

        if self.failing.lock().unwrap().iter().any(|p| p == path) {
            return Err(CoreError::FfprobeParse(format!(
                "mock probe failure for {}",
                path.display()
            )));
        }
        self.reports
            .lock()
            .unwrap()
            .get(path)
            .copied()
            .ok_or_else(|| {
                CoreError::FfprobeParse(format!("no mock report for {}", path.display()))
            })
    }
}
