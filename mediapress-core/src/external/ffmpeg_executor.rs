//! FFmpeg process management and execution.
//!
//! The `FfmpegProcess`/`FfmpegSpawner` trait pair abstracts process spawning
//! so the pipeline can be exercised with mock processes; `SidecarSpawner` is
//! the production implementation over ffmpeg-sidecar.

use crate::error::{command_failed_error, command_start_error, command_wait_error, CoreResult};
use ffmpeg_sidecar::child::FfmpegChild as SidecarChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use std::process::ExitStatus;

/// An active ffmpeg process instance.
pub trait FfmpegProcess {
    /// Processes events from the running command using a provided handler closure.
    fn handle_events<F>(&mut self, handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>;

    /// Waits for the command to complete and returns its exit status.
    fn wait(&mut self) -> CoreResult<ExitStatus>;
}

/// Something that can spawn an `FfmpegProcess`.
pub trait FfmpegSpawner {
    type Process: FfmpegProcess;

    /// Spawns the ffmpeg command, consuming the command object.
    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process>;
}

/// Wrapper around `ffmpeg_sidecar::child::FfmpegChild` implementing `FfmpegProcess`.
pub struct SidecarProcess(SidecarChild);

impl FfmpegProcess for SidecarProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        let iterator = self.0.iter().map_err(|e| {
            log::error!("Failed to get ffmpeg event iterator: {e}");
            command_failed_error("ffmpeg (event iterator)", ExitStatus::default(), e.to_string())
        })?;
        for event in iterator {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        self.0.wait().map_err(|e| command_wait_error("ffmpeg", e))
    }
}

/// Concrete `FfmpegSpawner` over ffmpeg-sidecar.
#[derive(Debug, Clone, Default)]
pub struct SidecarSpawner;

impl FfmpegSpawner for SidecarSpawner {
    type Process = SidecarProcess;

    fn spawn(&self, mut cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        cmd.spawn()
            .map(SidecarProcess)
            .map_err(|e| command_start_error("ffmpeg", e))
    }
}

/// Drives a built conversion command to completion.
///
/// Engine-reported error lines are collected and returned verbatim in the
/// failure payload; nothing is reinterpreted. No timeout is imposed on the
/// engine, so a hung transcode hangs the batch.
pub fn run_conversion<S: FfmpegSpawner>(spawner: &S, cmd: FfmpegCommand) -> CoreResult<()> {
    let mut process = spawner.spawn(cmd)?;

    let mut error_lines: Vec<String> = Vec::new();
    process.handle_events(|event| {
        match event {
            FfmpegEvent::Error(line) | FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, line) => {
                log::debug!("ffmpeg: {line}");
                error_lines.push(line);
            }
            _ => {}
        }
        Ok(())
    })?;

    let status = process.wait()?;
    if !status.success() {
        return Err(command_failed_error("ffmpeg", status, error_lines.join("\n")));
    }
    Ok(())
}
