//! Interactions with the external transcoding tools (ffmpeg and ffprobe).
//!
//! Tool access goes through traits (`FfmpegSpawner`, `StreamProber`) so tests
//! can inject mock implementations; the concrete implementations live in the
//! submodules. Binary paths are resolved once per run into an explicit
//! [`ToolPaths`] value that is passed into the converters, so nothing holds
//! process-wide tool state.

use crate::config::Settings;
use crate::error::{command_start_error, CoreError, CoreResult};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

pub mod ffmpeg_executor;
pub mod ffprobe_executor;
pub mod mocks;

pub use ffmpeg_executor::{run_conversion, FfmpegProcess, FfmpegSpawner, SidecarProcess, SidecarSpawner};
pub use ffprobe_executor::{CommandFfprobe, StreamProber, StreamReport};

/// Resolved absolute (or PATH-resolvable) locations of the external tools.
#[derive(Debug, Clone)]
pub struct ToolPaths {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
}

impl ToolPaths {
    /// Resolves both tools before any file is touched. A failure here is a
    /// configuration error that aborts the run with no partial state.
    pub fn resolve(settings: &Settings) -> CoreResult<Self> {
        Ok(Self {
            ffmpeg: resolve_tool("ffmpeg", &settings.ffmpeg_path)?,
            ffprobe: resolve_tool("ffprobe", &settings.ffprobe_path)?,
        })
    }
}

/// Locates an external tool: the environment (PATH) is checked first by
/// spawning `<name> -version`, then the user-configured fallback path.
pub fn resolve_tool(name: &str, fallback_path: &str) -> CoreResult<PathBuf> {
    let probe = Command::new(name)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match probe {
        Ok(_) => {
            log::debug!("Found {name} on the PATH");
            return Ok(PathBuf::from(name));
        }
        Err(e) if e.kind() != io::ErrorKind::NotFound => {
            log::error!("Failed to start '{name} -version': {e}");
            return Err(command_start_error(name, e));
        }
        Err(_) => {}
    }

    let fallback = fallback_path.trim();
    if !fallback.is_empty() && Path::new(fallback).is_file() {
        log::debug!("Using configured path for {name}: {fallback}");
        return Ok(PathBuf::from(fallback));
    }

    log::warn!("Tool '{name}' not found on the PATH or at a configured path");
    Err(CoreError::DependencyNotFound(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_tool_without_fallback_is_a_dependency_error() {
        let result = resolve_tool("definitely-not-a-real-binary-name", "");
        assert!(matches!(result, Err(CoreError::DependencyNotFound(_))));
    }

    #[test]
    fn fallback_path_is_used_when_tool_is_not_on_path() {
        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("fake-ffmpeg");
        std::fs::write(&fake, b"").unwrap();

        let resolved =
            resolve_tool("definitely-not-a-real-binary-name", fake.to_str().unwrap()).unwrap();
        assert_eq!(resolved, fake);
    }
}
