//! Stream probing via ffprobe.
//!
//! Ambiguous container extensions (webm) cannot be classified by name alone,
//! so the prober asks ffprobe for the stream list and reports which stream
//! types are actually present.

use crate::error::{command_failed_error, command_start_error, CoreError, CoreResult};
use crate::formats::MediaKind;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Which stream types a probed file contains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamReport {
    pub has_video: bool,
    pub has_audio: bool,
}

impl StreamReport {
    /// Resolution policy: a video stream wins, else an audio stream, else the
    /// file is unknown and excluded from processing.
    pub fn resolved_kind(&self) -> MediaKind {
        if self.has_video {
            MediaKind::Video
        } else if self.has_audio {
            MediaKind::Audio
        } else {
            MediaKind::Unknown
        }
    }
}

/// Inspects the stream contents of a media file.
pub trait StreamProber {
    fn probe_streams(&self, path: &Path) -> CoreResult<StreamReport>;
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    #[serde(default)]
    codec_type: Option<String>,
}

/// `StreamProber` implementation executing the resolved ffprobe binary.
#[derive(Debug, Clone)]
pub struct CommandFfprobe {
    bin: PathBuf,
}

impl CommandFfprobe {
    pub fn new(bin: impl Into<PathBuf>) -> Self {
        Self { bin: bin.into() }
    }
}

impl StreamProber for CommandFfprobe {
    fn probe_streams(&self, path: &Path) -> CoreResult<StreamReport> {
        log::debug!("Probing streams of {}", path.display());

        let output = Command::new(&self.bin)
            .args(["-v", "error", "-print_format", "json", "-show_streams"])
            .arg(path)
            .output()
            .map_err(|e| command_start_error("ffprobe", e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            return Err(command_failed_error("ffprobe", output.status, stderr));
        }

        let parsed: FfprobeOutput = serde_json::from_slice(&output.stdout)
            .map_err(|e| CoreError::FfprobeParse(format!("{}: {e}", path.display())))?;

        let mut report = StreamReport::default();
        for stream in &parsed.streams {
            match stream.codec_type.as_deref() {
                Some("video") => report.has_video = true,
                Some("audio") => report.has_audio = true,
                _ => {}
            }
        }
        Ok(report)
    }
}
