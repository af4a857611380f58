//! Conversion strategies, one per media kind.
//!
//! The set of kinds is closed, so the strategies are a tagged union rather
//! than an open trait: [`Converter::for_kind`] is the factory, and each
//! variant knows the kind-specific output options it hands to the engine.

use crate::config::Settings;
use crate::error::{CoreError, CoreResult};
use crate::external::{run_conversion, FfmpegSpawner, ToolPaths};
use crate::formats::MediaKind;
use ffmpeg_sidecar::command::FfmpegCommand;
use std::path::Path;

/// Renders the conditional downscale filter: dimensions above `max_size`
/// are clamped to it with the aspect ratio preserved, anything already
/// within bounds passes through unscaled (`-1` keeps the other dimension
/// proportional, `decrease` forbids upscaling).
pub fn downscale_filter(max_size: u32) -> String {
    format!(
        "scale=w='if(gt(iw,{max_size}),{max_size},-1)':h='if(gt(ih,{max_size}),{max_size},-1)':force_original_aspect_ratio=decrease"
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageOptions {
    pub quality: u32,
    pub max_size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoOptions {
    pub video_bitrate: u32,
    pub audio_bitrate: u32,
    pub fps: u32,
    pub max_size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioOptions {
    pub bitrate: u32,
}

/// Per-kind transcoding strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Converter {
    Image(ImageOptions),
    Video(VideoOptions),
    Audio(AudioOptions),
}

impl Converter {
    /// Maps a media kind to its strategy. `Unknown` is unreachable when the
    /// caller goes through a loader, so it fails fast.
    pub fn for_kind(kind: MediaKind, settings: &Settings) -> CoreResult<Self> {
        match kind {
            MediaKind::Image => Ok(Converter::Image(ImageOptions {
                quality: settings.image.quality,
                max_size: settings.image.max_size,
            })),
            MediaKind::Video => Ok(Converter::Video(VideoOptions {
                video_bitrate: settings.video.video_bitrate,
                audio_bitrate: settings.video.audio_bitrate,
                fps: settings.video.fps,
                max_size: settings.video.max_size,
            })),
            MediaKind::Audio => Ok(Converter::Audio(AudioOptions {
                bitrate: settings.audio.bitrate,
            })),
            MediaKind::Unknown => Err(CoreError::UnsupportedKind(kind.to_string())),
        }
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            Converter::Image(_) => MediaKind::Image,
            Converter::Video(_) => MediaKind::Video,
            Converter::Audio(_) => MediaKind::Audio,
        }
    }

    /// Kind-specific output options, in engine argument order.
    pub fn output_args(&self) -> Vec<String> {
        match self {
            Converter::Image(opts) => vec![
                "-q:v".to_string(),
                opts.quality.to_string(),
                // Loop forever for animated outputs
                "-loop".to_string(),
                "0".to_string(),
                "-vf".to_string(),
                downscale_filter(opts.max_size),
            ],
            Converter::Video(opts) => vec![
                "-b:v".to_string(),
                format!("{}k", opts.video_bitrate),
                "-b:a".to_string(),
                format!("{}k", opts.audio_bitrate),
                "-r".to_string(),
                opts.fps.to_string(),
                "-vf".to_string(),
                downscale_filter(opts.max_size),
            ],
            Converter::Audio(opts) => vec!["-b:a".to_string(), format!("{}k", opts.bitrate)],
        }
    }

    /// Runs the engine on one asset, blocking until it reports completion or
    /// failure. The output is always overwritten: the destination slot is
    /// either fresh or being replaced deliberately.
    pub fn convert<S: FfmpegSpawner>(
        &self,
        spawner: &S,
        tools: &ToolPaths,
        input: &Path,
        output: &Path,
    ) -> CoreResult<()> {
        let mut cmd = FfmpegCommand::new_with_path(&tools.ffmpeg);
        cmd.hide_banner();
        cmd.input(input.to_string_lossy().as_ref());
        for arg in self.output_args() {
            cmd.arg(arg);
        }
        cmd.overwrite();
        cmd.output(output.to_string_lossy().as_ref());

        log::debug!(
            "Converting {} -> {} ({})",
            input.display(),
            output.display(),
            self.kind()
        );
        run_conversion(spawner, cmd)
    }
}
