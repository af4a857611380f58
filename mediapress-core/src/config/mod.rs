//! Configuration for the mediapress core library.
//!
//! Settings are a strongly-typed record loaded once per run. Every field
//! carries a serde default, so a persisted settings file written by an older
//! version (or edited by hand with fields missing) is merged over the
//! defaults at load time instead of failing to parse. `validate` runs once
//! before a batch starts; nothing is touched if it rejects.

use crate::error::{CoreError, CoreResult};
use crate::formats::{self, MediaKind};
use serde::{Deserialize, Serialize};
use std::path::Path;

// Default constants

/// Default length of the random token appended to temp (and, with overwrite
/// disabled, output) file names.
pub const DEFAULT_UNIQUE_ID_LENGTH: usize = 20;

/// Default image quality passed to the engine as `-q:v` (higher is better
/// for webp output).
pub const DEFAULT_IMAGE_QUALITY: u32 = 80;

/// Default maximum image dimension in pixels; larger images are downscaled,
/// smaller ones left alone.
pub const DEFAULT_IMAGE_MAX_SIZE: u32 = 2000;

/// Default maximum video dimension in pixels.
pub const DEFAULT_VIDEO_MAX_SIZE: u32 = 2000;

/// Default target video bitrate in kbit/s.
pub const DEFAULT_VIDEO_BITRATE: u32 = 2000;

/// Default target audio bitrate in kbit/s for video conversions.
pub const DEFAULT_VIDEO_AUDIO_BITRATE: u32 = 32;

/// Default output frame-rate cap for video conversions.
pub const DEFAULT_VIDEO_FPS: u32 = 60;

/// Default target audio bitrate in kbit/s for audio conversions.
pub const DEFAULT_AUDIO_BITRATE: u32 = 32;

/// Image-category settings: quality, geometry, per-format include flags and
/// the target output format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSettings {
    pub quality: u32,
    pub max_size: u32,
    pub include_avif: bool,
    pub include_bmp: bool,
    pub include_png: bool,
    pub include_jpg: bool,
    pub include_gif: bool,
    pub include_webp: bool,
    pub output_format: String,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            quality: DEFAULT_IMAGE_QUALITY,
            max_size: DEFAULT_IMAGE_MAX_SIZE,
            include_avif: true,
            include_bmp: true,
            include_png: true,
            include_jpg: true,
            include_gif: true,
            include_webp: false,
            output_format: "webp".to_string(),
        }
    }
}

/// Video-category settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoSettings {
    pub max_size: u32,
    /// Target video bitrate in kbit/s.
    pub video_bitrate: u32,
    /// Target audio bitrate in kbit/s.
    pub audio_bitrate: u32,
    /// Output frame-rate cap.
    pub fps: u32,
    pub include_mp4: bool,
    pub include_mkv: bool,
    pub include_mov: bool,
    pub include_ogv: bool,
    pub include_webm: bool,
    pub output_format: String,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_VIDEO_MAX_SIZE,
            video_bitrate: DEFAULT_VIDEO_BITRATE,
            audio_bitrate: DEFAULT_VIDEO_AUDIO_BITRATE,
            fps: DEFAULT_VIDEO_FPS,
            include_mp4: true,
            include_mkv: true,
            include_mov: true,
            include_ogv: true,
            include_webm: false,
            output_format: "webm".to_string(),
        }
    }
}

/// Audio-category settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Target audio bitrate in kbit/s.
    pub bitrate: u32,
    pub include_mp3: bool,
    pub include_wav: bool,
    pub include_m4a: bool,
    pub include_flac: bool,
    pub include_ogg: bool,
    #[serde(rename = "include_3gp")]
    pub include_threegp: bool,
    pub include_webm: bool,
    pub output_format: String,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            bitrate: DEFAULT_AUDIO_BITRATE,
            include_mp3: true,
            include_wav: true,
            include_m4a: true,
            include_flac: true,
            include_ogg: true,
            include_threegp: true,
            include_webm: false,
            output_format: "webm".to_string(),
        }
    }
}

/// Full configuration record for a processing run.
///
/// Treated as an immutable snapshot once a batch starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fallback path to the ffmpeg binary when it is not on the PATH.
    /// Empty means "environment only".
    pub ffmpeg_path: String,

    /// Fallback path to the ffprobe binary.
    pub ffprobe_path: String,

    /// Replace originals in place. When disabled, output names get a unique
    /// suffix instead (the original is still removed).
    pub overwrite: bool,

    /// Length of generated unique IDs.
    pub unique_id_length: usize,

    pub image: ImageSettings,
    pub video: VideoSettings,
    pub audio: AudioSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ffmpeg_path: String::new(),
            ffprobe_path: String::new(),
            overwrite: true,
            unique_id_length: DEFAULT_UNIQUE_ID_LENGTH,
            image: ImageSettings::default(),
            video: VideoSettings::default(),
            audio: AudioSettings::default(),
        }
    }
}

impl Settings {
    /// Loads a settings record from a JSON file, merging it over the
    /// defaults. Missing fields take their default value.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let data = std::fs::read_to_string(path)?;
        serde_json::from_str(&data)
            .map_err(|e| CoreError::Config(format!("{}: {e}", path.display())))
    }

    /// Persists the full settings record as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> CoreResult<()> {
        let data = serde_json::to_string_pretty(self)
            .map_err(|e| CoreError::Config(e.to_string()))?;
        std::fs::write(path, data)?;
        Ok(())
    }

    /// The ordered allow-list of extensions enabled for a kind.
    pub fn enabled_extensions(&self, kind: MediaKind) -> Vec<&'static str> {
        let mut extensions = Vec::new();
        let mut push = |enabled: bool, group: &[&'static str]| {
            if enabled {
                extensions.extend_from_slice(group);
            }
        };
        match kind {
            MediaKind::Image => {
                push(self.image.include_avif, formats::AVIF_IMAGE_EXTENSIONS);
                push(self.image.include_bmp, formats::BMP_IMAGE_EXTENSIONS);
                push(self.image.include_png, formats::PNG_IMAGE_EXTENSIONS);
                push(self.image.include_jpg, formats::JPG_IMAGE_EXTENSIONS);
                push(self.image.include_gif, formats::GIF_IMAGE_EXTENSIONS);
                push(self.image.include_webp, formats::WEBP_IMAGE_EXTENSIONS);
            }
            MediaKind::Video => {
                push(self.video.include_mp4, formats::MP4_VIDEO_EXTENSIONS);
                push(self.video.include_mkv, formats::MKV_VIDEO_EXTENSIONS);
                push(self.video.include_mov, formats::MOV_VIDEO_EXTENSIONS);
                push(self.video.include_ogv, formats::OGV_VIDEO_EXTENSIONS);
                push(self.video.include_webm, formats::WEBM_VIDEO_EXTENSIONS);
            }
            MediaKind::Audio => {
                push(self.audio.include_mp3, formats::MP3_AUDIO_EXTENSIONS);
                push(self.audio.include_wav, formats::WAV_AUDIO_EXTENSIONS);
                push(self.audio.include_m4a, formats::M4A_AUDIO_EXTENSIONS);
                push(self.audio.include_flac, formats::FLAC_AUDIO_EXTENSIONS);
                push(self.audio.include_ogg, formats::OGG_AUDIO_EXTENSIONS);
                push(self.audio.include_threegp, formats::THREEGP_AUDIO_EXTENSIONS);
                push(self.audio.include_webm, formats::WEBM_AUDIO_EXTENSIONS);
            }
            MediaKind::Unknown => {}
        }
        extensions
    }

    /// The configured output extension for a kind. Unknown kinds are a
    /// programmer error: loaders only emit classified kinds.
    pub fn output_format(&self, kind: MediaKind) -> CoreResult<&str> {
        match kind {
            MediaKind::Image => Ok(&self.image.output_format),
            MediaKind::Video => Ok(&self.video.output_format),
            MediaKind::Audio => Ok(&self.audio.output_format),
            MediaKind::Unknown => Err(CoreError::UnsupportedKind("unknown".to_string())),
        }
    }

    /// Validates the record once before a batch starts.
    pub fn validate(&self) -> CoreResult<()> {
        if self.unique_id_length == 0 || self.unique_id_length > 64 {
            return Err(CoreError::Config(format!(
                "unique_id_length must be between 1 and 64, got {}",
                self.unique_id_length
            )));
        }
        if self.image.quality == 0 || self.image.quality > 100 {
            return Err(CoreError::Config(format!(
                "image quality must be between 1 and 100, got {}",
                self.image.quality
            )));
        }
        if self.image.max_size == 0 || self.video.max_size == 0 {
            return Err(CoreError::Config(
                "max_size must be greater than zero".to_string(),
            ));
        }
        if self.video.video_bitrate == 0
            || self.video.audio_bitrate == 0
            || self.audio.bitrate == 0
        {
            return Err(CoreError::Config(
                "bitrates must be greater than zero".to_string(),
            ));
        }
        if self.video.fps == 0 {
            return Err(CoreError::Config(
                "video fps must be greater than zero".to_string(),
            ));
        }
        let format_checks = [
            (&self.image.output_format, formats::IMAGE_EXTENSIONS, "image"),
            (&self.video.output_format, formats::VIDEO_EXTENSIONS, "video"),
            (&self.audio.output_format, formats::AUDIO_EXTENSIONS, "audio"),
        ];
        for (format, table, category) in format_checks {
            if !table.contains(&format.as_str()) {
                return Err(CoreError::Config(format!(
                    "'{format}' is not a supported {category} output format"
                )));
            }
        }
        Ok(())
    }
}
