//! Static classification tables mapping file extensions to media kinds.
//!
//! Extensions are case-normalized before lookup. A handful of container
//! extensions legitimately appear in more than one category table (webm holds
//! either video or audio-only streams); those are flagged ambiguous so the
//! stream prober is consulted instead of trusting the extension.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The media category of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
    Unknown,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
            MediaKind::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

// Per-format extension groups. A settings include flag toggles a whole group,
// which is why jpg and jpeg travel together.
pub const AVIF_IMAGE_EXTENSIONS: &[&str] = &["avif"];
pub const BMP_IMAGE_EXTENSIONS: &[&str] = &["bmp"];
pub const PNG_IMAGE_EXTENSIONS: &[&str] = &["png"];
pub const JPG_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg"];
pub const GIF_IMAGE_EXTENSIONS: &[&str] = &["gif"];
pub const WEBP_IMAGE_EXTENSIONS: &[&str] = &["webp"];

pub const MP4_VIDEO_EXTENSIONS: &[&str] = &["mp4"];
pub const MKV_VIDEO_EXTENSIONS: &[&str] = &["mkv"];
pub const MOV_VIDEO_EXTENSIONS: &[&str] = &["mov"];
pub const OGV_VIDEO_EXTENSIONS: &[&str] = &["ogv"];
pub const WEBM_VIDEO_EXTENSIONS: &[&str] = &["webm"];

pub const MP3_AUDIO_EXTENSIONS: &[&str] = &["mp3"];
pub const WAV_AUDIO_EXTENSIONS: &[&str] = &["wav"];
pub const M4A_AUDIO_EXTENSIONS: &[&str] = &["m4a"];
pub const FLAC_AUDIO_EXTENSIONS: &[&str] = &["flac"];
pub const OGG_AUDIO_EXTENSIONS: &[&str] = &["ogg"];
pub const THREEGP_AUDIO_EXTENSIONS: &[&str] = &["3gp"];
pub const WEBM_AUDIO_EXTENSIONS: &[&str] = &["webm"];

pub const IMAGE_EXTENSIONS: &[&str] = &["avif", "bmp", "png", "jpg", "jpeg", "gif", "webp"];
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "mov", "ogv", "webm"];
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a", "flac", "ogg", "3gp", "webm"];

/// The fixed placeholder extension for staged working copies.
pub const TEMP_EXTENSION: &str = "tmp";

/// Classifies an extension by static table lookup, image then video then
/// audio. Ambiguous extensions resolve to the first table that contains them;
/// callers that care must check [`is_ambiguous`] and probe the streams.
pub fn classify_extension(extension: &str) -> MediaKind {
    let ext = extension.to_ascii_lowercase();
    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        MediaKind::Image
    } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        MediaKind::Video
    } else if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
        MediaKind::Audio
    } else {
        MediaKind::Unknown
    }
}

/// True when the extension appears in more than one category table, so the
/// container alone cannot decide the media kind.
pub fn is_ambiguous(extension: &str) -> bool {
    let ext = extension.to_ascii_lowercase();
    let memberships = [
        IMAGE_EXTENSIONS.contains(&ext.as_str()),
        VIDEO_EXTENSIONS.contains(&ext.as_str()),
        AUDIO_EXTENSIONS.contains(&ext.as_str()),
    ];
    memberships.iter().filter(|m| **m).count() > 1
}
