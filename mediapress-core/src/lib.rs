//! Core library for batch media compression inside a document vault.
//!
//! This crate scans a vault (a directory tree of notes and attachments) for
//! image, video and audio files, converts each to a configured target format
//! with ffmpeg, and replaces the original in place. Every asset goes through
//! a crash-safe staging sequence, and interrupted runs leave encoded
//! temporary files that the rollback path can restore.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use mediapress_core::{
//!     process_assets, CommandFfprobe, FsVault, LogReporter, Settings, SidecarSpawner, ToolPaths,
//! };
//! use std::path::Path;
//!
//! let settings = Settings::default();
//! settings.validate().unwrap();
//!
//! let vault = FsVault::open(Path::new("/path/to/vault")).unwrap();
//! let tools = ToolPaths::resolve(&settings).unwrap();
//! let prober = CommandFfprobe::new(&tools.ffprobe);
//!
//! let outcomes = process_assets(
//!     &vault,
//!     &SidecarSpawner,
//!     &prober,
//!     &LogReporter,
//!     &settings,
//!     &tools,
//! )
//! .unwrap();
//! println!("converted {} files", outcomes.len());
//! ```

pub mod asset;
pub mod config;
pub mod convert;
pub mod error;
pub mod external;
pub mod formats;
pub mod loader;
pub mod naming;
pub mod notifications;
pub mod processing;
pub mod utils;
pub mod vault;

// Re-exports for public API
pub use asset::AssetDescriptor;
pub use config::Settings;
pub use convert::Converter;
pub use error::{CoreError, CoreResult};
pub use external::{CommandFfprobe, SidecarSpawner, StreamProber, ToolPaths};
pub use formats::MediaKind;
pub use loader::Loader;
pub use notifications::{LogReporter, ProgressReporter};
pub use processing::{process_assets, rollback_assets, ConvertOutcome};
pub use utils::{calculate_size_reduction, format_bytes};
pub use vault::{FsVault, Vault, VaultHandle};
