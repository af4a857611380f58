//! The conversion pipeline.
//!
//! For each loader (images, then videos, then audio — the order is fixed and
//! observable through the progress messages), every matched asset runs
//! through a strict sequence:
//!
//! 1. derive a temp name (`{stem}_{ext}_{uid}.tmp`) and the output name
//! 2. copy the original to the temp path — the original is untouched on
//!    disk here, which is the safety margin that survives a crash
//! 3. clear the output slot and evict the original
//! 4. transcode temp -> output, blocking on the engine
//! 5. delete the temp copy and advance the shared progress notice
//!
//! The first failure abandons the remaining files of the current batch:
//! already-converted files stay converted, later files stay untouched, and
//! the in-flight file is left for the rollback path to restore on a later
//! run. Conversions never overlap; two concurrent jobs would race on temp
//! names and store renames. No cancellation is exposed, and a second batch
//! started before the first ends is not guarded against.

use crate::asset::AssetDescriptor;
use crate::config::Settings;
use crate::convert::Converter;
use crate::error::CoreResult;
use crate::external::{FfmpegSpawner, StreamProber, ToolPaths};
use crate::formats::{MediaKind, TEMP_EXTENSION};
use crate::loader::Loader;
use crate::naming;
use crate::notifications::ProgressReporter;
use crate::vault::Vault;
use std::time::Duration;

/// Result of one successful conversion.
#[derive(Debug, Clone)]
pub struct ConvertOutcome {
    pub file_name: String,
    pub output_name: String,
    pub kind: MediaKind,
    pub input_size: u64,
    pub output_size: u64,
}

struct WorkFiles {
    tmp: AssetDescriptor,
    output: AssetDescriptor,
}

/// Derives the staged temp descriptor and the output descriptor for one
/// asset. With overwrite disabled the output stem gets the unique suffix;
/// the original is replaced either way.
fn generate_work_files(asset: &AssetDescriptor, settings: &Settings) -> CoreResult<WorkFiles> {
    let unique_id = naming::generate_unique_id(settings.unique_id_length);

    let tmp = asset
        .with_name(&naming::encode_temp_name(
            asset.name(),
            asset.extension(),
            &unique_id,
        ))
        .with_extension(TEMP_EXTENSION);

    let output_format = settings.output_format(asset.kind())?.to_string();
    let output = if settings.overwrite {
        asset.with_extension(&output_format)
    } else {
        asset
            .with_name(&format!("{}{}{}", asset.name(), naming::SEPARATOR, unique_id))
            .with_extension(&output_format)
    };

    Ok(WorkFiles { tmp, output })
}

fn convert_single<V, S>(
    vault: &V,
    spawner: &S,
    tools: &ToolPaths,
    converter: &Converter,
    asset: &AssetDescriptor,
    work: &WorkFiles,
) -> CoreResult<ConvertOutcome>
where
    V: Vault,
    S: FfmpegSpawner,
{
    let original_path = asset.rel_path();
    let output_path = work.output.rel_path();

    let input_size = std::fs::metadata(asset.abs_path()).map(|m| m.len()).unwrap_or(0);

    // Stage: the original stays in place until the copy exists.
    vault.copy(asset.handle(), &work.tmp.rel_path())?;

    // Clear the output slot, then evict the original. When the output
    // resolves to the original's own path (same stem and extension) a single
    // removal covers both.
    if output_path != original_path && vault.exists(&output_path) {
        vault.remove(&output_path)?;
    }
    vault.remove(&original_path)?;

    converter.convert(spawner, tools, &work.tmp.abs_path(), &work.output.abs_path())?;

    vault.remove(&work.tmp.rel_path())?;

    let output_size = std::fs::metadata(work.output.abs_path())
        .map(|m| m.len())
        .unwrap_or(0);

    Ok(ConvertOutcome {
        file_name: asset.file_name(),
        output_name: work.output.file_name(),
        kind: asset.kind(),
        input_size,
        output_size,
    })
}

/// Runs the full conversion pipeline over the store.
///
/// `tools` must already be resolved; doing that up front keeps engine
/// misconfiguration from creating any partial state. Returns an outcome
/// record per successfully converted file.
pub fn process_assets<V, S, P, R>(
    vault: &V,
    spawner: &S,
    prober: &P,
    reporter: &R,
    settings: &Settings,
    tools: &ToolPaths,
) -> CoreResult<Vec<ConvertOutcome>>
where
    V: Vault,
    S: FfmpegSpawner,
    P: StreamProber + Sync,
    R: ProgressReporter,
{
    settings.validate()?;

    let loaders = [
        Loader::image(settings),
        Loader::video(settings),
        Loader::audio(settings),
    ];

    let mut outcomes = Vec::new();

    for loader in &loaders {
        let files = loader.load(vault, Some(prober))?;
        reporter.notify(
            &format!(
                "Found {} files to convert of type {}",
                files.len(),
                loader.kind()
            ),
            None,
        );

        let converter = Converter::for_kind(loader.kind(), settings)?;

        if files.is_empty() {
            continue;
        }

        let total = files.len();
        let mut file_index = 1usize;

        // One conversion in flight at a time.
        for asset in &files {
            reporter.update(&format!(
                "Processing file {file_index}/{total} ({})",
                asset.name()
            ));

            let work = generate_work_files(asset, settings)?;

            match convert_single(vault, spawner, tools, &converter, asset, &work) {
                Ok(outcome) => {
                    log::info!(
                        "Converted {} -> {}",
                        outcome.file_name,
                        outcome.output_name
                    );
                    outcomes.push(outcome);
                    file_index += 1;
                }
                Err(e) => {
                    reporter.notify(
                        &format!(
                            "An error occurred while converting {}, check the log output for details",
                            asset.rel_path().display()
                        ),
                        Some(Duration::from_secs(5)),
                    );
                    log::error!(
                        "Conversion failed for {}: {e}. Orphaned temporary files from this run can be restored with rollback.",
                        asset.rel_path().display()
                    );
                    break;
                }
            }
        }

        reporter.notify(
            &format!("{} conversion ended", loader.kind()),
            Some(Duration::from_secs(3)),
        );
        reporter.hide();
    }

    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::VaultHandle;
    use std::path::PathBuf;

    fn asset(name: &str, ext: &str, kind: MediaKind) -> AssetDescriptor {
        let handle = VaultHandle::new(
            PathBuf::from(format!("media/{name}.{ext}")),
            PathBuf::from(format!("/vault/media/{name}.{ext}")),
        );
        AssetDescriptor::from_handle(&handle, kind)
    }

    #[test]
    fn work_files_encode_the_original_identity() {
        let mut settings = Settings::default();
        settings.unique_id_length = 8;

        let work = generate_work_files(&asset("photo", "png", MediaKind::Image), &settings).unwrap();
        assert_eq!(work.tmp.extension(), "tmp");

        let decoded = naming::decode_temp_name(work.tmp.name()).unwrap();
        assert_eq!(decoded.stem, "photo");
        assert_eq!(decoded.extension, "png");
        assert_eq!(decoded.unique_id.len(), 8);

        assert_eq!(work.output.file_name(), "photo.webp");
        assert_eq!(work.output.rel_path(), PathBuf::from("media/photo.webp"));
    }

    #[test]
    fn overwrite_disabled_appends_the_unique_id_to_the_output() {
        let mut settings = Settings::default();
        settings.overwrite = false;
        settings.unique_id_length = 6;

        let work = generate_work_files(&asset("photo", "png", MediaKind::Image), &settings).unwrap();
        let name = work.output.file_name();
        let suffix = name
            .strip_prefix("photo_")
            .and_then(|rest| rest.strip_suffix(".webp"))
            .unwrap();
        assert_eq!(suffix.len(), 6);
        assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn work_files_use_the_per_kind_output_format() {
        let settings = Settings::default();
        let work = generate_work_files(&asset("song", "mp3", MediaKind::Audio), &settings).unwrap();
        assert_eq!(work.output.file_name(), "song.webm");
    }
}
