//! Restoration of orphaned working copies.
//!
//! A batch that died between staging and cleanup leaves `*.tmp` files whose
//! names encode the pre-conversion identity. Rollback is an explicit user
//! action rather than an automatic retry: re-converting a half-processed
//! asset without the user knowing risks silently transcoding stale data.

use crate::asset::AssetDescriptor;
use crate::config::Settings;
use crate::error::{CoreError, CoreResult};
use crate::external::CommandFfprobe;
use crate::loader::Loader;
use crate::naming::{self, SEPARATOR};
use crate::notifications::ProgressReporter;
use crate::vault::Vault;
use std::time::Duration;

/// Reconstructs the pre-conversion descriptor for an orphaned temp file,
/// honoring the overwrite flag the same way the forward path does.
fn generate_original_file(
    tmp: &AssetDescriptor,
    settings: &Settings,
) -> CoreResult<AssetDescriptor> {
    let decoded = naming::decode_temp_name(tmp.name()).ok_or_else(|| {
        CoreError::PathError(format!(
            "Cannot decode temporary file name '{}'",
            tmp.file_name()
        ))
    })?;

    let name = if settings.overwrite {
        decoded.stem
    } else {
        format!("{}{SEPARATOR}{}", decoded.stem, decoded.unique_id)
    };

    Ok(tmp.with_name(&name).with_extension(&decoded.extension))
}

/// Scans for orphaned temp files and renames each back onto its
/// pre-conversion path, clearing any file already at the destination.
///
/// Failure on one file aborts the remaining restorations: an ambiguous
/// partial state is worse than a clearly stopped run the user can repeat.
/// Returns the number of restored files.
pub fn rollback_assets<V, R>(vault: &V, reporter: &R, settings: &Settings) -> CoreResult<usize>
where
    V: Vault,
    R: ProgressReporter,
{
    settings.validate()?;

    let files = Loader::temporary().load(vault, None::<&CommandFfprobe>)?;
    reporter.notify(
        &format!("Found {} temporary files to restore", files.len()),
        None,
    );

    if files.is_empty() {
        return Ok(0);
    }

    let total = files.len();
    let mut restored = 0usize;

    for tmp in &files {
        reporter.update(&format!(
            "Restoring temporary file {}/{total} ({})",
            restored + 1,
            tmp.name()
        ));

        let result = generate_original_file(tmp, settings).and_then(|original| {
            let dest = original.rel_path();
            if vault.exists(&dest) {
                vault.remove(&dest)?;
            }
            vault.rename(tmp.handle(), &dest)?;
            Ok(dest)
        });

        match result {
            Ok(dest) => {
                log::info!("Restored {} -> {}", tmp.file_name(), dest.display());
                restored += 1;
            }
            Err(e) => {
                reporter.notify(
                    &format!(
                        "An error occurred while restoring {}, check the log output for details",
                        tmp.rel_path().display()
                    ),
                    Some(Duration::from_secs(5)),
                );
                log::error!("Restoration failed for {}: {e}", tmp.rel_path().display());
                break;
            }
        }
    }

    reporter.notify("Temporary file restoration ended", Some(Duration::from_secs(3)));
    reporter.hide();

    Ok(restored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::MediaKind;
    use crate::vault::VaultHandle;
    use std::path::PathBuf;

    fn tmp_asset(file_name: &str) -> AssetDescriptor {
        let handle = VaultHandle::new(
            PathBuf::from(format!("media/{file_name}")),
            PathBuf::from(format!("/vault/media/{file_name}")),
        );
        AssetDescriptor::from_handle(&handle, MediaKind::Unknown)
    }

    #[test]
    fn original_identity_is_recovered_from_the_encoded_name() {
        let settings = Settings::default();
        let original =
            generate_original_file(&tmp_asset("report_pdf_aB3dK9.tmp"), &settings).unwrap();
        assert_eq!(original.file_name(), "report.pdf");
        assert_eq!(original.rel_path(), PathBuf::from("media/report.pdf"));
    }

    #[test]
    fn stems_with_separators_survive_the_round_trip() {
        let settings = Settings::default();
        let original =
            generate_original_file(&tmp_asset("my_summer_trip_jpeg_x1Y2z3.tmp"), &settings)
                .unwrap();
        assert_eq!(original.file_name(), "my_summer_trip.jpeg");
    }

    #[test]
    fn overwrite_disabled_keeps_the_unique_suffix() {
        let mut settings = Settings::default();
        settings.overwrite = false;
        let original =
            generate_original_file(&tmp_asset("report_pdf_aB3dK9.tmp"), &settings).unwrap();
        assert_eq!(original.file_name(), "report_aB3dK9.pdf");
    }

    #[test]
    fn undecodable_names_are_an_error() {
        let settings = Settings::default();
        assert!(generate_original_file(&tmp_asset("junk.tmp"), &settings).is_err());
    }
}
