//! Asset discovery.
//!
//! A loader scans the store for files of one media kind. Filtering is
//! two-stage: the extension must be in the loader's allow-list (built from
//! the settings' include flags), and ambiguous container extensions must
//! additionally pass a stream probe resolving to the loader's kind. Probes
//! run concurrently across candidates (independent read-only inspections),
//! but the returned list keeps the store's enumeration order.

use crate::asset::AssetDescriptor;
use crate::config::Settings;
use crate::external::StreamProber;
use crate::formats::{self, MediaKind, TEMP_EXTENSION};
use crate::error::CoreResult;
use crate::vault::{Vault, VaultHandle};
use rayon::prelude::*;

/// Discovers store files of one media kind.
#[derive(Debug, Clone)]
pub struct Loader {
    kind: MediaKind,
    extensions: Vec<String>,
}

impl Loader {
    fn new(kind: MediaKind, extensions: Vec<String>) -> Self {
        Self { kind, extensions }
    }

    pub fn image(settings: &Settings) -> Self {
        Self::for_kind(MediaKind::Image, settings)
    }

    pub fn video(settings: &Settings) -> Self {
        Self::for_kind(MediaKind::Video, settings)
    }

    pub fn audio(settings: &Settings) -> Self {
        Self::for_kind(MediaKind::Audio, settings)
    }

    /// Loader over the extensions currently enabled for a kind.
    pub fn for_kind(kind: MediaKind, settings: &Settings) -> Self {
        let extensions = settings
            .enabled_extensions(kind)
            .into_iter()
            .map(String::from)
            .collect();
        Self::new(kind, extensions)
    }

    /// Loader surfacing orphaned working copies from interrupted runs,
    /// independent of media kind.
    pub fn temporary() -> Self {
        Self::new(MediaKind::Unknown, vec![TEMP_EXTENSION.to_string()])
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    /// Enumerates matching assets, evaluated freshly on each call.
    ///
    /// The prober is consulted only for ambiguous extensions; a probe error
    /// excludes that file and the scan continues. Without a prober,
    /// ambiguous candidates are excluded outright.
    pub fn load<V, P>(&self, vault: &V, prober: Option<&P>) -> CoreResult<Vec<AssetDescriptor>>
    where
        V: Vault,
        P: StreamProber + Sync,
    {
        let candidates: Vec<VaultHandle> = vault
            .files()?
            .into_iter()
            .filter(|handle| {
                let ext = handle.extension();
                self.extensions.iter().any(|allowed| *allowed == ext)
            })
            .collect();

        let assets = candidates
            .par_iter()
            .map(|handle| self.select(handle, prober))
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect();

        Ok(assets)
    }

    fn select<P>(&self, handle: &VaultHandle, prober: Option<&P>) -> Option<AssetDescriptor>
    where
        P: StreamProber + Sync,
    {
        if !formats::is_ambiguous(&handle.extension()) {
            return Some(AssetDescriptor::from_handle(handle, self.kind));
        }

        let Some(prober) = prober else {
            log::debug!(
                "Excluding {} (ambiguous container, no prober available)",
                handle.rel_path().display()
            );
            return None;
        };

        match prober.probe_streams(handle.abs_path()) {
            Ok(report) if report.resolved_kind() == self.kind => {
                Some(AssetDescriptor::from_handle(handle, self.kind))
            }
            Ok(_) => None,
            Err(e) => {
                // Probe failures must not take the batch down; the file is
                // simply not a match.
                log::warn!(
                    "Stream probe failed for {}, excluding it: {e}",
                    handle.rel_path().display()
                );
                None
            }
        }
    }
}
