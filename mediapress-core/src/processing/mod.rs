//! Batch orchestration: the forward conversion pipeline and the rollback
//! path that restores orphaned working copies.

pub mod pipeline;
pub mod rollback;

pub use pipeline::{process_assets, ConvertOutcome};
pub use rollback::rollback_assets;
