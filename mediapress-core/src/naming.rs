//! Temp-file naming: unique IDs and the reversible name encoding.
//!
//! A staged working copy is named `{stem}_{extension}_{uniqueId}.tmp`. That
//! encoded name is the only persisted record of what the file used to be, so
//! it must decode back exactly. The unique ID is sampled from an alphanumeric
//! alphabet that contains no `_`, and decoding splits from the right, which
//! keeps stems containing `_` unambiguous.

use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};

/// Separator between the stem, original extension and unique ID inside an
/// encoded temp name.
pub const SEPARATOR: char = '_';

/// Generates a short random alphanumeric token. Not cryptographically
/// secure; it only has to make file names collide-free.
pub fn generate_unique_id(length: usize) -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Encodes the stem of a staged working copy. The file's extension is the
/// fixed [`crate::formats::TEMP_EXTENSION`] marker.
pub fn encode_temp_name(stem: &str, extension: &str, unique_id: &str) -> String {
    format!("{stem}{SEPARATOR}{extension}{SEPARATOR}{unique_id}")
}

/// The decoded identity of a staged working copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTempName {
    pub stem: String,
    pub extension: String,
    pub unique_id: String,
}

/// Decodes a temp-file stem back into its parts, splitting from the right:
/// last segment is the unique ID, second-to-last the original extension, the
/// remainder (separators included) the original stem.
///
/// Returns `None` for stems that do not carry at least three segments.
pub fn decode_temp_name(name: &str) -> Option<DecodedTempName> {
    let (rest, unique_id) = name.rsplit_once(SEPARATOR)?;
    let (stem, extension) = rest.rsplit_once(SEPARATOR)?;
    if stem.is_empty() || extension.is_empty() || unique_id.is_empty() {
        return None;
    }
    Some(DecodedTempName {
        stem: stem.to_string(),
        extension: extension.to_string(),
        unique_id: unique_id.to_string(),
    })
}
