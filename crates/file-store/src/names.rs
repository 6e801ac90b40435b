//! Validation of caller-supplied archive and deck names.
//!
//! Both kinds of name are interpolated into staging paths, so anything
//! that is not a single normal path component is rejected before any
//! filesystem access or automation call.

use std::path::{Component, Path};

use crate::StoreError;

/// Required archive filename suffix (case-sensitive).
pub const ARCHIVE_SUFFIX: &str = ".apkg";

/// Validates an uploaded archive filename.
///
/// Rejects:
/// - names without the `.apkg` suffix
/// - a bare suffix with no stem
/// - embedded NUL bytes
/// - separators, parent-directory segments, absolute paths
pub fn validate_archive_name(name: &str) -> Result<(), StoreError> {
    if !name.ends_with(ARCHIVE_SUFFIX) {
        return Err(StoreError::InvalidName(format!(
            "archive must end in {ARCHIVE_SUFFIX}: {name}"
        )));
    }
    if name.len() == ARCHIVE_SUFFIX.len() {
        return Err(StoreError::InvalidName(format!(
            "archive has an empty stem: {name}"
        )));
    }
    validate_single_component(name)
}

/// Validates a deck name used to derive an export path.
pub fn validate_deck_name(name: &str) -> Result<(), StoreError> {
    if name.is_empty() {
        return Err(StoreError::InvalidName("empty deck name".into()));
    }
    validate_single_component(name)
}

/// Rejects anything that is not a single normal path component.
fn validate_single_component(name: &str) -> Result<(), StoreError> {
    if name.contains('\0') {
        return Err(StoreError::InvalidName("NUL byte in name".into()));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(StoreError::InvalidName(format!(
            "path separator not allowed: {name}"
        )));
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(StoreError::InvalidName(format!("unsafe name: {name}"))),
    }
}
