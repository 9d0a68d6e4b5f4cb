//! Authorization
//!
//! Any-of-N signing: one signature from the required set suffices.
//! An empty required set never authorizes anything.

use std::collections::BTreeSet;

use lib_types::{KeyHash, ValidationError, ValidationResult};

/// True iff `required` and `signatories` intersect. Empty `required` is false.
pub fn is_authorized<'a>(
    required: impl IntoIterator<Item = &'a KeyHash>,
    signatories: &BTreeSet<KeyHash>,
) -> bool {
    required.into_iter().any(|key| signatories.contains(key))
}

/// [`is_authorized`] with the rejection reason attached
pub fn require_authorized(
    required: &[KeyHash],
    signatories: &BTreeSet<KeyHash>,
) -> ValidationResult<()> {
    if required.is_empty() {
        return Err(ValidationError::EmptyRequiredKeys);
    }
    if !is_authorized(required, signatories) {
        return Err(ValidationError::MissingSignature {
            required: required.len(),
        });
    }
    Ok(())
}
