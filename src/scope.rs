//! Deterministic scoped class names for CSS module stylesheets.
//!
//! Two files can each declare `.button` without colliding once bundled into
//! one global stylesheet: every local class name gets a short fingerprint
//! derived from the declaring file's path. The mapping is a pure function of
//! its inputs, so the same pair produces the same name across runs, machines,
//! and processes.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sha2::{Digest, Sha256};

/// Separator between the local class name and its fingerprint.
pub const SEPARATOR: &str = "__";

/// Number of fingerprint characters kept after cleanup.
///
/// Five characters keeps generated names short and readable at the cost of a
/// small fingerprint space; collisions across a very large number of distinct
/// files and classes are possible in principle. Downstream snapshot tests
/// depend on the exact output length, so the truncation stays fixed.
pub const FINGERPRINT_LEN: usize = 5;

/// Produce the scoped form of `local_class` as declared in `file_path`.
///
/// Accepts any two strings, including empty ones, and never fails. The result
/// is always `local_class`, then [`SEPARATOR`], then the fingerprint.
pub fn scoped_class_name(file_path: &str, local_class: &str) -> String {
    let fingerprint = fingerprint(file_path, local_class);
    format!("{local_class}{SEPARATOR}{fingerprint}")
}

/// Compute the fingerprint segment for a `(file_path, local_class)` pair.
///
/// The digest is fed the file path first and the class name second, so
/// swapping the two arguments changes the output. The base64 characters that
/// are not valid in CSS identifiers (`/` and `+`) are stripped before
/// truncation, which narrows the effective alphabet without rebalancing
/// entropy.
pub fn fingerprint(file_path: &str, local_class: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(file_path.as_bytes());
    hasher.update(local_class.as_bytes());
    let encoded = STANDARD.encode(hasher.finalize());

    encoded
        .chars()
        .filter(|ch| *ch != '/' && *ch != '+')
        .take(FINGERPRINT_LEN)
        .collect()
}
