//! Loads the sponsor exempt list from disk.

use std::path::Path;

use moderation::{parse_exempt_sponsors, Sponsor};
use tracing::debug;

/// Reads the exempt file at `path`.
///
/// A missing or unreadable file means "no exempt entries"; it is not an error.
/// Invalid UTF-8 sequences are replaced with U+FFFD; valid lines are kept.
pub fn load_exempt_sponsors(path: &Path) -> Vec<Sponsor> {
    match std::fs::read(path) {
        Ok(bytes) => {
            let sponsors = parse_exempt_sponsors(&String::from_utf8_lossy(&bytes));
            debug!(path = %path.display(), entries = sponsors.len(), "Loaded exempt list");
            sponsors
        }
        Err(error) => {
            debug!(path = %path.display(), %error, "Exempt list not readable, skipping");
            Vec::new()
        }
    }
}
