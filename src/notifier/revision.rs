//! # Revision Parsing
//!
//! Source controllers report revisions as `<ref>/<hash>` (for example
//! `main/4f1c2d9` or `refs/tags/v1.0.0/4f1c2d9`); the commit hash is always
//! the final path segment.

use crate::error::NotifierError;

/// Extract the commit hash from a revision descriptor
///
/// Accepts `<ref>/<hash>` or a bare hash.
///
/// # Errors
/// Returns `MissingRevision` when the descriptor or its final segment is empty,
/// and `InvalidRevision` when the final segment is a `.` or `..` path segment.
pub fn parse_revision(revision: &str) -> Result<String, NotifierError> {
    let hash = revision.rsplit('/').next().unwrap_or_default().trim();
    match hash {
        "" => Err(NotifierError::MissingRevision),
        "." | ".." => Err(NotifierError::InvalidRevision {
            revision: revision.to_string(),
        }),
        _ => Ok(hash.to_string()),
    }
}
