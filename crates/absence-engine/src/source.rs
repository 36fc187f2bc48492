//! Load a calendar export into memory.

use crate::error::{AbsenceError, Result};
use std::borrow::Cow;
use std::path::Path;

/// Read a calendar document and normalize its line endings to `\n`.
///
/// Exports arrive with CRLF endings; folding is only recognized as `"\n "`,
/// so `\r\n` and lone `\r` are rewritten before anything else sees the text.
pub fn read_calendar(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| AbsenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = raw.len(), "read calendar");
    Ok(normalize_newlines(&raw).into_owned())
}

/// Rewrite `\r\n` and bare `\r` as `\n`.
pub fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}
