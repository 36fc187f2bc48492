//! Undo the exporter's line folding.
//!
//! The calendar exporter breaks long logical lines (mostly ATTENDEE and
//! ORGANIZER) by inserting a newline followed by one space, at no consistent
//! column. The exporter never emits that pair as content, so every occurrence
//! is removed. Tab continuations are not recognized.

use std::borrow::Cow;

/// The two-character continuation sequence inserted by the exporter.
pub const FOLD: &str = "\n ";

/// Remove every fold sequence from `text`.
///
/// Returns the input unchanged (borrowed) when there is nothing to unfold.
pub fn unfold(text: &str) -> Cow<'_, str> {
    if text.contains(FOLD) {
        Cow::Owned(text.replace(FOLD, ""))
    } else {
        Cow::Borrowed(text)
    }
}
