//! Split an unfolded calendar into raw `VEVENT` bodies.

use regex::Regex;
use std::sync::LazyLock;

// Non-greedy so an event missing its END marker cannot swallow the next one.
static RE_VEVENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)BEGIN:VEVENT(.*?)END:VEVENT").expect("valid VEVENT regex"));

/// Return the text between each `BEGIN:VEVENT` and the next `END:VEVENT`,
/// markers excluded, in source order.
///
/// A document without any complete event block yields an empty vec.
pub fn chunk_events(text: &str) -> Vec<&str> {
    RE_VEVENT
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect()
}
