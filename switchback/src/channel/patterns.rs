//! Pattern helpers for prompt and end-marker detection.

use regex::bytes::Regex;

/// Compile a regex that matches a line consisting only of `token`.
///
/// Devices terminate some outputs with a bare marker line (Comware and
/// VRP end `display current-configuration` with `return`). The match has
/// to be on a line of its own so that words such as `returned` inside the
/// configuration do not end the read early.
pub fn end_marker_pattern(token: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"(?m)^[ \t]*{}[ \t\r]*$", regex::escape(token)))
}
