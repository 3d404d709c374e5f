//! Juniper Junos profile.
//!
//! Prompt patterns are adapted from [scrapli](https://github.com/carlmontanari/scrapli).
//!
//! # Prompt Examples
//!
//! ```text
//! user@router>              # operational mode
//! {master:0}                # routing-engine indicator (separate line)
//! user@router>              # operational prompt on next line
//! ```

use crate::dialect::DialectProfile;

/// Create the Juniper Junos profile.
pub fn profile() -> DialectProfile {
    DialectProfile::new(
        "juniper_junos",
        r"(?mi)^(\{\w+(:(\w+)?\d)?\}\n)?[\w\-@()/:\.]{1,63}[>#]\s?$",
    )
    .expect("valid Junos prompt pattern")
    .with_pager(r"---\(more(?: \d+%)?\)---")
    .expect("valid Junos pager pattern")
    .with_on_open_command("set cli screen-length 0")
    .with_on_open_command("set cli screen-width 511")
    .with_failure_pattern("unknown command.")
    .with_failure_pattern("syntax error")
}
