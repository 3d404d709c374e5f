//! Arista EOS profile.
//!
//! Prompt patterns are adapted from [scrapli](https://github.com/carlmontanari/scrapli).
//! EOS is not part of the Cisco retrieval family, so it goes through the
//! default `display current-configuration` path.
//!
//! # Prompt Examples
//!
//! ```text
//! switch>                            # exec mode
//! switch#                            # privilege_exec mode
//! ```

use crate::dialect::DialectProfile;

/// Create the Arista EOS profile.
pub fn profile() -> DialectProfile {
    DialectProfile::new("arista_eos", r"(?mi)^[\w.\-@()/: ]{1,63}[>#]\s?$")
        .expect("valid EOS prompt pattern")
        .with_pager(r"-+ ?More ?-+")
        .expect("valid EOS pager pattern")
        .with_on_open_command("terminal length 0")
        .with_on_open_command("terminal width 32767")
        .with_failure_pattern("% Ambiguous command")
        .with_failure_pattern("% Error")
        .with_failure_pattern("% Incomplete command")
        .with_failure_pattern("% Invalid input")
}
