//! Linux shell profile.
//!
//! Plain `$` (user) and `#` (root) prompts, no pager.

use crate::dialect::DialectProfile;

/// Create the Linux profile.
pub fn profile() -> DialectProfile {
    DialectProfile::new("linux", r"[$#]\s*$")
        .expect("valid shell prompt pattern")
        .with_failure_pattern("command not found")
}
