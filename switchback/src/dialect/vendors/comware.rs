//! H3C / HPE Comware profile.
//!
//! This is also the fallback profile when a device cannot be classified.
//! Comware pads `display current-configuration` with login banners and
//! echo, so only the span from the first `#` line to the closing `return`
//! is kept.
//!
//! # Prompt Examples
//!
//! ```text
//! <H3C>                              # user view
//! [H3C]                              # system view
//! [H3C-GigabitEthernet1/0/1]         # interface view
//! ```

use crate::dialect::DialectProfile;

/// Create the Comware profile.
pub fn profile() -> DialectProfile {
    DialectProfile::new("hp_comware", r"(?m)^[<\[][\w.\-@/: ]{1,63}[>\]]\s?$")
        .expect("valid Comware prompt pattern")
        .with_pager(r"-+ ?More ?-+")
        .expect("valid Comware pager pattern")
        .with_on_open_command("screen-length disable")
        .with_retrieval_until("display current-configuration", "return")
        .with_span_extraction()
        .with_failure_pattern("% Unrecognized command")
        .with_failure_pattern("% Incomplete command")
        .with_failure_pattern("% Too many parameters")
        .with_failure_pattern("% Wrong parameter")
}
