//! Cisco dialect profiles (IOS, IOS-XR, NX-OS, ASA).
//!
//! All four share the `show running-config` retrieval path: the read ends
//! at the next prompt and the output is kept as-is.
//!
//! # Prompt Examples
//!
//! ```text
//! core-sw1>                          # IOS user exec
//! core-sw1#                          # IOS privileged exec
//! RP/0/RSP0/CPU0:edge-1#             # IOS-XR
//! n9k-leaf-01#                       # NX-OS
//! fw-outside/pri/act#                # ASA multi-context
//! ```

use crate::dialect::DialectProfile;

const IOS_PROMPT: &str = r"(?m)^[\w.\-@()/: ]{1,63}[>#]\s?$";
const XR_PROMPT: &str = r"(?m)^[\w.\-@/:]{1,63}#\s?$";
const PAGER: &str = r"-+ ?More ?-+";

fn show_running_config(name: &str, prompt: &str) -> DialectProfile {
    DialectProfile::new(name, prompt)
        .expect("valid Cisco prompt pattern")
        .with_pager(PAGER)
        .expect("valid Cisco pager pattern")
        .with_retrieval("show running-config")
        .with_failure_pattern("% Invalid input")
        .with_failure_pattern("% Ambiguous command")
        .with_failure_pattern("% Incomplete command")
        .with_failure_pattern("% Unknown command")
}

/// Cisco IOS / IOS-XE.
pub fn ios() -> DialectProfile {
    show_running_config("cisco_ios", IOS_PROMPT)
        .with_on_open_command("terminal length 0")
        .with_on_open_command("terminal width 511")
}

/// Cisco IOS-XR.
pub fn xr() -> DialectProfile {
    show_running_config("cisco_xr", XR_PROMPT)
        .with_on_open_command("terminal length 0")
        .with_on_open_command("terminal width 511")
}

/// Cisco NX-OS.
pub fn nxos() -> DialectProfile {
    show_running_config("cisco_nxos", IOS_PROMPT)
        .with_on_open_command("terminal length 0")
        .with_on_open_command("terminal width 511")
}

/// Cisco ASA.
pub fn asa() -> DialectProfile {
    show_running_config("cisco_asa", IOS_PROMPT)
        .with_on_open_command("terminal pager 0")
        .with_failure_pattern("ERROR: % Invalid input")
}
