//! Huawei VRP profile.
//!
//! # Prompt Examples
//!
//! ```text
//! <HUAWEI>                           # user view
//! [HUAWEI]                           # system view
//! [~HUAWEI]                          # VRP8 two-stage commit view
//! [*HUAWEI-GE1/0/1]                  # VRP8 with uncommitted changes
//! ```

use crate::dialect::DialectProfile;

/// Create the Huawei VRP profile.
pub fn profile() -> DialectProfile {
    DialectProfile::new("huawei", r"(?m)^[<\[][~*]?[\w.\-@/: ]{1,63}[>\]]\s?$")
        .expect("valid VRP prompt pattern")
        .with_pager(r"-+ ?More ?-+")
        .expect("valid VRP pager pattern")
        .with_on_open_command("screen-length 0 temporary")
        .with_retrieval_until("display current-configuration", "return")
        .with_failure_pattern("Error: Unrecognized command")
        .with_failure_pattern("Error: Wrong parameter")
        .with_failure_pattern("Error: Incomplete command")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_match() {
        let profile = profile();
        assert!(profile.prompt.is_match(b"<HUAWEI>"));
        assert!(profile.prompt.is_match(b"[~HUAWEI]"));
        assert!(profile.prompt.is_match(b"[*HUAWEI-GE1/0/1]"));
        assert!(!profile.prompt.is_match(b"HUAWEI#"));
    }

    #[test]
    fn test_no_span_extraction() {
        let profile = profile();
        assert_eq!(profile.retrieval.end_marker.as_deref(), Some("return"));
        assert!(!profile.extract_span);
    }
}
