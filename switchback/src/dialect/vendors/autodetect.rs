//! Profile used while probing a device of unknown dialect.
//!
//! The prompt pattern is the union of the vendor prompt shapes and the
//! pager pattern covers every vendor's `More` banner, so probe commands
//! can run before the dialect is known.

use crate::dialect::DialectProfile;

/// Create the autodetect profile.
pub fn profile() -> DialectProfile {
    DialectProfile::new(
        "autodetect",
        r"(?m)(^[\w.\-@()/:~ ]{1,63}[>#$%]|^[<\[][~*]?[\w.\-@/: ]{1,63}[>\]])\s?$",
    )
    .expect("valid autodetect prompt pattern")
    .with_pager(r"-+ ?More ?-+|---\(more(?: \d+%)?\)---")
    .expect("valid autodetect pager pattern")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_matches_every_vendor() {
        let profile = profile();
        for prompt in [
            &b"core-sw1#"[..],
            b"core-sw1>",
            b"RP/0/RSP0/CPU0:edge-1#",
            b"<H3C>",
            b"[~HUAWEI]",
            b"user@router>",
            b"user@host:~$ ",
        ] {
            assert!(
                profile.prompt.is_match(prompt),
                "{}",
                String::from_utf8_lossy(prompt)
            );
        }
    }

    #[test]
    fn test_pager_matches_every_vendor() {
        let profile = profile();
        let pager = profile.pager.as_ref().unwrap();
        assert!(pager.is_match(b" --More-- "));
        assert!(pager.is_match(b"  ---- More ----"));
        assert!(pager.is_match(b"---(more 10%)---"));
    }
}
