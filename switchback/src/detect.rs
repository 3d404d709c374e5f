//! SSH-based dialect detection.
//!
//! The detector logs in with the autodetect profile, runs a small set of
//! version commands and matches their output against a probe table. The
//! best match wins; anything else (no match, unreachable host, rejected
//! login, timeouts) resolves to [`Dialect::default()`]. Detection never
//! fails: retrieval always gets a dialect to work with.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use log::{debug, warn};
use regex::Regex;

use crate::dialect::{Dialect, DialectRegistry};
use crate::driver::{Connector, Driver};
use crate::hosts::HostCredential;

/// One row of the probe table.
#[derive(Debug, Clone)]
pub struct SshProbe {
    /// Dialect this probe identifies.
    pub dialect: Dialect,

    /// Command whose output is inspected.
    pub command: &'static str,

    /// Any of these matching the output counts as a hit.
    pub patterns: Vec<Regex>,

    /// Higher wins when several probes hit.
    pub priority: u8,
}

impl SshProbe {
    fn new(dialect: Dialect, command: &'static str, patterns: &[&str], priority: u8) -> Self {
        Self {
            dialect,
            command,
            patterns: patterns
                .iter()
                .map(|p| Regex::new(p).expect("valid probe pattern"))
                .collect(),
            priority,
        }
    }

    /// Check whether `output` identifies this probe's dialect.
    pub fn matches(&self, output: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(output))
    }
}

static PROBES: LazyLock<Vec<SshProbe>> = LazyLock::new(|| {
    vec![
        SshProbe::new(Dialect::CiscoXr, "show version", &[r"Cisco IOS XR"], 99),
        SshProbe::new(
            Dialect::CiscoNxos,
            "show version",
            &[r"Cisco Nexus Operating System", r"NX-OS"],
            99,
        ),
        SshProbe::new(
            Dialect::CiscoAsa,
            "show version",
            &[r"Cisco Adaptive Security Appliance", r"Cisco ASA"],
            99,
        ),
        SshProbe::new(
            Dialect::CiscoIos,
            "show version",
            &[
                r"Cisco IOS Software",
                r"Cisco Internetwork Operating System Software",
            ],
            95,
        ),
        SshProbe::new(Dialect::AristaEos, "show version", &[r"Arista"], 99),
        SshProbe::new(
            Dialect::JuniperJunos,
            "show version",
            &[
                r"JUNOS Software Release",
                r"JUNOS .+ Software",
                r"JUNOS OS Kernel",
                r"JUNOS Base Version",
            ],
            99,
        ),
        SshProbe::new(
            Dialect::HpComware,
            "display version",
            &[r"(?i)\bComware\b", r"H3C"],
            99,
        ),
        SshProbe::new(
            Dialect::Huawei,
            "display version",
            &[
                r"Huawei Versatile Routing Platform",
                r"Huawei Technologies",
                r"HUAWEI",
            ],
            95,
        ),
        SshProbe::new(Dialect::Linux, "uname -a", &[r"Linux"], 50),
    ]
});

/// The built-in probe table, in evaluation order.
pub fn probe_table() -> &'static [SshProbe] {
    &PROBES
}

/// Pick the best dialect from probe command outputs.
///
/// `outputs` maps a probe command to what the device printed for it.
/// The highest-priority matching probe wins; ties go to the earlier row.
pub fn classify(probes: &[SshProbe], outputs: &HashMap<&str, String>) -> Option<Dialect> {
    let mut best: Option<&SshProbe> = None;

    for probe in probes {
        let Some(output) = outputs.get(probe.command) else {
            continue;
        };
        if !probe.matches(output) {
            continue;
        }
        if best.is_none_or(|b| probe.priority > b.priority) {
            best = Some(probe);
        }
    }

    best.map(|p| p.dialect)
}

/// Probes devices and classifies their command dialect.
pub struct DialectDetector<C> {
    connector: Arc<C>,
    probe_timeout: Duration,
}

impl<C: Connector> DialectDetector<C> {
    /// Create a detector using `connector` for its probe sessions.
    pub fn new(connector: Arc<C>, probe_timeout: Duration) -> Self {
        Self {
            connector,
            probe_timeout,
        }
    }

    /// Detect the dialect of `host`, falling back to the default on any failure.
    pub async fn detect(&self, host: &HostCredential) -> Dialect {
        match self.probe(host).await {
            Some(dialect) => {
                debug!("{}: detected {}", host.address, dialect);
                dialect
            }
            None => {
                let fallback = Dialect::default();
                debug!("{}: no dialect match, using {}", host.address, fallback);
                fallback
            }
        }
    }

    async fn probe(&self, host: &HostCredential) -> Option<Dialect> {
        let profile = DialectRegistry::global().autodetect();
        let mut driver = match self.connector.connect(host, profile).await {
            Ok(driver) => driver,
            Err(e) => {
                warn!("{}: detection session failed: {}", host.address, e);
                return None;
            }
        };

        let probes = probe_table();
        let mut outputs: HashMap<&str, String> = HashMap::new();

        for probe in probes {
            if outputs.contains_key(probe.command) {
                continue;
            }
            match driver.send_command(probe.command, self.probe_timeout).await {
                Ok(response) => {
                    outputs.insert(probe.command, response.result);
                }
                Err(e) => {
                    debug!(
                        "{}: probe '{}' failed, stopping: {}",
                        host.address, probe.command, e
                    );
                    break;
                }
            }
            // The first command with a hit decides.
            if classify(probes, &outputs).is_some() {
                break;
            }
        }

        if let Err(e) = driver.close().await {
            debug!("{}: detection session close: {}", host.address, e);
        }

        classify(probes, &outputs)
    }
}
