//! Command dialects of the supported network operating systems.
//!
//! A [`Dialect`] is the classification the detector produces; the
//! matching [`DialectProfile`] carries the prompt, pager, session
//! preparation and retrieval details used to talk to that device.

mod profile;
mod registry;
pub mod vendors;

pub use profile::{DialectProfile, RetrievalCommand};
pub use registry::DialectRegistry;

use std::fmt;
use std::str::FromStr;

/// Classification of a device's command surface.
///
/// When probing is inconclusive the detector falls back to
/// [`Dialect::default()`], which is [`Dialect::HpComware`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
    /// Cisco IOS / IOS-XE
    CiscoIos,
    /// Cisco IOS-XR
    CiscoXr,
    /// Cisco NX-OS
    CiscoNxos,
    /// Cisco ASA
    CiscoAsa,
    /// Arista EOS
    AristaEos,
    /// Juniper Junos
    JuniperJunos,
    /// H3C / HPE Comware
    #[default]
    HpComware,
    /// Huawei VRP
    Huawei,
    /// Generic Linux shell
    Linux,
}

impl Dialect {
    /// Every dialect, in detection order.
    pub const ALL: [Dialect; 9] = [
        Dialect::CiscoXr,
        Dialect::CiscoNxos,
        Dialect::CiscoAsa,
        Dialect::CiscoIos,
        Dialect::AristaEos,
        Dialect::JuniperJunos,
        Dialect::HpComware,
        Dialect::Huawei,
        Dialect::Linux,
    ];

    /// Stable snake_case name.
    pub fn name(self) -> &'static str {
        match self {
            Dialect::CiscoIos => "cisco_ios",
            Dialect::CiscoXr => "cisco_xr",
            Dialect::CiscoNxos => "cisco_nxos",
            Dialect::CiscoAsa => "cisco_asa",
            Dialect::AristaEos => "arista_eos",
            Dialect::JuniperJunos => "juniper_junos",
            Dialect::HpComware => "hp_comware",
            Dialect::Huawei => "huawei",
            Dialect::Linux => "linux",
        }
    }

    /// Whether the device speaks the Cisco `show running-config` family.
    pub fn is_cisco_like(self) -> bool {
        matches!(
            self,
            Dialect::CiscoIos | Dialect::CiscoXr | Dialect::CiscoNxos | Dialect::CiscoAsa
        )
    }

    /// The built-in profile for this dialect.
    pub fn profile(self) -> &'static DialectProfile {
        DialectRegistry::global().get(self)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dialect::ALL
            .into_iter()
            .find(|d| d.name() == s)
            .ok_or_else(|| format!("unknown dialect '{s}'"))
    }
}
