//! Built-in vendor dialect profiles.

pub mod arista;
pub mod autodetect;
pub mod cisco;
pub mod comware;
pub mod huawei;
pub mod juniper;
pub mod linux;

use super::{Dialect, DialectProfile};

/// Build the profile for a dialect.
pub fn profile(dialect: Dialect) -> DialectProfile {
    match dialect {
        Dialect::CiscoIos => cisco::ios(),
        Dialect::CiscoXr => cisco::xr(),
        Dialect::CiscoNxos => cisco::nxos(),
        Dialect::CiscoAsa => cisco::asa(),
        Dialect::AristaEos => arista::profile(),
        Dialect::JuniperJunos => juniper::profile(),
        Dialect::HpComware => comware::profile(),
        Dialect::Huawei => huawei::profile(),
        Dialect::Linux => linux::profile(),
    }
}
