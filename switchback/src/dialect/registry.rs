//! Global registry of built-in dialect profiles.

use std::sync::LazyLock;

use indexmap::IndexMap;

use super::profile::DialectProfile;
use super::{Dialect, vendors};

static REGISTRY: LazyLock<DialectRegistry> = LazyLock::new(DialectRegistry::builtin);

/// Registry of dialect profiles, kept in detection order.
#[derive(Debug)]
pub struct DialectRegistry {
    profiles: IndexMap<Dialect, DialectProfile>,
    autodetect: DialectProfile,
}

impl DialectRegistry {
    /// Get the global registry.
    pub fn global() -> &'static DialectRegistry {
        &REGISTRY
    }

    fn builtin() -> Self {
        let profiles = Dialect::ALL
            .into_iter()
            .map(|dialect| (dialect, vendors::profile(dialect)))
            .collect();

        Self {
            profiles,
            autodetect: vendors::autodetect::profile(),
        }
    }

    /// Get the profile for a dialect.
    pub fn get(&self, dialect: Dialect) -> &DialectProfile {
        // every Dialect variant is inserted by builtin()
        &self.profiles[&dialect]
    }

    /// The profile used while the dialect is still unknown.
    pub fn autodetect(&self) -> &DialectProfile {
        &self.autodetect
    }

    /// Iterate over the registered profiles in detection order.
    pub fn iter(&self) -> impl Iterator<Item = (Dialect, &DialectProfile)> {
        self.profiles.iter().map(|(d, p)| (*d, p))
    }
}
