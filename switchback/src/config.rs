//! Run configuration.
//!
//! Every field has a default, so an empty file (or no file) is a valid
//! configuration:
//!
//! ```toml
//! concurrency = 8
//! output_dir = "/var/backups/switches"
//! port = 22
//! host_key_verification = "accept-new"
//!
//! [timeouts]
//! connect = 5
//! auth = 10
//! read = 30
//! probe = 10
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::Semaphore;

use crate::driver::SessionSettings;
use crate::error::{ConfigError, Result};
use crate::transport::HostKeyVerification;

/// Settings for one backup run.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Maximum number of hosts processed at the same time.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Root of the dated backup tree.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// SSH port used for every host.
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub timeouts: Timeouts,

    #[serde(default)]
    pub host_key_verification: HostKeyVerification,

    /// known_hosts file; `~/.ssh/known_hosts` when unset.
    #[serde(default)]
    pub known_hosts_path: Option<PathBuf>,

    #[serde(default = "default_terminal_width")]
    pub terminal_width: u32,

    #[serde(default = "default_terminal_height")]
    pub terminal_height: u32,

    /// Bytes from the end of the output searched for prompts.
    #[serde(default = "default_search_depth")]
    pub search_depth: usize,
}

/// Per-phase timeouts, in seconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Timeouts {
    /// TCP connect plus SSH handshake.
    #[serde(default = "default_connect_timeout")]
    pub connect: u64,

    /// Password authentication.
    #[serde(default = "default_auth_timeout")]
    pub auth: u64,

    /// Each command read, including the configuration dump.
    #[serde(default = "default_read_timeout")]
    pub read: u64,

    /// Each detection probe command.
    #[serde(default = "default_probe_timeout")]
    pub probe: u64,
}

fn default_concurrency() -> usize {
    8
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_port() -> u16 {
    22
}

fn default_terminal_width() -> u32 {
    511
}

fn default_terminal_height() -> u32 {
    24
}

fn default_search_depth() -> usize {
    1000
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_auth_timeout() -> u64 {
    10
}

fn default_read_timeout() -> u64 {
    30
}

fn default_probe_timeout() -> u64 {
    10
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            connect: default_connect_timeout(),
            auth: default_auth_timeout(),
            read: default_read_timeout(),
            probe: default_probe_timeout(),
        }
    }
}

impl Timeouts {
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect)
    }

    pub fn auth(&self) -> Duration {
        Duration::from_secs(self.auth)
    }

    pub fn read(&self) -> Duration {
        Duration::from_secs(self.read)
    }

    pub fn probe(&self) -> Duration {
        Duration::from_secs(self.probe)
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            output_dir: default_output_dir(),
            port: default_port(),
            timeouts: Timeouts::default(),
            host_key_verification: HostKeyVerification::default(),
            known_hosts_path: None,
            terminal_width: default_terminal_width(),
            terminal_height: default_terminal_height(),
            search_depth: default_search_depth(),
        }
    }
}

impl RunConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: RunConfig = toml::from_str(text).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Reject values that would make a run impossible.
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(invalid("concurrency must be at least 1"));
        }
        if self.concurrency > Semaphore::MAX_PERMITS {
            return Err(invalid(&format!(
                "concurrency must be at most {}",
                Semaphore::MAX_PERMITS
            )));
        }
        if self.search_depth == 0 {
            return Err(invalid("search_depth must be at least 1"));
        }
        for (name, secs) in [
            ("connect", self.timeouts.connect),
            ("auth", self.timeouts.auth),
            ("read", self.timeouts.read),
            ("probe", self.timeouts.probe),
        ] {
            if secs == 0 {
                return Err(invalid(&format!("timeouts.{name} must be at least 1 second")));
            }
        }
        Ok(())
    }

    /// Connection settings for the SSH connector.
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            port: self.port,
            connect_timeout: self.timeouts.connect(),
            auth_timeout: self.timeouts.auth(),
            read_timeout: self.timeouts.read(),
            terminal_width: self.terminal_width,
            terminal_height: self.terminal_height,
            host_key_verification: self.host_key_verification,
            known_hosts_path: self.known_hosts_path.clone(),
            search_depth: self.search_depth,
        }
    }
}

fn invalid(message: &str) -> crate::Error {
    ConfigError::Invalid {
        message: message.to_string(),
    }
    .into()
}
