//! Builder for creating device drivers.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use super::generic::GenericDriver;
use crate::dialect::{Dialect, DialectProfile};
use crate::error::{ConfigError, Result};
use crate::transport::{HostKeyVerification, SshConfig};

/// Builder for constructing device drivers.
///
/// # Example
///
/// ```rust,no_run
/// use switchback::dialect::Dialect;
/// use switchback::driver::DriverBuilder;
///
/// # async fn example() -> Result<(), switchback::Error> {
/// let mut driver = DriverBuilder::new("192.168.1.1")
///     .username("admin")
///     .password("secret".to_string())
///     .dialect(Dialect::CiscoIos)
///     .build()?;
///
/// driver.open().await?;
/// # Ok(())
/// # }
/// ```
pub struct DriverBuilder {
    host: String,
    port: u16,
    username: Option<String>,
    password: Option<SecretString>,
    profile: Option<DialectProfile>,
    connect_timeout: Duration,
    auth_timeout: Duration,
    read_timeout: Duration,
    terminal_width: u32,
    terminal_height: u32,
    host_key_verification: HostKeyVerification,
    known_hosts_path: Option<PathBuf>,
    search_depth: usize,
}

impl DriverBuilder {
    /// Create a new driver builder for the specified host.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: 22,
            username: None,
            password: None,
            profile: None,
            connect_timeout: Duration::from_secs(5),
            auth_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(30),
            terminal_width: 511,
            terminal_height: 24,
            host_key_verification: HostKeyVerification::default(),
            known_hosts_path: None,
            search_depth: 1000,
        }
    }

    /// Set the SSH port (default: 22).
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the username for authentication.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set password authentication.
    pub fn password(mut self, password: impl Into<SecretString>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Use the built-in profile of `dialect`.
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.profile = Some(dialect.profile().clone());
        self
    }

    /// Use a custom dialect profile.
    pub fn profile(mut self, profile: DialectProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Set the connect timeout (default: 5s).
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the authentication timeout (default: 10s).
    pub fn auth_timeout(mut self, timeout: Duration) -> Self {
        self.auth_timeout = timeout;
        self
    }

    /// Set the timeout for the login prompt and session preparation (default: 30s).
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Set terminal dimensions.
    pub fn terminal_size(mut self, width: u32, height: u32) -> Self {
        self.terminal_width = width;
        self.terminal_height = height;
        self
    }

    /// Set the host key verification mode.
    pub fn host_key_verification(mut self, mode: HostKeyVerification) -> Self {
        self.host_key_verification = mode;
        self
    }

    /// Use a specific known_hosts file.
    pub fn known_hosts_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.known_hosts_path = Some(path.into());
        self
    }

    /// Set the prompt search depth in bytes (default: 1000).
    pub fn search_depth(mut self, depth: usize) -> Self {
        self.search_depth = depth;
        self
    }

    /// Build the driver.
    ///
    /// This creates the driver but does not connect. Call `open()` on the
    /// returned driver to establish the connection.
    pub fn build(self) -> Result<GenericDriver> {
        let username = self.username.ok_or_else(|| ConfigError::Invalid {
            message: "Username is required".to_string(),
        })?;
        let password = self.password.ok_or_else(|| ConfigError::Invalid {
            message: "Password is required".to_string(),
        })?;
        let profile = self
            .profile
            .unwrap_or_else(|| Dialect::default().profile().clone());

        let ssh_config = SshConfig {
            host: self.host,
            port: self.port,
            username,
            password,
            connect_timeout: self.connect_timeout,
            auth_timeout: self.auth_timeout,
            terminal_width: self.terminal_width,
            terminal_height: self.terminal_height,
            host_key_verification: self.host_key_verification,
            known_hosts_path: self.known_hosts_path,
        };

        Ok(GenericDriver::new(
            ssh_config,
            profile,
            self.read_timeout,
            self.search_depth,
        ))
    }
}
