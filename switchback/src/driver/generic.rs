//! SSH-backed driver and connector.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use log::{debug, warn};
use regex::bytes::Regex;

use super::builder::DriverBuilder;
use super::response::Response;
use super::{Connector, Driver};
use crate::channel::PtyChannel;
use crate::dialect::DialectProfile;
use crate::error::{DriverError, Result};
use crate::hosts::HostCredential;
use crate::transport::{HostKeyVerification, SshConfig, SshTransport};

/// Quiet period that ends the post-login drain.
const SETTLE_QUIET: Duration = Duration::from_millis(300);

/// Driver that runs commands over an interactive SSH shell.
///
/// Handles:
/// - SSH transport and PTY channel lifetime
/// - Waiting for the dialect's prompt after login
/// - Session preparation (paging off) via the profile's on_open commands
/// - Output normalization and failure-pattern checks
pub struct GenericDriver {
    /// SSH configuration.
    ssh_config: SshConfig,

    /// Dialect profile driving prompt detection and normalization.
    profile: DialectProfile,

    /// Timeout for the login prompt and session-preparation commands.
    read_timeout: Duration,

    /// Tail search depth for prompt matching.
    search_depth: usize,

    /// SSH transport (None when disconnected).
    transport: Option<SshTransport>,

    /// Shell channel (None when disconnected).
    channel: Option<PtyChannel>,
}

impl GenericDriver {
    /// Create a new, unconnected driver.
    pub fn new(
        ssh_config: SshConfig,
        profile: DialectProfile,
        read_timeout: Duration,
        search_depth: usize,
    ) -> Self {
        Self {
            ssh_config,
            profile,
            read_timeout,
            search_depth,
            transport: None,
            channel: None,
        }
    }

    /// Connect, wait for the first prompt and prepare the session.
    ///
    /// The transport is closed again if anything after the handshake fails.
    pub async fn open(&mut self) -> Result<()> {
        self.transport = Some(SshTransport::connect(self.ssh_config.clone()).await?);

        if let Err(e) = self.prepare().await {
            if let Err(close_err) = self.close().await {
                debug!("{}: close after failed open: {}", self.ssh_config.host, close_err);
            }
            return Err(e);
        }

        debug!(
            "{}: session ready ({})",
            self.ssh_config.host, self.profile.name
        );
        Ok(())
    }

    async fn prepare(&mut self) -> Result<()> {
        let transport = self.transport.as_ref().ok_or(DriverError::NotConnected)?;

        let mut channel = PtyChannel::new(transport.open_channel().await?, self.search_depth);
        channel.set_pager(self.profile.pager.clone());

        // Some devices only print a prompt after input.
        channel.send("").await?;
        channel
            .read_until(&self.profile.prompt, self.read_timeout)
            .await?;
        channel.settle(SETTLE_QUIET).await?;
        self.channel = Some(channel);

        for command in self.profile.on_open_commands.clone() {
            let response = self.send_command(&command, self.read_timeout).await?;
            if !response.is_success() {
                warn!(
                    "{}: session preparation '{}' rejected: {:?}",
                    self.ssh_config.host, command, response.failure_message
                );
            }
        }
        Ok(())
    }

    async fn execute(
        &mut self,
        command: &str,
        end_marker: Option<&Regex>,
        timeout: Duration,
    ) -> Result<Response> {
        let channel = self.channel.as_mut().ok_or(DriverError::NotConnected)?;
        let pattern = end_marker.unwrap_or(&self.profile.prompt);

        let start = Instant::now();
        debug!("{}: sending '{}'", self.ssh_config.host, command);

        channel.send(command).await?;
        let data = channel.read_until(pattern, timeout).await?;

        let raw = String::from_utf8_lossy(&data);
        let result = self.profile.normalize_output(&raw, command);
        let response = Response::new(command, result, start.elapsed());

        match self.profile.detect_failure(&response.result) {
            Some(pattern) => Ok(response.with_failure(pattern)),
            None => Ok(response),
        }
    }
}

impl Driver for GenericDriver {
    async fn send_command(&mut self, command: &str, timeout: Duration) -> Result<Response> {
        self.execute(command, None, timeout).await
    }

    async fn send_command_until(
        &mut self,
        command: &str,
        end_marker: &Regex,
        timeout: Duration,
    ) -> Result<Response> {
        self.execute(command, Some(end_marker), timeout).await
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(channel) = self.channel.take() {
            if let Err(e) = channel.close().await {
                debug!("{}: channel close: {}", self.ssh_config.host, e);
            }
        }
        if let Some(transport) = self.transport.take() {
            transport.close().await?;
        }
        Ok(())
    }
}

/// Connection settings shared by every session of a run.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// SSH port.
    pub port: u16,

    /// Bound on TCP connect plus SSH handshake.
    pub connect_timeout: Duration,

    /// Bound on authentication.
    pub auth_timeout: Duration,

    /// Bound on the login prompt and session preparation.
    pub read_timeout: Duration,

    /// Terminal width for PTY.
    pub terminal_width: u32,

    /// Terminal height for PTY.
    pub terminal_height: u32,

    /// Host key verification mode.
    pub host_key_verification: HostKeyVerification,

    /// Path to known_hosts file.
    pub known_hosts_path: Option<PathBuf>,

    /// Tail search depth for prompt matching.
    pub search_depth: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            port: 22,
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
}

/// [`Connector`] that opens real SSH sessions.
#[derive(Debug, Clone, Default)]
pub struct SshConnector {
    settings: SessionSettings,
}

impl SshConnector {
    /// Create a connector with the given session settings.
    pub fn new(settings: SessionSettings) -> Self {
        Self { settings }
    }
}

impl Connector for SshConnector {
    type Driver = GenericDriver;

    async fn connect(
        &self,
        host: &HostCredential,
        profile: &DialectProfile,
    ) -> Result<GenericDriver> {
        let settings = &self.settings;
        let mut builder = DriverBuilder::new(host.address.as_str())
            .port(settings.port)
            .username(host.username.as_str())
            .password(host.password.clone())
            .profile(profile.clone())
            .connect_timeout(settings.connect_timeout)
            .auth_timeout(settings.auth_timeout)
            .read_timeout(settings.read_timeout)
            .terminal_size(settings.terminal_width, settings.terminal_height)
            .host_key_verification(settings.host_key_verification)
            .search_depth(settings.search_depth);
        if let Some(path) = &settings.known_hosts_path {
            builder = builder.known_hosts_path(path.clone());
        }

        let mut driver = builder.build()?;
        driver.open().await?;
        Ok(driver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;

    fn unconnected() -> GenericDriver {
        DriverBuilder::new("192.0.2.1")
            .username("admin")
            .password("secret".to_string())
            .dialect(Dialect::CiscoIos)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_command_before_open_is_not_connected() {
        let mut driver = unconnected();
        let err = driver
            .send_command("show version", Duration::from_secs(1))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "NotConnected");
    }

    #[tokio::test]
    async fn test_prepare_without_transport_fails() {
        let mut driver = unconnected();
        let err = driver.prepare().await.unwrap_err();
        assert_eq!(err.kind(), "NotConnected");
        assert!(driver.channel.is_none());
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let mut driver = unconnected();
        driver.close().await.unwrap();
        driver.close().await.unwrap();
        assert!(driver.transport.is_none());
    }
}
